//! Configuration for the Wav2Lip invoker

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Wav2Lip checkout and invocation settings
///
/// Relative paths are resolved against the server's working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LipSyncConfig {
    /// Interpreter running the inference script
    #[serde(default = "default_python_executable")]
    pub python_executable: String,

    /// Root of the Wav2Lip checkout
    #[serde(default = "default_install_dir")]
    pub install_dir: PathBuf,

    /// Inference entry point
    #[serde(default = "default_inference_script")]
    pub inference_script: PathBuf,

    /// Model weights passed as `--checkpoint_path`
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,

    /// Face box padding (top, bottom, left, right); omitted when unset
    #[serde(default)]
    pub pads: Option<[u32; 4]>,

    /// Upper bound for one inference run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_python_executable() -> String {
    "python".to_string()
}

fn default_install_dir() -> PathBuf {
    PathBuf::from("Wav2Lip")
}

fn default_inference_script() -> PathBuf {
    PathBuf::from("Wav2Lip/inference.py")
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("Wav2Lip/checkpoints/wav2lip_gan.pth")
}

const fn default_timeout_secs() -> u64 {
    900
}

impl Default for LipSyncConfig {
    fn default() -> Self {
        Self {
            python_executable: default_python_executable(),
            install_dir: default_install_dir(),
            inference_script: default_inference_script(),
            checkpoint_path: default_checkpoint_path(),
            pads: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl LipSyncConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.python_executable.trim().is_empty() {
            return Err("Python executable must not be empty".to_string());
        }
        if self.inference_script.as_os_str().is_empty() {
            return Err("Inference script path must not be empty".to_string());
        }
        if self.checkpoint_path.as_os_str().is_empty() {
            return Err("Checkpoint path must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
