//! Configuration for speech synthesis and device probing

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Tortoise bridge shipped with the workspace, relative to the working directory
pub const DEFAULT_BRIDGE_SCRIPT: &str = "scripts/tortoise_bridge.py";

/// Sub-models a TTS engine may expose for relocation
pub const DEFAULT_COMPONENTS: [&str; 4] = ["autoregressive", "diffusion", "vocoder", "clvp"];

/// Configuration for the speech synthesizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Python interpreter used for device probes
    #[serde(default = "default_python_executable")]
    pub python_executable: String,

    /// TTS engine executable
    #[serde(default = "default_command")]
    pub command: String,

    /// Arguments placed before `--device` and `--output`
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Sub-models the engine exposes
    #[serde(default = "default_components")]
    pub components: Vec<String>,

    /// Sample rate of the written WAV file
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Upper bound for a single inference run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound for a single backend probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// File whose presence marks a container environment
    #[serde(default = "default_container_marker")]
    pub container_marker: PathBuf,
}

fn default_python_executable() -> String {
    "python".to_string()
}

fn default_command() -> String {
    "python".to_string()
}

fn default_args() -> Vec<String> {
    vec![DEFAULT_BRIDGE_SCRIPT.to_string()]
}

fn default_components() -> Vec<String> {
    DEFAULT_COMPONENTS.iter().map(ToString::to_string).collect()
}

const fn default_sample_rate() -> u32 {
    24_000
}

const fn default_timeout_secs() -> u64 {
    600
}

const fn default_probe_timeout_secs() -> u64 {
    30
}

fn default_container_marker() -> PathBuf {
    PathBuf::from("/.dockerenv")
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            python_executable: default_python_executable(),
            command: default_command(),
            args: default_args(),
            components: default_components(),
            sample_rate: default_sample_rate(),
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            container_marker: default_container_marker(),
        }
    }
}

impl SpeechConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.command.trim().is_empty() {
            return Err("TTS command must not be empty".to_string());
        }
        if self.python_executable.trim().is_empty() {
            return Err("Python executable must not be empty".to_string());
        }
        if self.sample_rate == 0 {
            return Err("Sample rate must be greater than 0".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }
        if self.probe_timeout_secs == 0 {
            return Err("Probe timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}
