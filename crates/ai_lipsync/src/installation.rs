//! Wav2Lip installation checks

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Checkpoints a Wav2Lip checkout normally ships with
pub const KNOWN_CHECKPOINTS: [&str; 2] = ["wav2lip_gan.pth", "wav2lip.pth"];

/// Files at or below this size are almost certainly failed downloads
pub const MIN_CHECKPOINT_BYTES: u64 = 1_000_000;

/// State of one checkpoint file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointStatus {
    pub path: PathBuf,
    pub present: bool,
    pub size_bytes: Option<u64>,
    /// Present but too small to be real weights
    pub suspicious: bool,
}

impl CheckpointStatus {
    /// Inspect `path`
    #[must_use]
    pub fn inspect(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => Self {
                path: path.to_path_buf(),
                present: true,
                size_bytes: Some(meta.len()),
                suspicious: meta.len() <= MIN_CHECKPOINT_BYTES,
            },
            _ => Self {
                path: path.to_path_buf(),
                present: false,
                size_bytes: None,
                suspicious: false,
            },
        }
    }
}

/// What a Wav2Lip checkout looks like on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationReport {
    pub install_dir: PathBuf,
    pub install_dir_present: bool,
    pub inference_script: PathBuf,
    pub inference_script_present: bool,
    /// Checkpoint the invoker passes to the script
    pub checkpoint: CheckpointStatus,
    /// Every known checkpoint next to the configured one
    pub checkpoints: Vec<CheckpointStatus>,
}

impl InstallationReport {
    /// Build the report
    #[must_use]
    pub fn inspect(install_dir: &Path, inference_script: &Path, checkpoint: &Path) -> Self {
        let checkpoint_dir = checkpoint
            .parent()
            .map_or_else(|| install_dir.join("checkpoints"), Path::to_path_buf);
        let mut checkpoints: Vec<CheckpointStatus> = KNOWN_CHECKPOINTS
            .iter()
            .map(|name| CheckpointStatus::inspect(&checkpoint_dir.join(name)))
            .collect();
        if !checkpoints.iter().any(|c| c.path == checkpoint) {
            checkpoints.insert(0, CheckpointStatus::inspect(checkpoint));
        }

        Self {
            install_dir: install_dir.to_path_buf(),
            install_dir_present: install_dir.is_dir(),
            inference_script: inference_script.to_path_buf(),
            inference_script_present: inference_script.is_file(),
            checkpoint: CheckpointStatus::inspect(checkpoint),
            checkpoints,
        }
    }

    /// Everything needed for a run is in place
    pub const fn is_ready(&self) -> bool {
        self.install_dir_present && self.inference_script_present && self.checkpoint.present
    }

    /// Problems worth telling an operator about
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.install_dir_present {
            problems.push(format!(
                "Wav2Lip directory not found: {}",
                self.install_dir.display()
            ));
        }
        if !self.inference_script_present {
            problems.push(format!(
                "Inference script not found: {}",
                self.inference_script.display()
            ));
        }
        if !self.checkpoint.present {
            problems.push(format!(
                "Checkpoint not found: {}",
                self.checkpoint.path.display()
            ));
        }
        for status in self.checkpoints.iter().filter(|c| c.suspicious) {
            problems.push(format!(
                "Checkpoint {} seems too small ({} bytes)",
                status.path.display(),
                status.size_bytes.unwrap_or_default()
            ));
        }
        problems
    }
}
