//! Artifact directory configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where uploads, audio and video are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    #[serde(default = "default_video_dir")]
    pub video_dir: PathBuf,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_video_dir() -> PathBuf {
    PathBuf::from("video")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            audio_dir: default_audio_dir(),
            video_dir: default_video_dir(),
        }
    }
}

impl StorageConfig {
    /// All three directories rooted at `root`
    #[must_use]
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            upload_dir: root.join("uploads"),
            audio_dir: root.join("audio"),
            video_dir: root.join("video"),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a directory is empty or two directories coincide.
    pub fn validate(&self) -> Result<(), String> {
        let dirs = [
            ("upload_dir", &self.upload_dir),
            ("audio_dir", &self.audio_dir),
            ("video_dir", &self.video_dir),
        ];
        for (name, dir) in dirs {
            if dir.as_os_str().is_empty() {
                return Err(format!("storage.{name} must not be empty"));
            }
        }
        if self.upload_dir == self.audio_dir
            || self.upload_dir == self.video_dir
            || self.audio_dir == self.video_dir
        {
            return Err("storage directories must be distinct".to_string());
        }
        Ok(())
    }
}
