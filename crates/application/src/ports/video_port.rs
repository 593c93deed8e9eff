//! Video port - Interface for lip-sync video generation

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a video generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResult {
    /// Size of the written video
    pub size_bytes: u64,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Port for lip-sync video generation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VideoGenerationPort: Send + Sync {
    /// Animate `face` speaking `audio`, writing an MP4 to `output`
    ///
    /// # Errors
    /// `ApplicationError::VideoGeneration` if no video was produced
    async fn generate_video(
        &self,
        face: PathBuf,
        audio: PathBuf,
        output: PathBuf,
    ) -> Result<VideoResult, ApplicationError>;

    /// Whether the lip-sync model is installed
    fn is_installed(&self) -> bool;
}
