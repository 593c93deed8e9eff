//! Speech port - Interface for text-to-speech synthesis

use std::path::PathBuf;

use async_trait::async_trait;
use domain::DeviceTag;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Result of a speech synthesis operation
///
/// The audio itself is on disk at the requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResult {
    /// Device the successful inference ran on
    pub device: DeviceTag,
    /// Sample rate of the written WAV
    pub sample_rate: u32,
    /// Fallbacks taken on the way, human readable
    pub fallbacks: Vec<String>,
}

/// Port for speech synthesis
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// Synthesize `text` into a mono WAV at `output`
    ///
    /// # Errors
    /// `ApplicationError::SpeechSynthesis` once every attempt failed
    async fn synthesize(&self, text: String, output: PathBuf)
    -> Result<SpeechResult, ApplicationError>;
}
