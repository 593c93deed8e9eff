//! Lip-sync adapter - Implements VideoGenerationPort using the ai_lipsync crate

use std::path::PathBuf;

use ai_lipsync::{LipSyncConfig, LipSyncOutcome, Wav2LipInvoker};
use application::error::ApplicationError;
use application::ports::{VideoGenerationPort, VideoResult};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Adapter running Wav2Lip for video generation
#[derive(Debug, Clone)]
pub struct LipSyncAdapter {
    invoker: Wav2LipInvoker,
}

impl LipSyncAdapter {
    pub const fn new(invoker: Wav2LipInvoker) -> Self {
        Self { invoker }
    }

    /// Create a lip-sync adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: LipSyncConfig) -> Result<Self, ApplicationError> {
        let invoker = Wav2LipInvoker::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(invoker))
    }

    fn map_outcome(outcome: LipSyncOutcome) -> Result<VideoResult, ApplicationError> {
        if let LipSyncOutcome::ProcessFailed { exit_code, stderr } = &outcome {
            debug!(?exit_code, stderr = %stderr, "Lip-sync stderr");
        }
        match outcome {
            LipSyncOutcome::Completed {
                size_bytes,
                elapsed,
                ..
            } => Ok(VideoResult {
                size_bytes,
                elapsed,
            }),
            other => Err(ApplicationError::VideoGeneration(other.to_string())),
        }
    }
}

#[async_trait]
impl VideoGenerationPort for LipSyncAdapter {
    #[instrument(skip(self))]
    async fn generate_video(
        &self,
        face: PathBuf,
        audio: PathBuf,
        output: PathBuf,
    ) -> Result<VideoResult, ApplicationError> {
        let outcome = self.invoker.run_lip_sync(&face, &audio, &output).await;
        debug!(outcome = outcome.kind(), "Lip-sync finished");
        Self::map_outcome(outcome)
    }

    fn is_installed(&self) -> bool {
        self.invoker.check_installation()
    }
}
