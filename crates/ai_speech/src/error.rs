//! Speech processing errors

use domain::DeviceTag;
use thiserror::Error;

/// Errors that can occur while synthesizing speech
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Engine executable could not be started
    #[error("Engine not available: {0}")]
    NotAvailable(String),

    /// Engine instance could not be constructed
    #[error("Engine construction failed: {0}")]
    Construction(String),

    /// Moving a sub-model to a device failed
    #[error("Failed to move {component} to {device}: {reason}")]
    Relocation {
        /// Sub-model name
        component: String,
        /// Target device
        device: DeviceTag,
        /// Failure reported by the engine
        reason: String,
    },

    /// Inference itself failed
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Inference took longer than the configured limit
    #[error("Speech synthesis timeout after {0}s")]
    Timeout(u64),

    /// Reading or writing audio failed
    #[error("Audio processing failed: {0}")]
    AudioProcessing(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<hound::Error> for SpeechError {
    fn from(err: hound::Error) -> Self {
        Self::AudioProcessing(err.to_string())
    }
}

impl From<std::io::Error> for SpeechError {
    fn from(err: std::io::Error) -> Self {
        Self::AudioProcessing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_available_error_message() {
        let err = SpeechError::NotAvailable("python".to_string());
        assert_eq!(err.to_string(), "Engine not available: python");
    }

    #[test]
    fn relocation_error_message() {
        let err = SpeechError::Relocation {
            component: "vocoder".to_string(),
            device: DeviceTag::Mps,
            reason: "out of memory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to move vocoder to mps: out of memory"
        );
    }

    #[test]
    fn synthesis_failed_error_message() {
        let err = SpeechError::SynthesisFailed("nan in output".to_string());
        assert_eq!(err.to_string(), "Synthesis failed: nan in output");
    }

    #[test]
    fn timeout_error_message() {
        let err = SpeechError::Timeout(600);
        assert_eq!(err.to_string(), "Speech synthesis timeout after 600s");
    }

    #[test]
    fn io_error_converts_to_audio_processing() {
        let err: SpeechError = std::io::Error::other("disk full").into();
        assert!(matches!(err, SpeechError::AudioProcessing(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
