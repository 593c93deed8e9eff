//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Speech synthesis failed on every device
    #[error("TTS generation failed: {0}")]
    SpeechSynthesis(String),

    /// Lip-sync video generation failed
    #[error("Video generation failed: {0}")]
    VideoGeneration(String),

    /// Requested artifact does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reading or writing artifacts failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the client sent something unacceptable
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_validation())
    }
}

impl From<std::io::Error> for ApplicationError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::MissingText.into();
        assert_eq!(err.to_string(), "No text provided");
        assert!(err.is_validation());
    }

    #[test]
    fn transition_error_is_not_validation() {
        let err: ApplicationError = DomainError::invalid_transition("done", "failed").into();
        assert!(!err.is_validation());
    }

    #[test]
    fn pipeline_error_messages() {
        assert_eq!(
            ApplicationError::SpeechSynthesis("engine crashed".to_string()).to_string(),
            "TTS generation failed: engine crashed"
        );
        assert_eq!(
            ApplicationError::VideoGeneration("exit 1".to_string()).to_string(),
            "Video generation failed: exit 1"
        );
    }

    #[test]
    fn io_error_becomes_storage() {
        let err: ApplicationError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ApplicationError::Storage(_)));
    }
}
