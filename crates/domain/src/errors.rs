//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
///
/// The four upload variants carry the exact messages shown to the client,
/// so their `Display` output is part of the HTTP contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The multipart form carried no `face_image` field
    #[error("No face image uploaded")]
    MissingImage,

    /// The `face_image` field had an empty filename
    #[error("No face image selected")]
    EmptyImageName,

    /// The uploaded filename has no allowed image extension
    #[error("Invalid file type. Please upload an image.")]
    UnsupportedImageType(String),

    /// The `text` field was missing or blank after trimming
    #[error("No text provided")]
    MissingText,

    /// A video reference did not have the `video_<token>.mp4` shape
    #[error("Invalid video reference: {0}")]
    InvalidVideoReference(String),

    /// A request token could not be parsed
    #[error("Invalid request token: {0}")]
    InvalidToken(String),

    /// A generation job was asked to move to a state it cannot reach
    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Create an invalid transition error
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether this error stems from rejecting client input during upload validation
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingImage
                | Self::EmptyImageName
                | Self::UnsupportedImageType(_)
                | Self::MissingText
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_message() {
        assert_eq!(
            DomainError::MissingImage.to_string(),
            "No face image uploaded"
        );
    }

    #[test]
    fn empty_image_name_message() {
        assert_eq!(
            DomainError::EmptyImageName.to_string(),
            "No face image selected"
        );
    }

    #[test]
    fn unsupported_type_message_hides_filename() {
        let err = DomainError::UnsupportedImageType("notes.txt".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid file type. Please upload an image."
        );
    }

    #[test]
    fn missing_text_message() {
        assert_eq!(DomainError::MissingText.to_string(), "No text provided");
    }

    #[test]
    fn invalid_transition_creates_correct_error() {
        let err = DomainError::invalid_transition("done", "validated");
        assert_eq!(
            err.to_string(),
            "Invalid state transition from done to validated"
        );
    }

    #[test]
    fn validation_errors_are_classified() {
        assert!(DomainError::MissingImage.is_validation());
        assert!(DomainError::EmptyImageName.is_validation());
        assert!(DomainError::UnsupportedImageType(String::new()).is_validation());
        assert!(DomainError::MissingText.is_validation());
        assert!(!DomainError::InvalidVideoReference("x".to_string()).is_validation());
        assert!(!DomainError::invalid_transition("a", "b").is_validation());
    }
}
