//! Per-request generation state machine

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::DomainError;
use crate::value_objects::RequestToken;

/// Pipeline step a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    /// Checking the uploaded form
    Validation,
    /// Writing the upload to disk
    Storage,
    /// Text-to-speech
    AudioSynthesis,
    /// Lip-sync video generation
    VideoGeneration,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Storage => write!(f, "storage"),
            Self::AudioSynthesis => write!(f, "audio_synthesis"),
            Self::VideoGeneration => write!(f, "video_generation"),
        }
    }
}

/// State of a generation request
///
/// ```text
/// Received -> Validated -> AudioSynthesized -> VideoGenerated -> Done
///     \___________\________________\__________________\-> Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum GenerationState {
    Received,
    Validated,
    AudioSynthesized,
    VideoGenerated,
    Done,
    Failed { step: PipelineStep, reason: String },
}

impl GenerationState {
    /// Whether no further transition is possible
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }

    const fn name(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::AudioSynthesized => "audio_synthesized",
            Self::VideoGenerated => "video_generated",
            Self::Done => "done",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress record of one generation request
///
/// Lives only for the duration of the request; nothing is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationJob {
    token: RequestToken,
    state: GenerationState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GenerationJob {
    /// Start tracking a freshly received request
    #[must_use]
    pub fn new(token: RequestToken) -> Self {
        let now = Utc::now();
        Self {
            token,
            state: GenerationState::Received,
            created_at: now,
            updated_at: now,
        }
    }

    pub const fn token(&self) -> RequestToken {
        self.token
    }

    pub const fn state(&self) -> &GenerationState {
        &self.state
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn mark_validated(&mut self) -> Result<(), DomainError> {
        self.advance(&GenerationState::Received, GenerationState::Validated)
    }

    pub fn mark_audio_synthesized(&mut self) -> Result<(), DomainError> {
        self.advance(&GenerationState::Validated, GenerationState::AudioSynthesized)
    }

    pub fn mark_video_generated(&mut self) -> Result<(), DomainError> {
        self.advance(
            &GenerationState::AudioSynthesized,
            GenerationState::VideoGenerated,
        )
    }

    pub fn mark_done(&mut self) -> Result<(), DomainError> {
        self.advance(&GenerationState::VideoGenerated, GenerationState::Done)
    }

    /// Move to `Failed` from any non-terminal state
    pub fn fail(&mut self, step: PipelineStep, reason: impl Into<String>) -> Result<(), DomainError> {
        if self.state.is_terminal() {
            return Err(DomainError::invalid_transition(self.state.name(), "failed"));
        }
        self.set(GenerationState::Failed {
            step,
            reason: reason.into(),
        });
        Ok(())
    }

    fn advance(
        &mut self,
        expected: &GenerationState,
        next: GenerationState,
    ) -> Result<(), DomainError> {
        if &self.state != expected {
            return Err(DomainError::invalid_transition(self.state.name(), next.name()));
        }
        self.set(next);
        Ok(())
    }

    fn set(&mut self, next: GenerationState) {
        self.state = next;
        self.updated_at = Utc::now();
    }
}
