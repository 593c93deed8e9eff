//! Port definitions for speech synthesis
//!
//! A TTS engine is a bundle of named sub-models that can each be placed on a
//! compute device, plus an inference entry point. Engines are built fresh for
//! every attempt through a [`TtsEngineFactory`].

use async_trait::async_trait;
use domain::DeviceTag;

use crate::error::SpeechError;
use crate::types::Waveform;

/// Port for text-to-speech engines
///
/// # Example
///
/// ```ignore
/// use ai_speech::{TtsEngine, SpeechError};
///
/// async fn speak_on_gpu(engine: &mut dyn TtsEngine) -> Result<(), SpeechError> {
///     if engine.has_component("vocoder") {
///         engine.relocate("vocoder", DeviceTag::Cuda)?;
///     }
///     let wave = engine.infer("Hello").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait TtsEngine: Send + Sync + std::fmt::Debug {
    /// Whether the engine has a sub-model with this name
    fn has_component(&self, component: &str) -> bool;

    /// Move one sub-model to `device`
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Relocation` if the sub-model cannot be placed.
    fn relocate(&mut self, component: &str, device: DeviceTag) -> Result<(), SpeechError>;

    /// Synthesize `text` into a mono waveform
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if inference fails.
    async fn infer(&self, text: &str) -> Result<Waveform, SpeechError>;

    /// Engine name for logs
    fn name(&self) -> &str;
}

/// Builds engine instances
pub trait TtsEngineFactory: Send + Sync + std::fmt::Debug {
    /// Construct a new engine with every sub-model on CPU
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the engine cannot be constructed.
    fn create(&self) -> Result<Box<dyn TtsEngine>, SpeechError>;
}
