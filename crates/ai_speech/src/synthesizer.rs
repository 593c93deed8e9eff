//! Speech synthesis with device fallback
//!
//! One call to [`SpeechSynthesizer::synthesize`] goes through at most two
//! attempts:
//!
//! 1. Build an engine, place its sub-models on the optimal device (dropping
//!    to CPU if any placement fails), infer, write the WAV.
//! 2. If inference or writing failed, build a fresh engine that stays on CPU
//!    and try once more.
//!
//! Every fallback taken is recorded as a [`FallbackEvent`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use domain::DeviceTag;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::config::DEFAULT_COMPONENTS;
use crate::device::DeviceProber;
use crate::error::SpeechError;
use crate::ports::{TtsEngine, TtsEngineFactory};
use crate::wav;

/// A fallback the synthesizer had to take
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackEvent {
    /// A sub-model could not be moved to the accelerator; inference ran on CPU
    RelocationFailed {
        component: String,
        device: DeviceTag,
        reason: String,
    },
    /// The first attempt failed and a CPU-only retry was made
    InferenceRetriedOnCpu { device: DeviceTag, reason: String },
}

/// Successful synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub output: PathBuf,
    /// Device the successful inference ran on
    pub device: DeviceTag,
    pub sample_rate: u32,
    pub events: Vec<FallbackEvent>,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SynthesisReport {
    /// Whether any fallback was needed
    pub fn degraded(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Both attempts failed
#[derive(Debug, Error)]
#[error("speech synthesis failed after CPU retry: {error}")]
pub struct SynthesisFailure {
    /// Error of the final attempt
    #[source]
    pub error: SpeechError,
    pub events: Vec<FallbackEvent>,
}

struct AttemptError {
    device: DeviceTag,
    error: SpeechError,
}

/// Text-to-WAV synthesizer
#[derive(Debug, Clone)]
pub struct SpeechSynthesizer {
    prober: Arc<DeviceProber>,
    factory: Arc<dyn TtsEngineFactory>,
    sample_rate: u32,
}

impl SpeechSynthesizer {
    pub fn new(prober: Arc<DeviceProber>, factory: Arc<dyn TtsEngineFactory>, sample_rate: u32) -> Self {
        Self {
            prober,
            factory,
            sample_rate,
        }
    }

    /// Prober used to pick the device
    pub fn prober(&self) -> &DeviceProber {
        &self.prober
    }

    /// Synthesize `text` into a mono WAV at `output`
    #[instrument(skip(self, text), fields(text_len = text.len(), output = %output.display()))]
    pub async fn synthesize(
        &self,
        text: &str,
        output: &Path,
    ) -> Result<SynthesisReport, SynthesisFailure> {
        let started = Instant::now();
        let mut events = Vec::new();

        let device = self.prober.optimal_device().await;
        info!(device = %device, "Generating speech");

        let first = match self.attempt(text, output, device, &mut events).await {
            Ok(device) => return Ok(self.report(output, device, events, started)),
            Err(failure) => failure,
        };

        warn!(
            device = %first.device,
            error = %first.error,
            "Speech generation failed, retrying on CPU"
        );
        events.push(FallbackEvent::InferenceRetriedOnCpu {
            device: first.device,
            reason: first.error.to_string(),
        });

        match self.attempt(text, output, DeviceTag::Cpu, &mut events).await {
            Ok(device) => Ok(self.report(output, device, events, started)),
            Err(retry) => {
                error!(error = %retry.error, "Speech generation failed on CPU");
                Err(SynthesisFailure {
                    error: retry.error,
                    events,
                })
            },
        }
    }

    async fn attempt(
        &self,
        text: &str,
        output: &Path,
        device: DeviceTag,
        events: &mut Vec<FallbackEvent>,
    ) -> Result<DeviceTag, AttemptError> {
        let mut engine = self
            .factory
            .create()
            .map_err(|error| AttemptError { device, error })?;

        let device = if device.is_accelerator() {
            place_on(engine.as_mut(), device, events)
        } else {
            device
        };

        let waveform = engine
            .infer(text)
            .await
            .map_err(|error| AttemptError { device, error })?;
        debug!(
            samples = waveform.samples().len(),
            duration_ms = waveform.duration_ms(),
            "Inference finished"
        );
        if waveform.sample_rate() != self.sample_rate {
            warn!(
                engine_rate = waveform.sample_rate(),
                output_rate = self.sample_rate,
                "Engine sample rate differs from output rate"
            );
        }

        let samples = waveform.into_host().into_samples();
        let path = output.to_path_buf();
        let rate = self.sample_rate;
        tokio::task::spawn_blocking(move || wav::write_wav(&path, &samples, rate))
            .await
            .map_err(|e| AttemptError {
                device,
                error: SpeechError::AudioProcessing(format!("WAV writer task failed: {e}")),
            })?
            .map_err(|error| AttemptError { device, error })?;

        Ok(device)
    }

    fn report(
        &self,
        output: &Path,
        device: DeviceTag,
        events: Vec<FallbackEvent>,
        started: Instant,
    ) -> SynthesisReport {
        let elapsed = started.elapsed();
        info!(
            device = %device,
            elapsed_ms = elapsed.as_millis(),
            fallbacks = events.len(),
            "Speech written"
        );
        SynthesisReport {
            output: output.to_path_buf(),
            device,
            sample_rate: self.sample_rate,
            events,
            elapsed,
        }
    }
}

/// Move every known sub-model to `device`
///
/// Returns the device inference will run on: `device`, or CPU if any move
/// failed. On failure, sub-models already moved are sent back to CPU.
fn place_on(engine: &mut dyn TtsEngine, device: DeviceTag, events: &mut Vec<FallbackEvent>) -> DeviceTag {
    let mut moved = Vec::new();
    for component in DEFAULT_COMPONENTS {
        if !engine.has_component(component) {
            debug!(component, "Engine has no such sub-model, skipping");
            continue;
        }
        if let Err(e) = engine.relocate(component, device) {
            warn!(component, device = %device, error = %e, "Failed to move sub-model, falling back to CPU");
            events.push(FallbackEvent::RelocationFailed {
                component: component.to_string(),
                device,
                reason: e.to_string(),
            });
            for done in moved {
                if let Err(e) = engine.relocate(done, DeviceTag::Cpu) {
                    warn!(component = done, error = %e, "Failed to move sub-model back to CPU");
                }
            }
            return DeviceTag::Cpu;
        }
        moved.push(component);
    }
    info!(device = %device, engine = engine.name(), "Models moved to device");
    device
}
