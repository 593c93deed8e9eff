//! AI Speech - device selection and text-to-speech synthesis
//!
//! Provides:
//! - `DeviceProber` - pick MPS, CUDA or CPU from live backend probes
//! - `SpeechSynthesizer` - turn text into a 24 kHz mono WAV, falling back to
//!   CPU when the accelerator path fails
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` and `device` define the traits (`TtsEngine`, `TtsEngineFactory`,
//!   `BackendProbe`)
//! - `providers` contains concrete implementations (an external TTS command,
//!   a PyTorch probe)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ai_speech::{SpeechConfig, SpeechSynthesizer};
//!
//! let config = SpeechConfig::default();
//! let synthesizer = SpeechSynthesizer::from_config(&config)?;
//! let report = synthesizer.synthesize("Hello, world!", "audio/hello.wav".as_ref()).await?;
//! println!("Written on {}", report.device);
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod ports;
pub mod providers;
pub mod synthesizer;
pub mod types;
pub mod wav;

use std::sync::Arc;
use std::time::Duration;

pub use config::SpeechConfig;
pub use device::{BackendProbe, BackendStatus, DeviceProber, DeviceReport, EnvironmentInfo};
pub use error::SpeechError;
pub use ports::{TtsEngine, TtsEngineFactory};
pub use providers::{CommandTtsEngine, CommandTtsEngineFactory, TorchBackendProbe};
pub use synthesizer::{FallbackEvent, SpeechSynthesizer, SynthesisFailure, SynthesisReport};
pub use types::Waveform;

/// Device prober using the PyTorch probes from `config`
#[must_use]
pub fn torch_prober(config: &SpeechConfig) -> DeviceProber {
    let timeout = Duration::from_secs(config.probe_timeout_secs);
    DeviceProber::new(
        config.container_marker.clone(),
        Arc::new(TorchBackendProbe::mps(config.python_executable.clone(), timeout)),
        Arc::new(TorchBackendProbe::cuda(config.python_executable.clone(), timeout)),
    )
}

impl SpeechSynthesizer {
    /// Synthesizer driving the configured TTS command with PyTorch probes
    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let factory = CommandTtsEngineFactory::new(config.clone())?;
        Ok(Self::new(
            Arc::new(torch_prober(config)),
            Arc::new(factory),
            config.sample_rate,
        ))
    }
}
