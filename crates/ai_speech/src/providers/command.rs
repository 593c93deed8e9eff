//! TTS engine backed by an external command
//!
//! The command receives the text on stdin and is called as
//!
//! ```text
//! <command> <args...> --device <mps|cuda|cpu> --output <file.wav>
//! ```
//!
//! It must write a WAV file to `--output` and exit with status 0. Sub-model
//! placement is tracked on the Rust side and handed over as one `--device`
//! value: the shared device when all sub-models agree, `cpu` otherwise.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use domain::DeviceTag;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error, instrument, warn};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{TtsEngine, TtsEngineFactory};
use crate::types::Waveform;
use crate::wav;

/// Engine instance driving the configured TTS command
#[derive(Debug, Clone)]
pub struct CommandTtsEngine {
    command: String,
    args: Vec<String>,
    timeout: Duration,
    placements: BTreeMap<String, DeviceTag>,
}

impl CommandTtsEngine {
    /// Create an engine with every configured sub-model on CPU
    pub fn new(config: &SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        let placements = config
            .components
            .iter()
            .map(|c| (c.clone(), DeviceTag::Cpu))
            .collect();
        Ok(Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            placements,
        })
    }

    /// Device handed to the command
    pub fn effective_device(&self) -> DeviceTag {
        let mut devices = self.placements.values().copied();
        match devices.next() {
            Some(first) if devices.all(|d| d == first) => first,
            _ => DeviceTag::Cpu,
        }
    }

    async fn run(&self, text: &str, device: DeviceTag, output: PathBuf) -> Result<(), SpeechError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg("--device")
            .arg(device.as_str())
            .arg("--output")
            .arg(&output)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running TTS command: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeechError::NotAvailable(format!("TTS command '{}' not found", self.command))
            } else {
                SpeechError::SynthesisFailed(format!("Failed to run TTS command: {e}"))
            }
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(text.as_bytes()).await {
                Ok(()) => {},
                // The command may exit without reading its input; the exit status decides.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("TTS command closed stdin early");
                },
                Err(e) => {
                    return Err(SpeechError::SynthesisFailed(format!(
                        "Failed to write to TTS stdin: {e}"
                    )));
                },
            }
        }

        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| SpeechError::Timeout(self.timeout.as_secs()))?;
        let output = result
            .map_err(|e| SpeechError::SynthesisFailed(format!("Failed to wait for TTS: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("TTS command failed: {}", stderr.trim());
            return Err(SpeechError::SynthesisFailed(format!(
                "TTS command exited with {}",
                output.status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TtsEngine for CommandTtsEngine {
    fn has_component(&self, component: &str) -> bool {
        self.placements.contains_key(component)
    }

    fn relocate(&mut self, component: &str, device: DeviceTag) -> Result<(), SpeechError> {
        let slot = self
            .placements
            .get_mut(component)
            .ok_or_else(|| SpeechError::Relocation {
                component: component.to_string(),
                device,
                reason: "unknown sub-model".to_string(),
            })?;
        *slot = device;
        Ok(())
    }

    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn infer(&self, text: &str) -> Result<Waveform, SpeechError> {
        if text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed(
                "Cannot synthesize empty text".to_string(),
            ));
        }

        let device = self.effective_device();
        let output_file = NamedTempFile::with_suffix(".wav").map_err(|e| {
            SpeechError::SynthesisFailed(format!("Failed to create temp file: {e}"))
        })?;
        let output_path = output_file.path().to_path_buf();

        self.run(text, device, output_path.clone()).await?;

        let (samples, sample_rate) = tokio::task::spawn_blocking(move || wav::read_wav(&output_path))
            .await
            .map_err(|e| SpeechError::AudioProcessing(format!("WAV reader task failed: {e}")))??;

        if samples.is_empty() {
            warn!("TTS command produced empty audio");
            return Err(SpeechError::SynthesisFailed(
                "TTS command produced empty audio".to_string(),
            ));
        }

        drop(output_file);
        Ok(Waveform::new(samples, sample_rate, device))
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Factory building [`CommandTtsEngine`] instances from one config
#[derive(Debug, Clone)]
pub struct CommandTtsEngineFactory {
    config: SpeechConfig,
}

impl CommandTtsEngineFactory {
    /// Create a factory, validating the configuration up front
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Configuration)?;
        Ok(Self { config })
    }
}

impl TtsEngineFactory for CommandTtsEngineFactory {
    fn create(&self) -> Result<Box<dyn TtsEngine>, SpeechError> {
        Ok(Box::new(CommandTtsEngine::new(&self.config)?))
    }
}
