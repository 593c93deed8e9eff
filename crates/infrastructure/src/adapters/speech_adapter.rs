//! Speech adapter - Implements SpeechSynthesisPort using the ai_speech crate

use std::path::PathBuf;

use ai_speech::{FallbackEvent, SpeechConfig, SpeechSynthesizer, SynthesisFailure};
use application::error::ApplicationError;
use application::ports::{SpeechResult, SpeechSynthesisPort};
use async_trait::async_trait;
use tracing::{instrument, warn};

/// Adapter for speech synthesis using the ai_speech crate
#[derive(Debug, Clone)]
pub struct SpeechAdapter {
    synthesizer: SpeechSynthesizer,
}

impl SpeechAdapter {
    /// Wrap an existing synthesizer
    pub const fn new(synthesizer: SpeechSynthesizer) -> Self {
        Self { synthesizer }
    }

    /// Create a speech adapter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the TTS command configuration is invalid.
    pub fn from_config(config: &SpeechConfig) -> Result<Self, ApplicationError> {
        let synthesizer = SpeechSynthesizer::from_config(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(synthesizer))
    }

    fn describe(event: &FallbackEvent) -> String {
        match event {
            FallbackEvent::RelocationFailed {
                component,
                device,
                reason,
            } => format!("{component} kept on cpu instead of {device}: {reason}"),
            FallbackEvent::InferenceRetriedOnCpu { device, reason } => {
                format!("retried on cpu after {device} failure: {reason}")
            },
        }
    }

    fn map_failure(failure: SynthesisFailure) -> ApplicationError {
        for event in &failure.events {
            warn!(fallback = %Self::describe(event), "Fallback taken before failure");
        }
        ApplicationError::SpeechSynthesis(failure.error.to_string())
    }
}

#[async_trait]
impl SpeechSynthesisPort for SpeechAdapter {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn synthesize(
        &self,
        text: String,
        output: PathBuf,
    ) -> Result<SpeechResult, ApplicationError> {
        let report = self
            .synthesizer
            .synthesize(&text, &output)
            .await
            .map_err(Self::map_failure)?;

        Ok(SpeechResult {
            device: report.device,
            sample_rate: report.sample_rate,
            fallbacks: report.events.iter().map(Self::describe).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use ai_speech::{
        BackendProbe, BackendStatus, DeviceProber, EnvironmentInfo, SpeechError, TtsEngine,
        TtsEngineFactory, Waveform,
    };
    use domain::DeviceTag;

    use super::*;

    #[derive(Debug)]
    struct StaticProbe(DeviceTag, bool);

    #[async_trait]
    impl BackendProbe for StaticProbe {
        fn device(&self) -> DeviceTag {
            self.0
        }

        async fn probe(&self) -> BackendStatus {
            if self.1 {
                BackendStatus::functional()
            } else {
                BackendStatus::unavailable("not built")
            }
        }
    }

    /// Engine failing on accelerators and succeeding on CPU
    #[derive(Debug, Default)]
    struct CpuOnlyEngine {
        on_accelerator: bool,
    }

    #[async_trait]
    impl TtsEngine for CpuOnlyEngine {
        fn has_component(&self, _component: &str) -> bool {
            true
        }

        fn relocate(&mut self, _component: &str, device: DeviceTag) -> Result<(), SpeechError> {
            self.on_accelerator = device.is_accelerator();
            Ok(())
        }

        async fn infer(&self, _text: &str) -> Result<Waveform, SpeechError> {
            if self.on_accelerator {
                Err(SpeechError::SynthesisFailed("kernel missing".to_string()))
            } else {
                Ok(Waveform::on_host(vec![0.0, 0.25, -0.25], 24_000))
            }
        }

        fn name(&self) -> &str {
            "cpu-only"
        }
    }

    #[derive(Debug, Default)]
    struct Factory {
        broken: bool,
        created: AtomicUsize,
    }

    impl TtsEngineFactory for Factory {
        fn create(&self) -> Result<Box<dyn TtsEngine>, SpeechError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(SpeechError::Construction("weights missing".to_string()));
            }
            Ok(Box::new(CpuOnlyEngine::default()))
        }
    }

    fn adapter(cuda: bool, factory: Arc<Factory>) -> SpeechAdapter {
        let env = EnvironmentInfo {
            is_container: true,
            os: "linux".to_string(),
            architecture: "x86_64".to_string(),
        };
        let prober = DeviceProber::with_environment(
            env,
            Arc::new(StaticProbe(DeviceTag::Mps, false)),
            Arc::new(StaticProbe(DeviceTag::Cuda, cuda)),
        );
        SpeechAdapter::new(SpeechSynthesizer::new(Arc::new(prober), factory, 24_000))
    }

    #[tokio::test]
    async fn cpu_host_has_no_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("audio.wav");
        let result = adapter(false, Arc::new(Factory::default()))
            .synthesize("Hello".to_string(), output.clone())
            .await
            .unwrap();

        assert_eq!(result.device, DeviceTag::Cpu);
        assert_eq!(result.sample_rate, 24_000);
        assert!(result.fallbacks.is_empty());
        assert!(output.is_file());
    }

    #[tokio::test]
    async fn accelerator_failure_is_reported_as_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("audio.wav");
        let result = adapter(true, Arc::new(Factory::default()))
            .synthesize("Hello".to_string(), output)
            .await
            .unwrap();

        assert_eq!(result.device, DeviceTag::Cpu);
        assert_eq!(result.fallbacks.len(), 1);
        assert!(result.fallbacks[0].starts_with("retried on cpu after cuda failure"));
    }

    #[tokio::test]
    async fn total_failure_maps_to_speech_error() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(Factory {
            broken: true,
            ..Factory::default()
        });
        let err = adapter(true, Arc::clone(&factory))
            .synthesize("Hello".to_string(), dir.path().join("audio.wav"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::SpeechSynthesis(_)));
        assert!(err.to_string().contains("weights missing"));
        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn describes_relocation_event() {
        let text = SpeechAdapter::describe(&FallbackEvent::RelocationFailed {
            component: "vocoder".to_string(),
            device: DeviceTag::Mps,
            reason: "out of memory".to_string(),
        });
        assert_eq!(text, "vocoder kept on cpu instead of mps: out of memory");
    }
}
