//! Integration tests for ai_speech crate
//!
//! Runs the full synthesizer against a shell script standing in for the TTS
//! command.

#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ai_speech::{
    BackendProbe, BackendStatus, CommandTtsEngineFactory, DeviceProber, EnvironmentInfo,
    FallbackEvent, SpeechConfig, SpeechSynthesizer, wav,
};
use async_trait::async_trait;
use domain::DeviceTag;

/// Fake TTS command
///
/// Positional parameters: source WAV, required device (`any` or a tag),
/// log file receiving the `--device` value of every call.
const FAKE_TTS: &str = r#"
src=$1; required=$2; log=$3; shift 3
dev=""; out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --device) dev=$2; shift 2 ;;
    --output) out=$2; shift 2 ;;
    *) shift ;;
  esac
done
cat > /dev/null
echo "$dev" >> "$log"
if [ "$required" != "any" ] && [ "$dev" != "$required" ]; then
  echo "unsupported device $dev" >&2
  exit 1
fi
cp "$src" "$out"
"#;

#[derive(Debug)]
struct StaticProbe {
    device: DeviceTag,
    functional: bool,
}

#[async_trait]
impl BackendProbe for StaticProbe {
    fn device(&self) -> DeviceTag {
        self.device
    }

    async fn probe(&self) -> BackendStatus {
        if self.functional {
            BackendStatus::functional()
        } else {
            BackendStatus::unavailable("not present")
        }
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    root: PathBuf,
    log: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        wav::write_wav(&root.join("source.wav"), &[0.0, 0.25, -0.25, 0.5], 24_000).unwrap();
        let log = root.join("devices.log");
        Self {
            _dir: dir,
            root,
            log,
        }
    }

    fn config(&self, required_device: &str) -> SpeechConfig {
        SpeechConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                FAKE_TTS.to_string(),
                "fake-tts".to_string(),
                self.root.join("source.wav").to_string_lossy().into_owned(),
                required_device.to_string(),
                self.log.to_string_lossy().into_owned(),
            ],
            timeout_secs: 10,
            ..Default::default()
        }
    }

    fn synthesizer(&self, required_device: &str, cuda: bool) -> SpeechSynthesizer {
        let prober = DeviceProber::with_environment(
            EnvironmentInfo {
                is_container: false,
                os: "linux".to_string(),
                architecture: "x86_64".to_string(),
            },
            Arc::new(StaticProbe {
                device: DeviceTag::Mps,
                functional: false,
            }),
            Arc::new(StaticProbe {
                device: DeviceTag::Cuda,
                functional: cuda,
            }),
        );
        let factory = CommandTtsEngineFactory::new(self.config(required_device)).unwrap();
        SpeechSynthesizer::new(Arc::new(prober), Arc::new(factory), 24_000)
    }

    fn devices_used(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    fn output(&self) -> PathBuf {
        self.root.join("audio").join("audio_test.wav")
    }
}

fn assert_wav(path: &Path) {
    let (samples, rate) = wav::read_wav(path).unwrap();
    assert_eq!(rate, 24_000);
    assert_eq!(samples.len(), 4);
}

#[tokio::test]
async fn synthesizes_on_accelerator_when_available() {
    let fx = Fixture::new();
    let synth = fx.synthesizer("any", true);

    let report = synth.synthesize("Hello there", &fx.output()).await.unwrap();

    assert_eq!(report.device, DeviceTag::Cuda);
    assert!(report.events.is_empty());
    assert_eq!(fx.devices_used(), vec!["cuda"]);
    assert_wav(&fx.output());
}

#[tokio::test]
async fn accelerator_failure_retries_on_cpu() {
    let fx = Fixture::new();
    let synth = fx.synthesizer("cpu", true);

    let report = synth.synthesize("Hello there", &fx.output()).await.unwrap();

    assert_eq!(report.device, DeviceTag::Cpu);
    assert_eq!(fx.devices_used(), vec!["cuda", "cpu"]);
    match report.events.as_slice() {
        [FallbackEvent::InferenceRetriedOnCpu { device, reason }] => {
            assert_eq!(*device, DeviceTag::Cuda);
            assert!(reason.contains("unsupported device cuda"));
        },
        other => panic!("unexpected events: {other:?}"),
    }
    assert_wav(&fx.output());
}

#[tokio::test]
async fn cpu_only_host_runs_once() {
    let fx = Fixture::new();
    let synth = fx.synthesizer("any", false);

    let report = synth.synthesize("Hello there", &fx.output()).await.unwrap();

    assert_eq!(report.device, DeviceTag::Cpu);
    assert_eq!(fx.devices_used(), vec!["cpu"]);
}

#[tokio::test]
async fn failure_on_every_device_is_reported() {
    let fx = Fixture::new();
    let synth = fx.synthesizer("mps", true);

    let failure = synth
        .synthesize("Hello there", &fx.output())
        .await
        .unwrap_err();

    assert_eq!(fx.devices_used(), vec!["cuda", "cpu"]);
    assert!(failure.error.to_string().contains("unsupported device cpu"));
    assert!(!fx.output().exists());
}
