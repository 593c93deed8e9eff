//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use application::{
    ApplicationError, BackendSnapshot, DevicePort, DeviceSnapshot, SpeechResult,
    SpeechSynthesisPort, VideoGenerationPort, VideoResult,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use domain::{DeviceTag, RequestToken, video_file_name};
use infrastructure::{AppConfig, FsArtifactStore, StorageConfig};
use presentation_http::{create_router, middleware::REQUEST_ID_HEADER, state::AppState};
use tempfile::TempDir;

const FAKE_MP4: &[u8] = b"\x00\x00\x00\x18ftypmp42 stub video";
const FAKE_WAV: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt stub audio";

/// Speech stub writing a fixed file
#[derive(Default)]
struct StubSpeech {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl SpeechSynthesisPort for StubSpeech {
    async fn synthesize(
        &self,
        _text: String,
        output: PathBuf,
    ) -> Result<SpeechResult, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ApplicationError::SpeechSynthesis(
                "engine failed on cpu: Traceback: /home/op/secret/model.py line 3".to_string(),
            ));
        }
        tokio::fs::write(&output, FAKE_WAV).await?;
        Ok(SpeechResult {
            device: DeviceTag::Cpu,
            sample_rate: 24_000,
            fallbacks: vec![],
        })
    }
}

/// Lip-sync stub copying a fixed video into place
#[derive(Default)]
struct StubVideo {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl VideoGenerationPort for StubVideo {
    async fn generate_video(
        &self,
        face: PathBuf,
        audio: PathBuf,
        output: PathBuf,
    ) -> Result<VideoResult, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(face.is_file(), "face image must exist before lip-sync");
        assert!(audio.is_file(), "audio must exist before lip-sync");
        if self.fail {
            return Err(ApplicationError::VideoGeneration(
                "lip-sync exited with code 1: RuntimeError in /opt/Wav2Lip/inference.py".to_string(),
            ));
        }
        tokio::fs::write(&output, FAKE_MP4).await?;
        Ok(VideoResult {
            size_bytes: FAKE_MP4.len() as u64,
            elapsed: Duration::from_millis(5),
        })
    }

    fn is_installed(&self) -> bool {
        true
    }
}

struct StubDevices;

#[async_trait]
impl DevicePort for StubDevices {
    async fn device_snapshot(&self) -> DeviceSnapshot {
        let absent = BackendSnapshot {
            available: false,
            functional: false,
            reason: "Not available".to_string(),
        };
        DeviceSnapshot {
            optimal_device: DeviceTag::Cpu,
            is_container: true,
            os: "linux".to_string(),
            architecture: "x86_64".to_string(),
            mps: absent.clone(),
            cuda: absent,
            recommendations: vec!["Using CPU".to_string()],
        }
    }
}

struct Fixture {
    _root: TempDir,
    storage: StorageConfig,
    speech: Arc<StubSpeech>,
    video: Arc<StubVideo>,
    server: TestServer,
}

async fn fixture_with(speech: StubSpeech, video: StubVideo) -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let storage = StorageConfig::under(root.path());
    let store = FsArtifactStore::new(storage.clone());
    store.ensure_directories().await.unwrap();

    let mut config = AppConfig::default();
    config.storage = storage.clone();
    config.server.max_upload_bytes = 64 * 1024;

    let speech = Arc::new(speech);
    let video = Arc::new(video);
    let state = AppState::new(
        config,
        Arc::new(store),
        Arc::clone(&speech) as Arc<dyn SpeechSynthesisPort>,
        Arc::clone(&video) as Arc<dyn VideoGenerationPort>,
        Arc::new(StubDevices),
    );
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    Fixture {
        _root: root,
        storage,
        speech,
        video,
        server,
    }
}

async fn fixture() -> Fixture {
    fixture_with(StubSpeech::default(), StubVideo::default()).await
}

fn form(filename: &str, text: &str) -> MultipartForm {
    MultipartForm::new().add_text("text", text.to_string()).add_part(
        "face_image",
        Part::bytes(vec![0x89, b'P', b'N', b'G', 1, 2, 3])
            .file_name(filename.to_string())
            .mime_type("image/png"),
    )
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}

#[tokio::test]
async fn index_serves_upload_form() {
    let f = fixture().await;
    let response = f.server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("face_image"));
    assert!(html.contains("/generate"));
}

#[tokio::test]
async fn generate_then_download() {
    let f = fixture().await;

    let response = f.server.post("/generate").multipart(form("face.png", "Hello there")).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Digital avatar generated successfully");
    let video = body["video_filename"].as_str().unwrap().to_string();
    assert!(video.starts_with("video_") && video.ends_with(".mp4"));
    assert_eq!(body["download_url"], format!("/download/{video}"));

    assert_eq!(file_count(&f.storage.upload_dir), 1);
    assert_eq!(file_count(&f.storage.audio_dir), 1);
    assert_eq!(file_count(&f.storage.video_dir), 1);

    let download = f.server.get(&format!("/download/{video}")).await;
    download.assert_status_ok();
    assert_eq!(download.header("content-type"), "video/mp4");
    assert_eq!(download.as_bytes().as_ref(), FAKE_MP4);
    assert!(download.maybe_header("content-disposition").is_none());
}

#[tokio::test]
async fn large_video_is_streamed_intact() {
    let f = fixture().await;
    let name = video_file_name(RequestToken::new());
    // Several read chunks, larger than the upload limit
    let video: Vec<u8> = (0..300_000u32).map(|i| u8::try_from(i % 251).unwrap()).collect();
    std::fs::write(f.storage.video_dir.join(&name), &video).unwrap();

    let download = f.server.get(&format!("/download/{name}")).await;
    download.assert_status_ok();
    assert_eq!(download.header("content-type"), "video/mp4");
    assert_eq!(download.header("content-length"), "300000");
    assert_eq!(download.as_bytes().as_ref(), video.as_slice());
}

#[tokio::test]
async fn post_root_is_an_alias_for_generate() {
    let f = fixture().await;
    let response = f.server.post("/").multipart(form("face.jpg", "Hi")).await;
    response.assert_status_ok();
    assert_eq!(f.video.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn download_as_attachment() {
    let f = fixture().await;
    let body: serde_json::Value = f
        .server
        .post("/generate")
        .multipart(form("face.png", "Hello"))
        .await
        .json();
    let video = body["video_filename"].as_str().unwrap();

    let response = f
        .server
        .get(&format!("/download/{video}"))
        .add_query_param("download", "true")
        .await;
    response.assert_status_ok();
    let disposition = response.header("content-disposition");
    let disposition = disposition.to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains(video));
}

#[tokio::test]
async fn empty_text_is_rejected_without_writing_files() {
    let f = fixture().await;

    let response = f.server.post("/generate").multipart(form("face.png", "   ")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No text provided");

    assert_eq!(file_count(&f.storage.upload_dir), 0);
    assert_eq!(file_count(&f.storage.audio_dir), 0);
    assert_eq!(file_count(&f.storage.video_dir), 0);
    assert_eq!(f.speech.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bad_extension_is_rejected_before_synthesis() {
    let f = fixture().await;

    let response = f.server.post("/generate").multipart(form("face.bmp", "Hello")).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid file type. Please upload an image.");
    assert_eq!(f.speech.calls.load(Ordering::SeqCst), 0);
    assert_eq!(file_count(&f.storage.upload_dir), 0);
}

#[tokio::test]
async fn missing_image_field() {
    let f = fixture().await;

    let response = f
        .server
        .post("/generate")
        .multipart(MultipartForm::new().add_text("text", "Hello"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No face image uploaded");
}

#[tokio::test]
async fn speech_failure_is_500() {
    let f = fixture_with(
        StubSpeech {
            fail: true,
            ..StubSpeech::default()
        },
        StubVideo::default(),
    )
    .await;

    let response = f.server.post("/generate").multipart(form("face.png", "Hello")).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains("Traceback"));
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "TTS generation failed");
    assert!(body.get("details").is_none());
    assert_eq!(f.video.calls.load(Ordering::SeqCst), 0);
    // The upload is kept even though the pipeline stopped
    assert_eq!(file_count(&f.storage.upload_dir), 1);
}

#[tokio::test]
async fn video_failure_is_500() {
    let f = fixture_with(
        StubSpeech::default(),
        StubVideo {
            fail: true,
            ..StubVideo::default()
        },
    )
    .await;

    let response = f.server.post("/generate").multipart(form("face.gif", "Hello")).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains("inference.py"));
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Video generation failed");
    assert!(body.get("details").is_none());
    assert_eq!(file_count(&f.storage.audio_dir), 1);
    assert_eq!(file_count(&f.storage.video_dir), 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let f = fixture().await;
    let big = MultipartForm::new().add_text("text", "Hello").add_part(
        "face_image",
        Part::bytes(vec![0u8; 128 * 1024]).file_name("face.png"),
    );

    let response = f.server.post("/generate").multipart(big).await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(f.speech.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn download_unknown_or_malformed_reference() {
    let f = fixture().await;

    for reference in [
        "video_0123456789abcdef0123456789abcdef.mp4",
        "..%2F..%2Fetc%2Fpasswd",
        "audio_0123456789abcdef0123456789abcdef.wav",
    ] {
        let response = f.server.get(&format!("/download/{reference}")).await;
        response.assert_status_not_found();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "Video file not found");
    }
}

#[tokio::test]
async fn status_reports_directories_and_device() {
    let f = fixture().await;
    let response = f.server.get("/status").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].as_f64().unwrap() > 0.0);
    assert_eq!(body["directories"]["uploads"], true);
    assert_eq!(body["directories"]["audio"], true);
    assert_eq!(body["directories"]["video"], true);
    assert_eq!(body["device"]["optimal_device"], "cpu");
    assert_eq!(body["lip_sync_installed"], true);
}

#[tokio::test]
async fn every_response_has_request_id() {
    let f = fixture().await;
    for response in [
        f.server.get("/status").await,
        f.server.get("/download/nope").await,
    ] {
        assert!(response.maybe_header(REQUEST_ID_HEADER).is_some());
    }
}
