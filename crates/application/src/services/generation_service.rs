//! Generation service - Turns a face image and text into a talking-head video
//!
//! Orchestrates one request end to end:
//! 1. Validate the form (no file is written when this fails)
//! 2. Store the face image
//! 3. Synthesize speech into a WAV
//! 4. Run lip-sync into an MP4
//!
//! Every intermediate artifact stays on disk.

use std::{fmt, sync::Arc, time::Instant};

use domain::{
    FaceUpload, GeneratedVideo, GenerationJob, GenerationRequest, GenerationSummary, PipelineStep,
    RequestToken, SynthesizedAudio, UploadedImage, parse_video_file_name,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{ArtifactStorePort, SpeechSynthesisPort, VideoGenerationPort},
};

/// Everything produced by a successful generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub job: GenerationJob,
    pub image: UploadedImage,
    pub audio: SynthesizedAudio,
    pub video: GeneratedVideo,
    /// Fallbacks the speech stage took
    pub speech_fallbacks: Vec<String>,
    pub processing_time_ms: u64,
}

impl GenerationResult {
    /// Client-facing summary
    pub fn summary(&self) -> GenerationSummary {
        GenerationSummary {
            token: self.job.token(),
            video_filename: self.video.reference(),
            video_size_bytes: self.video.size_bytes,
        }
    }
}

/// Service running the upload → speech → video pipeline
pub struct GenerationService {
    store: Arc<dyn ArtifactStorePort>,
    speech: Arc<dyn SpeechSynthesisPort>,
    video: Arc<dyn VideoGenerationPort>,
}

impl fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationService").finish_non_exhaustive()
    }
}

impl GenerationService {
    /// Create a new generation service
    pub fn new(
        store: Arc<dyn ArtifactStorePort>,
        speech: Arc<dyn SpeechSynthesisPort>,
        video: Arc<dyn VideoGenerationPort>,
    ) -> Self {
        Self {
            store,
            speech,
            video,
        }
    }

    /// Run the full pipeline for one request
    #[instrument(skip_all, fields(token = tracing::field::Empty))]
    pub async fn generate(
        &self,
        image: Option<FaceUpload>,
        text: Option<String>,
    ) -> Result<GenerationResult, ApplicationError> {
        let start = Instant::now();
        let mut job = GenerationJob::new(RequestToken::new());
        tracing::Span::current().record("token", tracing::field::display(job.token()));

        let request = validate(&mut job, image, text.as_deref())?;
        info!(text = %request.text_preview(), "Generating avatar video");

        let (token, upload, extension, text) = request.into_parts();

        // Step 1: store the face image
        let image = match self.store.save_upload(token, upload, extension).await {
            Ok(image) => image,
            Err(e) => return Err(fail(&mut job, PipelineStep::Storage, e)),
        };
        debug!(path = %image.path.display(), size_bytes = image.size_bytes, "Stored face image");

        // Step 2: speech
        let audio_path = self.store.audio_path(token);
        let speech = match self.speech.synthesize(text, audio_path.clone()).await {
            Ok(speech) => speech,
            Err(e) => {
                let e = match e {
                    ApplicationError::SpeechSynthesis(_) => e,
                    other => ApplicationError::SpeechSynthesis(other.to_string()),
                };
                return Err(fail(&mut job, PipelineStep::AudioSynthesis, e));
            },
        };
        if !speech.fallbacks.is_empty() {
            warn!(fallbacks = ?speech.fallbacks, "Speech synthesized with fallbacks");
        }
        job.mark_audio_synthesized().map_err(transition)?;
        let audio = SynthesizedAudio {
            token,
            path: audio_path,
            sample_rate: speech.sample_rate,
            device: speech.device,
        };

        // Step 3: video
        let video_path = self.store.video_path(token);
        let rendered = match self
            .video
            .generate_video(image.path.clone(), audio.path.clone(), video_path.clone())
            .await
        {
            Ok(rendered) => rendered,
            Err(e) => {
                let e = match e {
                    ApplicationError::VideoGeneration(_) => e,
                    other => ApplicationError::VideoGeneration(other.to_string()),
                };
                return Err(fail(&mut job, PipelineStep::VideoGeneration, e));
            },
        };
        job.mark_video_generated().map_err(transition)?;
        let video = GeneratedVideo {
            token,
            path: video_path,
            size_bytes: rendered.size_bytes,
        };

        job.mark_done().map_err(transition)?;

        #[allow(clippy::cast_possible_truncation)]
        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            video = %video.reference(),
            device = %audio.device,
            processing_time_ms,
            "Avatar video generated"
        );

        Ok(GenerationResult {
            job,
            image,
            audio,
            video,
            speech_fallbacks: speech.fallbacks,
            processing_time_ms,
        })
    }

    /// Resolve a client-supplied video reference
    ///
    /// Malformed references are reported as not found, same as missing files.
    #[instrument(skip(self))]
    pub async fn locate_video(&self, reference: &str) -> Result<GeneratedVideo, ApplicationError> {
        let not_found = || ApplicationError::NotFound(format!("video {reference}"));
        let token = parse_video_file_name(reference).map_err(|e| {
            debug!(error = %e, "Malformed video reference");
            not_found()
        })?;
        self.store.find_video(token).await?.ok_or_else(not_found)
    }
}

/// Validate the form on behalf of `job`, recording a rejection as a failed job
fn validate(
    job: &mut GenerationJob,
    image: Option<FaceUpload>,
    text: Option<&str>,
) -> Result<GenerationRequest, ApplicationError> {
    match GenerationRequest::validate_for(job.token(), image, text) {
        Ok(request) => {
            job.mark_validated().map_err(transition)?;
            Ok(request)
        },
        Err(e) => {
            info!(reason = %e, "Rejected generation request");
            if let Err(t) = job.fail(PipelineStep::Validation, e.to_string()) {
                warn!(error = %t, "Could not record failure on job");
            }
            Err(e.into())
        },
    }
}

fn fail(job: &mut GenerationJob, step: PipelineStep, error: ApplicationError) -> ApplicationError {
    warn!(step = %step, error = %error, "Generation failed");
    if let Err(e) = job.fail(step, error.to_string()) {
        warn!(error = %e, "Could not record failure on job");
    }
    error
}

fn transition(err: domain::DomainError) -> ApplicationError {
    ApplicationError::Internal(err.to_string())
}
