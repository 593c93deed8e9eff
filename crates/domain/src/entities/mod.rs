//! Domain entities - Objects with identity and lifecycle

mod artifacts;
mod generation_job;
mod generation_request;

pub use artifacts::{GeneratedVideo, SynthesizedAudio, UploadedImage};
pub use generation_job::{GenerationJob, GenerationState, PipelineStep};
pub use generation_request::{FaceUpload, GenerationRequest, GenerationSummary};
