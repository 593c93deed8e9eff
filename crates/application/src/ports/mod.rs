//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod artifact_store;
mod device_port;
mod speech_port;
mod video_port;

#[cfg(test)]
pub use artifact_store::MockArtifactStorePort;
pub use artifact_store::{ArtifactStorePort, DirectoryStatus};
#[cfg(test)]
pub use device_port::MockDevicePort;
pub use device_port::{BackendSnapshot, DevicePort, DeviceSnapshot};
#[cfg(test)]
pub use speech_port::MockSpeechSynthesisPort;
pub use speech_port::{SpeechResult, SpeechSynthesisPort};
#[cfg(test)]
pub use video_port::MockVideoGenerationPort;
pub use video_port::{VideoGenerationPort, VideoResult};
