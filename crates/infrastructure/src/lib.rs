//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the filesystem
//! artifact store, speech synthesis, Wav2Lip video generation and device
//! inspection. Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, ServerConfig, StorageConfig};
pub use persistence::FsArtifactStore;
pub use telemetry::{DEFAULT_LOG_FILTER, LogFormat, init_logging};
