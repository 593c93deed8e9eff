//! AI Lip-Sync - Wav2Lip video generation
//!
//! Wraps a local Wav2Lip checkout: [`Wav2LipInvoker::run_lip_sync`] turns a
//! face image and a speech WAV into an MP4, reporting how the child process
//! ended as a [`LipSyncOutcome`]. Installation checks live alongside so the
//! server and CLI can tell operators what is missing.
//!
//! # Example
//!
//! ```ignore
//! use ai_lipsync::{LipSyncConfig, Wav2LipInvoker};
//!
//! let invoker = Wav2LipInvoker::new(LipSyncConfig::default())?;
//! let outcome = invoker
//!     .run_lip_sync("face.png".as_ref(), "speech.wav".as_ref(), "video/out.mp4".as_ref())
//!     .await;
//! assert!(outcome.is_success(), "{outcome}");
//! ```

pub mod config;
pub mod error;
pub mod installation;
pub mod invoker;
pub mod outcome;

pub use config::LipSyncConfig;
pub use error::LipSyncError;
pub use installation::{CheckpointStatus, InstallationReport};
pub use invoker::Wav2LipInvoker;
pub use outcome::LipSyncOutcome;
