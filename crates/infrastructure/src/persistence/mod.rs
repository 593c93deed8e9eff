//! Persistence layer
//!
//! Generated artifacts are plain files; there is no database.

mod artifact_store;

pub use artifact_store::FsArtifactStore;
