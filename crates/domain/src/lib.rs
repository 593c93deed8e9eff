//! Domain layer for FaceGen
//!
//! Contains the request token, device and image value objects, the artifact
//! entities produced by the pipeline and the per-request generation state
//! machine. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
