//! Application layer - Use cases and orchestration
//!
//! Contains the generation pipeline and status use cases together with the
//! ports they drive. Infrastructure adapters implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
