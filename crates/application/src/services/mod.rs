//! Application services - Use case implementations

mod generation_service;
mod status_service;

pub use generation_service::{GenerationResult, GenerationService};
pub use status_service::{StatusReport, StatusService};
