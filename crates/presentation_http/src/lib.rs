//! FaceGen HTTP presentation layer
//!
//! Serves the upload page, runs generation requests and hands out the
//! resulting videos.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
