//! Route definitions

use std::any::Any;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{error::ApiError, handlers, middleware::request_id, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let max_upload = state.max_upload_bytes();

    Router::new()
        // Upload form; POST / mirrors /generate
        .route(
            "/",
            get(handlers::index::index).post(handlers::generate::generate),
        )
        .route("/generate", post(handlers::generate::generate))
        .route("/download/{id}", get(handlers::download::download))
        .route("/status", get(handlers::status::status))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(request_id))
        // Attach state
        .with_state(state)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
