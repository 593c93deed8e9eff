//! Status handler

use application::StatusReport;
use axum::{Json, extract::State};

use crate::state::AppState;

/// Report directory, device and lip-sync readiness
pub async fn status(State(state): State<AppState>) -> Json<StatusReport> {
    Json(state.status.status().await)
}
