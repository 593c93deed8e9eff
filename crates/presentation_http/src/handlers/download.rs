//! Video download handler

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::{error::ApiError, state::AppState};

/// Query string of a download
#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    /// `true` asks the browser to save instead of play
    pub download: Option<String>,
}

impl DownloadQuery {
    fn as_attachment(&self) -> bool {
        self.download.as_deref() == Some("true")
    }
}

/// Serve a generated video, streamed from disk
#[instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let video = state.generation.locate_video(&reference).await?;
    let file = tokio::fs::File::open(&video.path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open {}: {e}", video.path.display())))?;
    let body = Body::from_stream(ReaderStream::new(file));

    let headers = [
        (header::CONTENT_TYPE, "video/mp4".to_string()),
        (header::CONTENT_LENGTH, video.size_bytes.to_string()),
    ];
    if query.as_attachment() {
        let disposition = format!("attachment; filename=\"{}\"", video.reference());
        Ok((headers, [(header::CONTENT_DISPOSITION, disposition)], body).into_response())
    } else {
        Ok((headers, body).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_literal_true_means_attachment() {
        let query = |v: Option<&str>| DownloadQuery {
            download: v.map(str::to_string),
        };
        assert!(query(Some("true")).as_attachment());
        assert!(!query(Some("1")).as_attachment());
        assert!(!query(Some("TRUE")).as_attachment());
        assert!(!query(None).as_attachment());
    }
}
