//! Avatar generation handler

use axum::{
    Json,
    extract::{Multipart, State},
};
use domain::FaceUpload;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Form field carrying the face image
pub const IMAGE_FIELD: &str = "face_image";
/// Form field carrying the text to speak
pub const TEXT_FIELD: &str = "text";

/// Successful generation response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    /// Reference accepted by `/download/{id}`
    pub video_filename: String,
    pub download_url: String,
}

/// Raw form contents before validation
#[derive(Debug, Default)]
struct GenerateForm {
    image: Option<FaceUpload>,
    text: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, ApiError> {
    let mut form = GenerateForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                // A file input left empty still arrives, with an empty name
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.image = Some(FaceUpload::new(filename, bytes.to_vec()));
            },
            Some(TEXT_FIELD) => form.text = Some(field.text().await?),
            other => debug!(field = ?other, "Ignoring form field"),
        }
    }
    Ok(form)
}

/// Generate a talking-head video from a face image and text
#[instrument(skip_all)]
pub async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, ApiError> {
    let form = read_form(multipart).await?;
    let result = state.generation.generate(form.image, form.text).await?;

    let video_filename = result.video.reference();
    Ok(Json(GenerateResponse {
        success: true,
        message: "Digital avatar generated successfully".to_string(),
        download_url: format!("/download/{video_filename}"),
        video_filename,
    }))
}
