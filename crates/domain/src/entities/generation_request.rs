//! Validated input of one avatar generation

use serde::Serialize;

use crate::errors::DomainError;
use crate::value_objects::{ImageExtension, RequestToken};

/// Face image as received from the client, not yet validated
#[derive(Clone, PartialEq, Eq)]
pub struct FaceUpload {
    /// Filename supplied by the client (untrusted)
    pub filename: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl FaceUpload {
    /// Create a new upload
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for FaceUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceUpload")
            .field("filename", &self.filename)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// A generation request that passed validation
///
/// Can only be built through [`GenerationRequest::validate`], so holding one
/// proves the upload and text are acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    token: RequestToken,
    image: FaceUpload,
    extension: ImageExtension,
    text: String,
}

impl GenerationRequest {
    /// Validate raw form input
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. the image field is present
    /// 2. its filename is non-empty
    /// 3. its extension is allow-listed
    /// 4. the text is present and non-blank after trimming
    pub fn validate(image: Option<FaceUpload>, text: Option<&str>) -> Result<Self, DomainError> {
        Self::validate_for(RequestToken::new(), image, text)
    }

    /// Same as [`GenerationRequest::validate`], for a token issued beforehand
    pub fn validate_for(
        token: RequestToken,
        image: Option<FaceUpload>,
        text: Option<&str>,
    ) -> Result<Self, DomainError> {
        let image = image.ok_or(DomainError::MissingImage)?;
        if image.filename.is_empty() {
            return Err(DomainError::EmptyImageName);
        }
        let extension = ImageExtension::from_filename(&image.filename)?;
        let text = text.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(DomainError::MissingText);
        }

        Ok(Self {
            token,
            image,
            extension,
            text: text.to_string(),
        })
    }

    /// Token correlating every artifact of this request
    pub const fn token(&self) -> RequestToken {
        self.token
    }

    /// The uploaded face image
    pub const fn image(&self) -> &FaceUpload {
        &self.image
    }

    /// Validated image extension
    pub const fn extension(&self) -> ImageExtension {
        self.extension
    }

    /// Trimmed text to speak
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Short preview of the text for logs
    pub fn text_preview(&self) -> String {
        preview(&self.text, 50)
    }

    /// Split into token, upload, extension and text
    pub fn into_parts(self) -> (RequestToken, FaceUpload, ImageExtension, String) {
        (self.token, self.image, self.extension, self.text)
    }
}

/// Summary returned to callers once a request completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    /// Token of the completed request
    pub token: RequestToken,
    /// Video reference usable for download
    pub video_filename: String,
    /// Size of the produced video
    pub video_size_bytes: u64,
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
