//! Allow-listed face image extensions

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Image file extension accepted for face uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Gif,
}

impl ImageExtension {
    /// Every accepted extension
    pub const ALL: [Self; 4] = [Self::Png, Self::Jpg, Self::Jpeg, Self::Gif];

    /// Lowercase extension without the dot
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    /// MIME type of images with this extension
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    /// Extract the extension from a filename
    ///
    /// Only the text after the last dot counts and the comparison ignores
    /// case, so `face.PNG` is accepted while `png` (no dot) and
    /// `face.png.exe` are not.
    pub fn from_filename(filename: &str) -> Result<Self, DomainError> {
        let reject = || DomainError::UnsupportedImageType(filename.to_string());
        let (_, ext) = filename.rsplit_once('.').ok_or_else(reject)?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            _ => Err(reject()),
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
