//! Files produced by the generation pipeline
//!
//! Each artifact is written once and never modified afterwards.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::value_objects::{DeviceTag, ImageExtension, RequestToken};

/// Face image stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub token: RequestToken,
    pub path: PathBuf,
    pub extension: ImageExtension,
    pub size_bytes: u64,
}

/// Mono WAV file produced by speech synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedAudio {
    pub token: RequestToken,
    pub path: PathBuf,
    pub sample_rate: u32,
    /// Device the successful inference ran on
    pub device: DeviceTag,
}

/// MP4 produced by the lip-sync stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedVideo {
    pub token: RequestToken,
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl GeneratedVideo {
    /// File name used as the client-facing video reference
    #[must_use]
    pub fn reference(&self) -> String {
        file_name_of(&self.path)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::video_file_name;

    #[test]
    fn video_reference_is_file_name() {
        let token = RequestToken::new();
        let video = GeneratedVideo {
            token,
            path: PathBuf::from("video").join(video_file_name(token)),
            size_bytes: 10,
        };
        assert_eq!(video.reference(), video_file_name(token));
    }

    #[test]
    fn video_reference_empty_for_root() {
        let video = GeneratedVideo {
            token: RequestToken::new(),
            path: PathBuf::from("/"),
            size_bytes: 0,
        };
        assert_eq!(video.reference(), "");
    }
}
