//! Artifact store port - Where uploads, audio and video live

use std::path::PathBuf;

use async_trait::async_trait;
use domain::{FaceUpload, GeneratedVideo, ImageExtension, RequestToken, UploadedImage};
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Existence of the three artifact directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectoryStatus {
    pub uploads: bool,
    pub audio: bool,
    pub video: bool,
}

impl DirectoryStatus {
    pub const fn all_present(&self) -> bool {
        self.uploads && self.audio && self.video
    }
}

/// Port for per-request artifact files
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// Persist the uploaded face image
    async fn save_upload(
        &self,
        token: RequestToken,
        upload: FaceUpload,
        extension: ImageExtension,
    ) -> Result<UploadedImage, ApplicationError>;

    /// Where the audio of `token` goes
    fn audio_path(&self, token: RequestToken) -> PathBuf;

    /// Where the video of `token` goes
    fn video_path(&self, token: RequestToken) -> PathBuf;

    /// Look up the finished video of `token`
    async fn find_video(&self, token: RequestToken)
    -> Result<Option<GeneratedVideo>, ApplicationError>;

    /// Check the artifact directories
    async fn directory_status(&self) -> DirectoryStatus;
}
