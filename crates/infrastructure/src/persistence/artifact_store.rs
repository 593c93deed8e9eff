//! Filesystem artifact store
//!
//! Implements the `ArtifactStorePort` over three flat directories. Files are
//! named after the request token and never rewritten or deleted.

use std::io;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::{ArtifactStorePort, DirectoryStatus};
use async_trait::async_trait;
use domain::{
    FaceUpload, GeneratedVideo, ImageExtension, RequestToken, UploadedImage, audio_file_name,
    face_file_name, video_file_name,
};
use tokio::fs;
use tracing::{debug, info, instrument};

use crate::config::StorageConfig;

/// Artifact store writing to local directories
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    config: StorageConfig,
}

impl FsArtifactStore {
    #[must_use]
    pub const fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Create the upload, audio and video directories if missing
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the first directory that cannot be created.
    pub async fn ensure_directories(&self) -> io::Result<()> {
        for dir in self.directories() {
            fs::create_dir_all(dir).await?;
            debug!(dir = %dir.display(), "Artifact directory ready");
        }
        Ok(())
    }

    fn directories(&self) -> [&Path; 3] {
        [
            &self.config.upload_dir,
            &self.config.audio_dir,
            &self.config.video_dir,
        ]
    }
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

#[async_trait]
impl ArtifactStorePort for FsArtifactStore {
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    async fn save_upload(
        &self,
        token: RequestToken,
        upload: FaceUpload,
        extension: ImageExtension,
    ) -> Result<UploadedImage, ApplicationError> {
        let path = self
            .config
            .upload_dir
            .join(face_file_name(token, &upload.filename, extension));

        fs::create_dir_all(&self.config.upload_dir).await?;
        fs::write(&path, &upload.bytes).await.map_err(|e| {
            ApplicationError::Storage(format!("Failed to write {}: {e}", path.display()))
        })?;

        let size_bytes = upload.bytes.len() as u64;
        info!(path = %path.display(), size_bytes, "Face image saved");
        Ok(UploadedImage {
            token,
            path,
            extension,
            size_bytes,
        })
    }

    fn audio_path(&self, token: RequestToken) -> PathBuf {
        self.config.audio_dir.join(audio_file_name(token))
    }

    fn video_path(&self, token: RequestToken) -> PathBuf {
        self.config.video_dir.join(video_file_name(token))
    }

    #[instrument(skip(self))]
    async fn find_video(
        &self,
        token: RequestToken,
    ) -> Result<Option<GeneratedVideo>, ApplicationError> {
        let path = self.video_path(token);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(GeneratedVideo {
                token,
                path,
                size_bytes: meta.len(),
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApplicationError::Storage(format!(
                "Failed to stat {}: {e}",
                path.display()
            ))),
        }
    }

    async fn directory_status(&self) -> DirectoryStatus {
        let (uploads, audio, video) = tokio::join!(
            is_dir(&self.config.upload_dir),
            is_dir(&self.config.audio_dir),
            is_dir(&self.config.video_dir),
        );
        DirectoryStatus {
            uploads,
            audio,
            video,
        }
    }
}
