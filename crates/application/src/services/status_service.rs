//! Status service - Aggregates the health view served on `/status`

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use crate::ports::{ArtifactStorePort, DevicePort, DeviceSnapshot, DirectoryStatus, VideoGenerationPort};

/// Snapshot returned by `/status`
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Always `healthy` while the process can answer
    pub status: &'static str,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub directories: DirectoryStatus,
    pub device: DeviceSnapshot,
    pub lip_sync_installed: bool,
}

/// Service assembling the status report
pub struct StatusService {
    store: Arc<dyn ArtifactStorePort>,
    devices: Arc<dyn DevicePort>,
    video: Arc<dyn VideoGenerationPort>,
}

impl fmt::Debug for StatusService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusService").finish_non_exhaustive()
    }
}

impl StatusService {
    pub fn new(
        store: Arc<dyn ArtifactStorePort>,
        devices: Arc<dyn DevicePort>,
        video: Arc<dyn VideoGenerationPort>,
    ) -> Self {
        Self {
            store,
            devices,
            video,
        }
    }

    /// Build the current status report
    #[instrument(skip(self))]
    pub async fn status(&self) -> StatusReport {
        let (directories, device) =
            tokio::join!(self.store.directory_status(), self.devices.device_snapshot());

        StatusReport {
            status: "healthy",
            timestamp: epoch_seconds(),
            directories,
            device,
            lip_sync_installed: self.video.is_installed(),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn epoch_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
