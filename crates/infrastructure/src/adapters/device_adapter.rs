//! Device adapter - Implements DevicePort over the ai_speech device prober
//!
//! Probing spawns an interpreter per backend, so the snapshot served to
//! status requests is cached for a configurable time. Synthesis does not go
//! through this adapter and always probes afresh.

use std::sync::Arc;
use std::time::Duration;

use ai_speech::{BackendStatus, DeviceProber, DeviceReport, SpeechConfig, torch_prober};
use application::ports::{BackendSnapshot, DevicePort, DeviceSnapshot};
use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

/// Cached device reports keyed by nothing; there is only one host
type SnapshotCache = Cache<(), DeviceSnapshot>;

/// Adapter exposing device selection to the application layer
pub struct DeviceAdapter {
    prober: Arc<DeviceProber>,
    cache: Option<SnapshotCache>,
}

impl std::fmt::Debug for DeviceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAdapter")
            .field("prober", &self.prober)
            .field("cached", &self.cache.as_ref().map(Cache::entry_count))
            .finish()
    }
}

impl DeviceAdapter {
    /// Create an adapter keeping snapshots for `ttl` (zero disables caching)
    #[must_use]
    pub fn new(prober: Arc<DeviceProber>, ttl: Duration) -> Self {
        let cache = (!ttl.is_zero())
            .then(|| Cache::builder().max_capacity(1).time_to_live(ttl).build());
        Self { prober, cache }
    }

    /// Adapter probing through the interpreter configured for speech
    #[must_use]
    pub fn from_config(config: &SpeechConfig, ttl: Duration) -> Self {
        Self::new(Arc::new(torch_prober(config)), ttl)
    }

    async fn probe(&self) -> DeviceSnapshot {
        debug!("Probing compute backends");
        to_snapshot(self.prober.device_info().await)
    }
}

#[async_trait]
impl DevicePort for DeviceAdapter {
    #[instrument(skip(self))]
    async fn device_snapshot(&self) -> DeviceSnapshot {
        match &self.cache {
            // Concurrent misses share one probe run
            Some(cache) => cache.get_with((), self.probe()).await,
            None => self.probe().await,
        }
    }
}

fn to_backend(status: BackendStatus) -> BackendSnapshot {
    BackendSnapshot {
        available: status.available,
        functional: status.functional,
        reason: status.reason,
    }
}

fn to_snapshot(report: DeviceReport) -> DeviceSnapshot {
    DeviceSnapshot {
        optimal_device: report.optimal_device,
        is_container: report.environment.is_container,
        os: report.environment.os,
        architecture: report.environment.architecture,
        mps: to_backend(report.mps),
        cuda: to_backend(report.cuda),
        recommendations: report.recommendations,
    }
}
