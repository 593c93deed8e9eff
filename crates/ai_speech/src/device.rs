//! Compute device selection
//!
//! Picks the device TTS inference runs on. Both accelerator backends are
//! probed with a real tensor operation rather than a capability flag alone,
//! because a backend can report itself available and still fail at runtime.
//!
//! Priority is fixed: MPS (outside containers) > CUDA > CPU.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use domain::DeviceTag;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Host environment facts relevant to device selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    /// Running inside a container (MPS is never usable there)
    pub is_container: bool,
    pub os: String,
    pub architecture: String,
}

impl EnvironmentInfo {
    /// Inspect the current host
    ///
    /// A container is recognised by the presence of `container_marker`.
    #[must_use]
    pub fn detect(container_marker: &Path) -> Self {
        Self {
            is_container: container_marker.exists(),
            os: std::env::consts::OS.to_string(),
            architecture: std::env::consts::ARCH.to_string(),
        }
    }
}

/// Result of probing one accelerator backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    /// Backend reported by the framework
    pub available: bool,
    /// A tensor operation actually succeeded on it
    pub functional: bool,
    pub reason: String,
}

impl BackendStatus {
    /// Backend present and a test operation succeeded
    #[must_use]
    pub fn functional() -> Self {
        Self {
            available: true,
            functional: true,
            reason: "Available and functional".to_string(),
        }
    }

    /// Backend absent, or probing it was impossible
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            functional: false,
            reason: reason.into(),
        }
    }

    /// Backend present but the test operation failed
    #[must_use]
    pub fn broken(detail: impl AsRef<str>) -> Self {
        Self {
            available: true,
            functional: false,
            reason: format!("Available but not functional: {}", detail.as_ref()),
        }
    }
}

/// Checks whether one accelerator backend works
///
/// Implementations must never fail: any problem is reported as a
/// non-functional [`BackendStatus`].
#[async_trait]
pub trait BackendProbe: Send + Sync + std::fmt::Debug {
    /// Device this probe is responsible for
    fn device(&self) -> DeviceTag;

    /// Run the probe
    async fn probe(&self) -> BackendStatus;
}

/// Pick a device from probe results
///
/// MPS if functional and not in a container; else CUDA if functional;
/// else CPU.
#[must_use]
pub fn select_device(env: &EnvironmentInfo, mps: &BackendStatus, cuda: &BackendStatus) -> DeviceTag {
    if mps.functional && !env.is_container {
        DeviceTag::Mps
    } else if cuda.functional {
        DeviceTag::Cuda
    } else {
        DeviceTag::Cpu
    }
}

/// Human-readable notes for a device decision
#[must_use]
pub fn recommendations(env: &EnvironmentInfo, device: DeviceTag) -> Vec<String> {
    let mut notes = vec![format!("Using {}", device.description())];
    notes.push(
        match device {
            DeviceTag::Mps => "Expect 2-5x performance improvement for large operations",
            DeviceTag::Cuda => "Expect significant performance improvement",
            DeviceTag::Cpu => "Large operations may be slower",
        }
        .to_string(),
    );
    if env.is_container {
        notes.push("Running in a container - MPS is not available in containers".to_string());
    }
    notes
}

/// Full picture of the device decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub environment: EnvironmentInfo,
    pub mps: BackendStatus,
    pub cuda: BackendStatus,
    pub optimal_device: DeviceTag,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone)]
enum EnvironmentSource {
    Detect(PathBuf),
    Fixed(EnvironmentInfo),
}

/// Selects the compute device for each synthesis call
///
/// Nothing is cached: every call re-inspects the environment and re-runs
/// the probes.
#[derive(Debug, Clone)]
pub struct DeviceProber {
    environment: EnvironmentSource,
    mps: Arc<dyn BackendProbe>,
    cuda: Arc<dyn BackendProbe>,
}

impl DeviceProber {
    /// Create a prober that detects the environment on each call
    pub fn new(
        container_marker: impl Into<PathBuf>,
        mps: Arc<dyn BackendProbe>,
        cuda: Arc<dyn BackendProbe>,
    ) -> Self {
        Self {
            environment: EnvironmentSource::Detect(container_marker.into()),
            mps,
            cuda,
        }
    }

    /// Create a prober with a fixed environment
    pub fn with_environment(
        environment: EnvironmentInfo,
        mps: Arc<dyn BackendProbe>,
        cuda: Arc<dyn BackendProbe>,
    ) -> Self {
        Self {
            environment: EnvironmentSource::Fixed(environment),
            mps,
            cuda,
        }
    }

    /// Current environment
    pub fn environment(&self) -> EnvironmentInfo {
        match &self.environment {
            EnvironmentSource::Detect(marker) => EnvironmentInfo::detect(marker),
            EnvironmentSource::Fixed(env) => env.clone(),
        }
    }

    /// Best device available right now
    #[instrument(skip(self))]
    pub async fn optimal_device(&self) -> DeviceTag {
        let env = self.environment();
        let mps = self.mps.probe().await;
        debug!(functional = mps.functional, reason = %mps.reason, "MPS probe");
        let cuda = self.cuda.probe().await;
        debug!(functional = cuda.functional, reason = %cuda.reason, "CUDA probe");

        let device = select_device(&env, &mps, &cuda);
        info!(device = %device, container = env.is_container, "Selected compute device");
        device
    }

    /// Device decision together with every input that led to it
    #[instrument(skip(self))]
    pub async fn device_info(&self) -> DeviceReport {
        let environment = self.environment();
        let mps = self.mps.probe().await;
        let cuda = self.cuda.probe().await;
        let optimal_device = select_device(&environment, &mps, &cuda);
        let recommendations = recommendations(&environment, optimal_device);

        DeviceReport {
            environment,
            mps,
            cuda,
            optimal_device,
            recommendations,
        }
    }
}
