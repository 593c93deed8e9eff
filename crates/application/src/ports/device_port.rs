//! Device port - Which compute device speech synthesis would use

use async_trait::async_trait;
use domain::DeviceTag;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

/// Probe result for one accelerator backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendSnapshot {
    pub available: bool,
    pub functional: bool,
    pub reason: String,
}

/// Point-in-time view of the device decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    pub optimal_device: DeviceTag,
    pub is_container: bool,
    pub os: String,
    pub architecture: String,
    pub mps: BackendSnapshot,
    pub cuda: BackendSnapshot,
    pub recommendations: Vec<String>,
}

/// Port for device inspection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DevicePort: Send + Sync {
    /// Current device decision with its inputs
    async fn device_snapshot(&self) -> DeviceSnapshot;
}
