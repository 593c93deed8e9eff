//! Backend probe running a tiny PyTorch script
//!
//! The script exits with 0 when a tensor operation succeeded on the device,
//! 3 when PyTorch (or the backend) is missing, and anything else when the
//! operation itself blew up.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use domain::DeviceTag;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::device::{BackendProbe, BackendStatus};

const EXIT_UNAVAILABLE: i32 = 3;

const MPS_SCRIPT: &str = r#"
import sys
try:
    import torch
except Exception as e:
    print(f"PyTorch not importable: {e}", file=sys.stderr)
    sys.exit(3)
if not (hasattr(torch.backends, "mps") and torch.backends.mps.is_available()):
    print("PyTorch MPS not available", file=sys.stderr)
    sys.exit(3)
t = torch.randn(1, 1).to("mps")
(t + t).cpu()
"#;

const CUDA_SCRIPT: &str = r#"
import sys
try:
    import torch
except Exception as e:
    print(f"PyTorch not importable: {e}", file=sys.stderr)
    sys.exit(3)
if not torch.cuda.is_available():
    print("PyTorch CUDA not available", file=sys.stderr)
    sys.exit(3)
t = torch.randn(1, 1).to("cuda")
(t + t).cpu()
"#;

/// Probe for one accelerator through the Python interpreter
#[derive(Debug, Clone)]
pub struct TorchBackendProbe {
    python: String,
    device: DeviceTag,
    timeout: Duration,
}

impl TorchBackendProbe {
    /// Probe for Apple Silicon GPUs
    pub fn mps(python: impl Into<String>, timeout: Duration) -> Self {
        Self {
            python: python.into(),
            device: DeviceTag::Mps,
            timeout,
        }
    }

    /// Probe for NVIDIA GPUs
    pub fn cuda(python: impl Into<String>, timeout: Duration) -> Self {
        Self {
            python: python.into(),
            device: DeviceTag::Cuda,
            timeout,
        }
    }

    const fn script(&self) -> &'static str {
        match self.device {
            DeviceTag::Mps => MPS_SCRIPT,
            DeviceTag::Cuda | DeviceTag::Cpu => CUDA_SCRIPT,
        }
    }

    fn label(&self) -> &'static str {
        match self.device {
            DeviceTag::Mps => "MPS",
            DeviceTag::Cuda | DeviceTag::Cpu => "CUDA",
        }
    }
}

#[async_trait]
impl BackendProbe for TorchBackendProbe {
    fn device(&self) -> DeviceTag {
        self.device
    }

    #[instrument(skip(self), fields(device = %self.device))]
    async fn probe(&self) -> BackendStatus {
        if self.device == DeviceTag::Cpu {
            return BackendStatus::functional();
        }

        let mut cmd = Command::new(&self.python);
        cmd.arg("-c")
            .arg(self.script())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!(python = %self.python, error = %e, "Probe interpreter not runnable");
                return BackendStatus::unavailable(format!(
                    "Error checking {}: {e}",
                    self.label()
                ));
            },
        };

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return BackendStatus::unavailable(format!("Error checking {}: {e}", self.label()));
            },
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Device probe timed out");
                return BackendStatus::unavailable(format!(
                    "Error checking {}: probe timed out after {}s",
                    self.label(),
                    self.timeout.as_secs()
                ));
            },
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr.trim().lines().last().unwrap_or_default().to_string();

        match output.status.code() {
            Some(0) => BackendStatus::functional(),
            Some(EXIT_UNAVAILABLE) => BackendStatus::unavailable(if detail.is_empty() {
                format!("PyTorch {} not available", self.label())
            } else {
                detail
            }),
            _ => BackendStatus::broken(if detail.is_empty() {
                format!("probe exited with {}", output.status)
            } else {
                detail
            }),
        }
    }
}
