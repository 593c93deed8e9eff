//! Wav2Lip subprocess invoker
//!
//! Each run spawns
//!
//! ```text
//! <python> <inference_script> --checkpoint_path <ckpt> --face <face>
//!     --audio <audio> --outfile <out> [--pads t b l r]
//! ```
//!
//! and waits for it with a deadline. The child is killed if the deadline
//! passes or the calling future is dropped.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, error, info, instrument, warn};

use crate::config::LipSyncConfig;
use crate::error::LipSyncError;
use crate::installation::InstallationReport;
use crate::outcome::LipSyncOutcome;

/// Captured stderr kept in an outcome
const MAX_STDERR_BYTES: usize = 8 * 1024;

/// Runs Wav2Lip inference as a child process
#[derive(Debug, Clone)]
pub struct Wav2LipInvoker {
    config: LipSyncConfig,
}

impl Wav2LipInvoker {
    /// Create an invoker
    pub fn new(config: LipSyncConfig) -> Result<Self, LipSyncError> {
        config.validate().map_err(LipSyncError::Configuration)?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &LipSyncConfig {
        &self.config
    }

    /// Install directory and configured checkpoint both exist
    pub fn check_installation(&self) -> bool {
        let installed =
            self.config.install_dir.exists() && self.config.checkpoint_path.exists();
        if !installed {
            debug!(
                install_dir = %self.config.install_dir.display(),
                checkpoint = %self.config.checkpoint_path.display(),
                "Wav2Lip installation incomplete"
            );
        }
        installed
    }

    /// Detailed view of the checkout
    pub fn installation_report(&self) -> InstallationReport {
        InstallationReport::inspect(
            &self.config.install_dir,
            &self.config.inference_script,
            &self.config.checkpoint_path,
        )
    }

    /// Argument list passed to the interpreter
    pub fn arguments(&self, face: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.config.inference_script.clone().into(),
            "--checkpoint_path".into(),
            self.config.checkpoint_path.clone().into(),
            "--face".into(),
            face.into(),
            "--audio".into(),
            audio.into(),
            "--outfile".into(),
            output.into(),
        ];
        if let Some(pads) = self.config.pads {
            args.push("--pads".into());
            args.extend(pads.iter().map(|p| OsString::from(p.to_string())));
        }
        args
    }

    /// Generate a lip-synced video of `face` speaking `audio` into `output`
    #[instrument(skip(self), fields(face = %face.display(), audio = %audio.display(), output = %output.display()))]
    pub async fn run_lip_sync(&self, face: &Path, audio: &Path, output: &Path) -> LipSyncOutcome {
        for input in [face, audio] {
            if !input.is_file() {
                warn!(path = %input.display(), "Lip-sync input not found");
                return LipSyncOutcome::MissingInput {
                    path: input.to_path_buf(),
                };
            }
        }

        if !self.check_installation() {
            warn!("Wav2Lip not installed, skipping lip-sync");
            return LipSyncOutcome::NotInstalled {
                install_dir: self.config.install_dir.clone(),
                checkpoint: self.config.checkpoint_path.clone(),
            };
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!(dir = %parent.display(), error = %e, "Cannot create output directory");
                return LipSyncOutcome::LaunchFailed {
                    reason: format!("cannot create {}: {e}", parent.display()),
                };
            }
        }

        let mut cmd = Command::new(&self.config.python_executable);
        cmd.args(self.arguments(face, audio, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!("Running lip-sync: {:?}", cmd);
        let started = Instant::now();

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(python = %self.config.python_executable, error = %e, "Failed to start lip-sync");
                return LipSyncOutcome::LaunchFailed {
                    reason: e.to_string(),
                };
            },
        };

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let result = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!(error = %e, "Failed to wait for lip-sync");
                return LipSyncOutcome::LaunchFailed {
                    reason: e.to_string(),
                };
            },
            Err(_) => {
                error!(timeout_secs = timeout.as_secs(), "Lip-sync timed out, child killed");
                return LipSyncOutcome::TimedOut { after: timeout };
            },
        };
        let elapsed = started.elapsed();

        if !result.status.success() {
            let stderr = tail(&String::from_utf8_lossy(&result.stderr), MAX_STDERR_BYTES);
            error!(
                exit_code = ?result.status.code(),
                stderr = %stderr,
                "Lip-sync failed"
            );
            return LipSyncOutcome::ProcessFailed {
                exit_code: result.status.code(),
                stderr,
            };
        }

        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.is_file() => {
                info!(
                    elapsed_secs = elapsed.as_secs_f64(),
                    size_bytes = meta.len(),
                    "Video generated"
                );
                LipSyncOutcome::Completed {
                    output: output.to_path_buf(),
                    size_bytes: meta.len(),
                    elapsed,
                }
            },
            _ => {
                error!("Lip-sync exited successfully but produced no video");
                LipSyncOutcome::MissingOutput {
                    path: output.to_path_buf(),
                }
            },
        }
    }
}

/// Last `max_bytes` of `text`, trimmed, cut on a char boundary
fn tail(text: &str, max_bytes: usize) -> String {
    let text = text.trim();
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut start = text.len() - max_bytes;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}
