//! Result of one lip-sync run

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// How a lip-sync run ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LipSyncOutcome {
    /// Process exited 0 and the video exists
    Completed {
        output: PathBuf,
        size_bytes: u64,
        elapsed: Duration,
    },
    /// Face or audio input does not exist; nothing was started
    MissingInput { path: PathBuf },
    /// Checkout or checkpoint is missing; nothing was started
    NotInstalled {
        install_dir: PathBuf,
        checkpoint: PathBuf,
    },
    /// Process could not be started
    LaunchFailed { reason: String },
    /// Process exited non-zero or was killed by a signal
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    /// Process exited 0 but left no video behind
    MissingOutput { path: PathBuf },
    /// Process exceeded the timeout and was killed
    TimedOut { after: Duration },
}

impl LipSyncOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Short name for logs and metrics labels
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Completed { .. } => "completed",
            Self::MissingInput { .. } => "missing_input",
            Self::NotInstalled { .. } => "not_installed",
            Self::LaunchFailed { .. } => "launch_failed",
            Self::ProcessFailed { .. } => "process_failed",
            Self::MissingOutput { .. } => "missing_output",
            Self::TimedOut { .. } => "timed_out",
        }
    }
}

impl fmt::Display for LipSyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed {
                output,
                size_bytes,
                elapsed,
            } => write!(
                f,
                "video written to {} ({size_bytes} bytes in {:.1}s)",
                output.display(),
                elapsed.as_secs_f64()
            ),
            Self::MissingInput { path } => write!(f, "input file not found: {}", path.display()),
            Self::NotInstalled { .. } => write!(f, "Wav2Lip not installed"),
            Self::LaunchFailed { reason } => write!(f, "failed to launch lip-sync: {reason}"),
            Self::ProcessFailed {
                exit_code: Some(code),
                ..
            } => write!(f, "lip-sync exited with code {code}"),
            Self::ProcessFailed { exit_code: None, .. } => {
                write!(f, "lip-sync was terminated by a signal")
            },
            Self::MissingOutput { path } => write!(
                f,
                "lip-sync reported success but {} was not created",
                path.display()
            ),
            Self::TimedOut { after } => {
                write!(f, "lip-sync timed out after {}s", after.as_secs())
            },
        }
    }
}
