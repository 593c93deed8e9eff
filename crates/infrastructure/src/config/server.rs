//! HTTP server configuration.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Further ports tried in sequence when `port` is taken (0 = fail)
    #[serde(default)]
    pub port_fallback_attempts: u16,

    /// Graceful shutdown timeout in seconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Log format: "json" for structured JSON logs, "text" for human-readable
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Maximum request body size in bytes (default: 16MB)
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,

    /// Seconds a device report served on `/status` stays fresh
    #[serde(default = "default_device_report_ttl")]
    pub device_report_ttl_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5001
}

const fn default_shutdown_timeout() -> u64 {
    30
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_max_upload() -> usize {
    16 * 1024 * 1024 // 16MB
}

const fn default_device_report_ttl() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_fallback_attempts: 0,
            shutdown_timeout_secs: default_shutdown_timeout(),
            log_format: default_log_format(),
            max_upload_bytes: default_max_upload(),
            device_report_ttl_secs: default_device_report_ttl(),
        }
    }
}

impl ServerConfig {
    /// Address string for binding `port`
    #[must_use]
    pub fn address(&self, port: u16) -> String {
        format!("{}:{port}", self.host)
    }

    /// Ports to try, in order
    pub fn candidate_ports(&self) -> impl Iterator<Item = u16> + '_ {
        (0..=self.port_fallback_attempts).filter_map(|offset| self.port.checked_add(offset))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Server host must not be empty".to_string());
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "Log format must be 'text' or 'json', got '{}'",
                self.log_format
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err("Maximum upload size must be greater than 0".to_string());
        }
        Ok(())
    }
}
