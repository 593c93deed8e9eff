//! Application configuration
//!
//! Split into sections:
//! - `server`: HTTP server settings
//! - `storage`: artifact directories
//! - `speech`: TTS command and device probing (from `ai_speech`)
//! - `lip_sync`: Wav2Lip checkout and invocation (from `ai_lipsync`)
//!
//! Sources, later ones winning: built-in defaults, an optional
//! `config.toml`, then `FACEGEN__<SECTION>__<KEY>` environment variables.

mod server;
mod storage;

use ai_lipsync::LipSyncConfig;
use ai_speech::SpeechConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use server::ServerConfig;
pub use storage::StorageConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FACEGEN";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Artifact directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Lip-sync configuration
    #[serde(default)]
    pub lip_sync: LipSyncConfig,
}

impl AppConfig {
    /// Load configuration from environment and optional `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from environment and the optional file `name`
    ///
    /// `name` may omit the extension; the format is picked from whatever
    /// file is found.
    pub fn load_from(name: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5001)?
            // Load from file if exists
            .add_source(config::File::with_name(name).required(false))
            // Override with environment variables (e.g., FACEGEN__SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(file = name, "Configuration sources merged");
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate().map_err(|e| format!("server: {e}"))?;
        self.storage.validate().map_err(|e| format!("storage: {e}"))?;
        self.speech.validate().map_err(|e| format!("speech: {e}"))?;
        self.lip_sync
            .validate()
            .map_err(|e| format!("lip_sync: {e}"))?;
        Ok(())
    }
}
