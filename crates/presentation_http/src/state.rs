//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;

use application::{
    ApplicationError, ArtifactStorePort, DevicePort, GenerationService, SpeechSynthesisPort,
    StatusService, VideoGenerationPort,
};
use infrastructure::{AppConfig, DeviceAdapter, FsArtifactStore, LipSyncAdapter, SpeechAdapter};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upload → speech → video pipeline
    pub generation: Arc<GenerationService>,
    /// Health view for `/status`
    pub status: Arc<StatusService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Assemble state from already built ports
    pub fn new(
        config: AppConfig,
        store: Arc<dyn ArtifactStorePort>,
        speech: Arc<dyn SpeechSynthesisPort>,
        video: Arc<dyn VideoGenerationPort>,
        devices: Arc<dyn DevicePort>,
    ) -> Self {
        let generation = GenerationService::new(Arc::clone(&store), speech, Arc::clone(&video));
        let status = StatusService::new(store, devices, video);
        Self {
            generation: Arc::new(generation),
            status: Arc::new(status),
            config: Arc::new(config),
        }
    }

    /// Wire the production adapters described by `config`
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if an adapter rejects its
    /// section of the configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, ApplicationError> {
        let speech = SpeechAdapter::from_config(&config.speech)?;
        let video = LipSyncAdapter::from_config(config.lip_sync.clone())?;
        let devices = DeviceAdapter::from_config(
            &config.speech,
            Duration::from_secs(config.server.device_report_ttl_secs),
        );
        let store = FsArtifactStore::new(config.storage.clone());

        Ok(Self::new(
            config,
            Arc::new(store),
            Arc::new(speech),
            Arc::new(video),
            Arc::new(devices),
        ))
    }

    /// Largest accepted request body
    pub fn max_upload_bytes(&self) -> usize {
        self.config.server.max_upload_bytes
    }
}
