//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod device_adapter;
mod lipsync_adapter;
mod speech_adapter;

pub use device_adapter::DeviceAdapter;
pub use lipsync_adapter::LipSyncAdapter;
pub use speech_adapter::SpeechAdapter;
