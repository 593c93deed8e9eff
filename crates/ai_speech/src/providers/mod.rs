//! Concrete engine and probe implementations

pub mod command;
pub mod torch_probe;

pub use command::{CommandTtsEngine, CommandTtsEngineFactory};
pub use torch_probe::TorchBackendProbe;
