//! Compute device selected for model inference

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Device a model runs on
///
/// Ordered by preference: MPS beats CUDA beats CPU. CPU is assumed to be
/// available everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTag {
    /// Apple Metal Performance Shaders
    Mps,
    /// NVIDIA CUDA
    Cuda,
    /// Generic CPU execution
    #[default]
    Cpu,
}

impl DeviceTag {
    /// Identifier understood by the inference tooling (`"mps"`, `"cuda"`, `"cpu"`)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mps => "mps",
            Self::Cuda => "cuda",
            Self::Cpu => "cpu",
        }
    }

    /// Whether this is a hardware accelerator rather than the CPU
    #[must_use]
    pub const fn is_accelerator(&self) -> bool {
        !matches!(self, Self::Cpu)
    }

    /// Human-readable description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Mps => "MPS (Apple Silicon GPU)",
            Self::Cuda => "CUDA (NVIDIA GPU)",
            Self::Cpu => "CPU (fallback)",
        }
    }
}

impl fmt::Display for DeviceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mps" => Ok(Self::Mps),
            "cuda" => Ok(Self::Cuda),
            "cpu" => Ok(Self::Cpu),
            other => Err(format!("Unknown device: {other}. Use 'mps', 'cuda' or 'cpu'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_cpu() {
        assert_eq!(DeviceTag::default(), DeviceTag::Cpu);
    }

    #[test]
    fn only_cpu_is_not_an_accelerator() {
        assert!(DeviceTag::Mps.is_accelerator());
        assert!(DeviceTag::Cuda.is_accelerator());
        assert!(!DeviceTag::Cpu.is_accelerator());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("MPS".parse::<DeviceTag>(), Ok(DeviceTag::Mps));
        assert_eq!(" cuda ".parse::<DeviceTag>(), Ok(DeviceTag::Cuda));
        assert_eq!("cpu".parse::<DeviceTag>(), Ok(DeviceTag::Cpu));
        assert!("tpu".parse::<DeviceTag>().is_err());
    }

    #[test]
    fn display_matches_as_str() {
        for tag in [DeviceTag::Mps, DeviceTag::Cuda, DeviceTag::Cpu] {
            assert_eq!(tag.to_string(), tag.as_str());
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DeviceTag::Cuda).unwrap(), "\"cuda\"");
        let tag: DeviceTag = serde_json::from_str("\"mps\"").unwrap();
        assert_eq!(tag, DeviceTag::Mps);
    }
}
