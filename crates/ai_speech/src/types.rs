//! Audio produced by a TTS engine

use domain::DeviceTag;

/// Mono waveform returned by inference
///
/// `location` mirrors where the tensor lived when the engine handed it back;
/// it must be brought to host memory before being written.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
    location: DeviceTag,
}

impl Waveform {
    /// Create a waveform located on `location`
    #[must_use]
    pub const fn new(samples: Vec<f32>, sample_rate: u32, location: DeviceTag) -> Self {
        Self {
            samples,
            sample_rate,
            location,
        }
    }

    /// Create a waveform already in host memory
    #[must_use]
    pub const fn on_host(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self::new(samples, sample_rate, DeviceTag::Cpu)
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub const fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub const fn location(&self) -> DeviceTag {
        self.location
    }

    /// Whether the samples still live on an accelerator
    pub const fn is_on_accelerator(&self) -> bool {
        self.location.is_accelerator()
    }

    /// Bring the waveform to host memory
    #[must_use]
    pub fn into_host(self) -> Self {
        Self {
            location: DeviceTag::Cpu,
            ..self
        }
    }

    /// Consume the waveform, returning its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Duration in milliseconds
    #[allow(clippy::cast_possible_truncation)]
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / u64::from(self.sample_rate)
    }
}
