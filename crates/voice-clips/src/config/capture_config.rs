use crate::config::{default_channels, default_extension, default_sample_rate};

use serde::{Deserialize, Serialize};
use voice_clips_core::CaptureConfig;

/// Recording format configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Sample rate of written recordings, in Hz.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Channel count of written recordings.
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Recording file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            extension: default_extension(),
        }
    }
}

impl CaptureSettings {
    /// Format handed to the capture device.
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}
