//! Ambient audio configuration.

use serde::{Deserialize, Serialize};

/// Ambient track setup for a scene variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output gain applied to every track (0..1)
    pub master_gain: f32,

    /// Play the independent waves track alongside the day/night ambience
    pub waves_track: bool,

    /// Play a one-shot chime when the cloud is launched
    pub click_sfx: bool,

    /// One-shot chime length (seconds)
    pub sfx_duration_s: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_gain: 0.8,
            waves_track: true,
            click_sfx: true,
            sfx_duration_s: 0.6,
        }
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Hard limiter applied to the final mix
    pub const OUTPUT_CLIP: f32 = 0.5;
}
