//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (meters, seconds, radians)
//! - Documented ranges and meanings
//! - Validation at the load boundary, so evaluators can assume valid input

mod audio;
mod camera;
mod color;
mod render;
mod scene;
mod water;

// Re-export all types
pub use audio::{audio_constants, AudioConfig};
pub use camera::OrbitParams;
pub use color::Rgb;
pub use render::RenderConfig;
pub use scene::{CloudConfig, CloudPuff, Palette, SceneVariantConfig, ThemeConfig};
pub use water::{
    RadialWaveConfig, WaterMeshConfig, WaterMeshShape, WaterPreset, WaveCombine, WaveConfig,
    MAX_SMALL_WAVE_ITERATIONS,
};
