//! Water surface parameters: wave presets and mesh shape.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use crate::error::{Error, Result};

/// Upper bound for the small-wave octave loop (matches the debug control's max)
pub const MAX_SMALL_WAVE_ITERATIONS: u32 = 5;

/// How the small-wave octaves combine with the big wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveCombine {
    /// `elevation = big - small` (troughs carved by chop)
    #[default]
    Subtract,
    /// `elevation = big + small`
    Add,
}

impl WaveCombine {
    pub fn sign(self) -> f32 {
        match self {
            WaveCombine::Subtract => -1.0,
            WaveCombine::Add => 1.0,
        }
    }
}

/// Multi-octave wave parameters (live-tunable through the debug panel)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Big wave height (meters)
    pub big_waves_elevation: f32,

    /// Big wave spatial frequency along x and z (radians per meter)
    pub big_waves_frequency: [f32; 2],

    /// Big wave phase speed (radians per second)
    pub big_waves_speed: f32,

    /// Height of the first small-wave octave (meters), halves every octave
    pub small_waves_elevation: f32,

    /// Frequency of the first small-wave octave, doubles every octave
    pub small_waves_frequency: f32,

    /// Small wave phase speed (radians per second)
    pub small_waves_speed: f32,

    /// Number of small-wave octaves, 0..=MAX_SMALL_WAVE_ITERATIONS
    pub small_waves_iterations: u32,

    /// Colour at mix factor 0 (deep water)
    pub color_near: Rgb,

    /// Colour at mix factor 1 (wave crests)
    pub color_far: Rgb,

    /// Elevation subtracted before scaling into the colour mix factor
    pub color_offset: f32,

    /// Scale from elevation to colour mix factor
    pub color_multiplier: f32,

    /// Sign convention between big and small terms
    pub combine: WaveCombine,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            big_waves_elevation: 0.05,
            big_waves_frequency: [1.0, 1.5],
            big_waves_speed: 0.7,
            small_waves_elevation: 0.3,
            small_waves_frequency: 1.0,
            small_waves_speed: 0.3,
            small_waves_iterations: 3,
            color_near: Rgb::from_u32(0x1d368d),
            color_far: Rgb::from_u32(0x008ae6),
            color_offset: 0.1,
            color_multiplier: 1.3,
            combine: WaveCombine::Subtract,
        }
    }
}

impl WaveConfig {
    fn scalars(&self) -> [(&'static str, f32); 9] {
        [
            ("big_waves_elevation", self.big_waves_elevation),
            ("big_waves_frequency.x", self.big_waves_frequency[0]),
            ("big_waves_frequency.y", self.big_waves_frequency[1]),
            ("big_waves_speed", self.big_waves_speed),
            ("small_waves_elevation", self.small_waves_elevation),
            ("small_waves_frequency", self.small_waves_frequency),
            ("small_waves_speed", self.small_waves_speed),
            ("color_offset", self.color_offset),
            ("color_multiplier", self.color_multiplier),
        ]
    }

    /// Reject values the evaluator does not accept
    pub fn validate(&self) -> Result<()> {
        if self.small_waves_iterations > MAX_SMALL_WAVE_ITERATIONS {
            return Err(Error::Config(format!(
                "small_waves_iterations must be <= {}, got {}",
                MAX_SMALL_WAVE_ITERATIONS, self.small_waves_iterations
            )));
        }
        for (name, value) in self.scalars() {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be finite, got {}", name, value)));
            }
        }
        Ok(())
    }

    /// Clamp into the accepted range instead of rejecting
    pub fn sanitized(mut self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        self.small_waves_iterations = self.small_waves_iterations.min(MAX_SMALL_WAVE_ITERATIONS);
        self.big_waves_elevation = finite(self.big_waves_elevation);
        self.big_waves_frequency = self.big_waves_frequency.map(finite);
        self.big_waves_speed = finite(self.big_waves_speed);
        self.small_waves_elevation = finite(self.small_waves_elevation);
        self.small_waves_frequency = finite(self.small_waves_frequency);
        self.small_waves_speed = finite(self.small_waves_speed);
        self.color_offset = finite(self.color_offset);
        self.color_multiplier = finite(self.color_multiplier);
        self
    }
}

/// Radial ring-wave parameters (later island revisions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialWaveConfig {
    /// Phase speed (radians per second), period = 2π / wave_speed
    pub wave_speed: f32,

    /// Ring height (meters)
    pub wave_amplitude: f32,

    /// Ring wavelength (meters); spatial frequency is 2π / texture_size
    pub texture_size: f32,

    /// Distance at which the colour reaches `color_far` (meters)
    pub falloff_radius: f32,

    /// Colour at the origin
    pub color_near: Rgb,

    /// Colour at and beyond `falloff_radius`
    pub color_far: Rgb,
}

impl Default for RadialWaveConfig {
    fn default() -> Self {
        Self {
            wave_speed: 1.05,
            wave_amplitude: 0.08,
            texture_size: 6.0,
            falloff_radius: 40.0,
            color_near: Rgb::from_u32(0x3fc7d9),
            color_far: Rgb::from_u32(0x0b4f8a),
        }
    }
}

impl RadialWaveConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("wave_speed", self.wave_speed),
            ("wave_amplitude", self.wave_amplitude),
            ("texture_size", self.texture_size),
            ("falloff_radius", self.falloff_radius),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.texture_size <= 0.0 {
            return Err(Error::Config("texture_size must be > 0".to_string()));
        }
        if self.falloff_radius <= 0.0 {
            return Err(Error::Config("falloff_radius must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Which wave function drives the water surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WaterPreset {
    /// Big wave times small-wave octaves, elevation-based colour
    Octave(WaveConfig),

    /// Rings spreading from the origin, distance-based colour
    Radial(RadialWaveConfig),
}

impl Default for WaterPreset {
    fn default() -> Self {
        Self::Octave(WaveConfig::default())
    }
}

impl WaterPreset {
    pub fn validate(&self) -> Result<()> {
        match self {
            WaterPreset::Octave(config) => config.validate(),
            WaterPreset::Radial(config) => config.validate(),
        }
    }

    pub fn colors(&self) -> (Rgb, Rgb) {
        match self {
            WaterPreset::Octave(c) => (c.color_near, c.color_far),
            WaterPreset::Radial(c) => (c.color_near, c.color_far),
        }
    }

    pub fn set_colors(&mut self, near: Rgb, far: Rgb) {
        match self {
            WaterPreset::Octave(c) => {
                c.color_near = near;
                c.color_far = far;
            }
            WaterPreset::Radial(c) => {
                c.color_near = near;
                c.color_far = far;
            }
        }
    }
}

/// Tessellation of the flat water mesh before displacement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WaterMeshShape {
    /// Square plane centred on the origin
    Plane {
        /// Side length (meters)
        size_m: f32,
        /// Segments per side
        subdivisions: u32,
    },

    /// Disc centred on the origin
    Disc {
        /// Radius (meters)
        radius_m: f32,
        /// Segments around the rim
        segments: u32,
        /// Concentric rings between centre and rim
        rings: u32,
    },
}

/// Water mesh placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterMeshConfig {
    pub shape: WaterMeshShape,

    /// Rest height of the surface (meters)
    pub surface_height_m: f32,
}

impl Default for WaterMeshConfig {
    fn default() -> Self {
        Self {
            shape: WaterMeshShape::Plane {
                size_m: 100.0,
                subdivisions: 512,
            },
            surface_height_m: 1.3,
        }
    }
}

impl WaterMeshConfig {
    pub fn validate(&self) -> Result<()> {
        match self.shape {
            WaterMeshShape::Plane {
                size_m,
                subdivisions,
            } => {
                if !(size_m > 0.0) || subdivisions == 0 {
                    return Err(Error::Config(
                        "plane needs size_m > 0 and subdivisions >= 1".to_string(),
                    ));
                }
            }
            WaterMeshShape::Disc {
                radius_m,
                segments,
                rings,
            } => {
                if !(radius_m > 0.0) || segments < 3 || rings == 0 {
                    return Err(Error::Config(
                        "disc needs radius_m > 0, segments >= 3 and rings >= 1".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wave_config_is_valid() {
        assert!(WaveConfig::default().validate().is_ok());
        assert!(RadialWaveConfig::default().validate().is_ok());
    }

    #[test]
    fn test_iterations_above_bound_rejected() {
        let config = WaveConfig {
            small_waves_iterations: MAX_SMALL_WAVE_ITERATIONS + 1,
            ..WaveConfig::default()
        };
        assert!(config.validate().is_err());

        let clamped = config.sanitized();
        assert_eq!(clamped.small_waves_iterations, MAX_SMALL_WAVE_ITERATIONS);
        assert!(clamped.validate().is_ok());
    }

    #[test]
    fn test_non_finite_rejected_and_sanitized() {
        let config = WaveConfig {
            big_waves_speed: f32::NAN,
            ..WaveConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.sanitized().big_waves_speed, 0.0);
    }

    #[test]
    fn test_radial_rejects_zero_texture_size() {
        let config = RadialWaveConfig {
            texture_size: 0.0,
            ..RadialWaveConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_preset_json_tagging() {
        let json = r##"{ "kind": "octave", "small_waves_iterations": 2, "color_near": "#000000" }"##;
        let preset: WaterPreset = serde_json::from_str(json).unwrap();
        match preset {
            WaterPreset::Octave(c) => {
                assert_eq!(c.small_waves_iterations, 2);
                assert_eq!(c.color_near, Rgb::BLACK);
                // Unspecified fields fall back to defaults
                assert_eq!(c.big_waves_frequency, [1.0, 1.5]);
            }
            other => panic!("expected octave preset, got {:?}", other),
        }
    }

    #[test]
    fn test_mesh_validation() {
        assert!(WaterMeshConfig::default().validate().is_ok());
        let disc = WaterMeshConfig {
            shape: WaterMeshShape::Disc {
                radius_m: 10.0,
                segments: 2,
                rings: 4,
            },
            surface_height_m: 0.0,
        };
        assert!(disc.validate().is_err());
    }
}
