//! Procedural wave field: height and colour mix for any point on the water plane.
//!
//! The same math runs per vertex in `water.wgsl`; this is the CPU reference used
//! for snapshots, picking tests and anything else that needs the surface height.

use std::f32::consts::TAU;

use crate::params::{RadialWaveConfig, Rgb, WaterPreset, WaveConfig, MAX_SMALL_WAVE_ITERATIONS};

/// One evaluation of the wave field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSample {
    /// Vertical offset from the rest surface (meters)
    pub elevation: f32,

    /// Interpolation factor from near to far colour, always in 0..=1
    pub color_mix: f32,
}

/// Stateless evaluator over a validated water preset
///
/// Evaluation takes `&self` only, so the field can be sampled from many
/// threads at once.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveField {
    preset: WaterPreset,
}

impl WaveField {
    /// Wrap a preset; out-of-range octave counts are clamped here
    pub fn new(preset: WaterPreset) -> Self {
        let preset = match preset {
            WaterPreset::Octave(config) => WaterPreset::Octave(config.sanitized()),
            radial => radial,
        };
        Self { preset }
    }

    pub fn preset(&self) -> &WaterPreset {
        &self.preset
    }

    /// Mutable access for live tweaking; callers keep values in range
    pub fn preset_mut(&mut self) -> &mut WaterPreset {
        &mut self.preset
    }

    /// Height and colour mix at world `(x, z)` and time `t` (seconds)
    pub fn sample(&self, x: f32, z: f32, t: f32) -> WaveSample {
        match &self.preset {
            WaterPreset::Octave(config) => {
                let elevation = octave_elevation(config, x, z, t);
                WaveSample {
                    elevation,
                    color_mix: octave_color_mix(config, elevation),
                }
            }
            WaterPreset::Radial(config) => {
                let distance = (x * x + z * z).sqrt();
                WaveSample {
                    elevation: radial_elevation(config, distance, t),
                    color_mix: radial_color_mix(config, distance),
                }
            }
        }
    }

    pub fn elevation(&self, x: f32, z: f32, t: f32) -> f32 {
        self.sample(x, z, t).elevation
    }

    /// Fragment colour for a sample
    pub fn color(&self, sample: &WaveSample) -> Rgb {
        let (near, far) = self.preset.colors();
        near.lerp(far, sample.color_mix)
    }

    /// Upper bound of `|elevation|` over all positions and times
    pub fn max_amplitude(&self) -> f32 {
        match &self.preset {
            WaterPreset::Octave(config) => {
                config.big_waves_elevation.abs() + small_wave_amplitude_sum(config)
            }
            WaterPreset::Radial(config) => config.wave_amplitude.abs(),
        }
    }
}

/// Big wave: product of two sines travelling along x and z
fn big_wave(config: &WaveConfig, x: f32, z: f32, t: f32) -> f32 {
    let phase = t * config.big_waves_speed;
    (x * config.big_waves_frequency[0] + phase).sin()
        * (z * config.big_waves_frequency[1] + phase).sin()
        * config.big_waves_elevation
}

/// Small waves: octaves double in frequency and halve in height
fn small_waves(config: &WaveConfig, x: f32, z: f32, t: f32) -> f32 {
    let phase = t * config.small_waves_speed;
    let iterations = config.small_waves_iterations.min(MAX_SMALL_WAVE_ITERATIONS);

    let mut frequency = config.small_waves_frequency;
    let mut amplitude = config.small_waves_elevation;
    let mut total = 0.0;
    for _ in 0..iterations {
        total += ((x * frequency + phase).sin() * (z * frequency + phase).sin()).abs() * amplitude;
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    total
}

fn small_wave_amplitude_sum(config: &WaveConfig) -> f32 {
    let iterations = config.small_waves_iterations.min(MAX_SMALL_WAVE_ITERATIONS);
    (0..iterations)
        .map(|i| config.small_waves_elevation.abs() / (1u32 << i) as f32)
        .sum()
}

/// Octave elevation: `big ± small` depending on `config.combine`
pub fn octave_elevation(config: &WaveConfig, x: f32, z: f32, t: f32) -> f32 {
    big_wave(config, x, z, t) + config.combine.sign() * small_waves(config, x, z, t)
}

/// `clamp((elevation - offset) * multiplier, 0, 1)`
pub fn octave_color_mix(config: &WaveConfig, elevation: f32) -> f32 {
    let mix = (elevation - config.color_offset) * config.color_multiplier;
    if mix.is_nan() {
        return 0.0;
    }
    mix.clamp(0.0, 1.0)
}

/// Rings: `sin(d * 2π / texture_size + t * speed) * amplitude`
pub fn radial_elevation(config: &RadialWaveConfig, distance: f32, t: f32) -> f32 {
    let spatial_frequency = TAU / config.texture_size;
    (distance * spatial_frequency + t * config.wave_speed).sin() * config.wave_amplitude
}

/// Distance-based mix, independent of the ring height
pub fn radial_color_mix(config: &RadialWaveConfig, distance: f32) -> f32 {
    (distance / config.falloff_radius).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaveCombine;

    fn octave_field() -> WaveField {
        WaveField::new(WaterPreset::Octave(WaveConfig::default()))
    }

    fn radial_field() -> WaveField {
        WaveField::new(WaterPreset::Radial(RadialWaveConfig::default()))
    }

    #[test]
    fn test_origin_at_time_zero_is_flat() {
        // All sine terms vanish at zero phase, under both sign conventions
        for combine in [WaveCombine::Subtract, WaveCombine::Add] {
            let field = WaveField::new(WaterPreset::Octave(WaveConfig {
                combine,
                ..WaveConfig::default()
            }));
            assert_eq!(field.elevation(0.0, 0.0, 0.0), 0.0);
        }
    }

    #[test]
    fn test_pinned_classic_value() {
        // x = π/2, z = π/3, t = 0: big = sin(π/2) * sin(π/2) * 0.05 = 0.05
        // small octaves at f = 1, 2, 4 with heights 0.3, 0.15, 0.075:
        //   |sin(π/2) sin(π/3)|  * 0.3   = 0.259808
        //   |sin(π)   sin(2π/3)| * 0.15  = 0
        //   |sin(2π)  sin(4π/3)| * 0.075 = 0
        let x = std::f32::consts::FRAC_PI_2;
        let z = std::f32::consts::FRAC_PI_3;
        let elevation = octave_field().elevation(x, z, 0.0);
        assert!((elevation - (0.05 - 0.259_808)).abs() < 1e-4, "got {}", elevation);
    }

    #[test]
    fn test_deterministic() {
        let field = octave_field();
        let a = field.sample(3.7, -12.25, 42.5);
        for _ in 0..10 {
            assert_eq!(field.sample(3.7, -12.25, 42.5), a);
        }
    }

    #[test]
    fn test_radial_periodic_in_time() {
        let field = radial_field();
        let period = TAU / 1.05;
        for &(x, z, t) in &[(0.0, 0.0, 0.0), (3.0, 4.0, 1.5), (-10.0, 2.5, 7.25)] {
            let a = field.elevation(x, z, t);
            let b = field.elevation(x, z, t + period);
            assert!((a - b).abs() < 1e-4, "{} vs {} at ({}, {}, {})", a, b, x, z, t);
        }
    }

    #[test]
    fn test_octave_periodic_when_speeds_match() {
        let config = WaveConfig {
            big_waves_speed: 0.5,
            small_waves_speed: 0.5,
            ..WaveConfig::default()
        };
        let field = WaveField::new(WaterPreset::Octave(config));
        let period = TAU / 0.5;
        let a = field.elevation(1.25, -0.75, 2.0);
        let b = field.elevation(1.25, -0.75, 2.0 + period);
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn test_bounded_by_configured_amplitudes() {
        let field = octave_field();
        // 0.05 + 0.3 + 0.15 + 0.075
        assert!((field.max_amplitude() - 0.575).abs() < 1e-6);

        for i in 0..400 {
            let x = (i as f32 * 0.37).sin() * 50.0;
            let z = (i as f32 * 0.91).cos() * 50.0;
            let t = i as f32 * 0.13;
            assert!(field.elevation(x, z, t).abs() <= field.max_amplitude() + 1e-6);

            let radial = radial_field();
            assert!(radial.elevation(x, z, t).abs() <= radial.max_amplitude() + 1e-6);
        }
    }

    #[test]
    fn test_color_mix_clamped_for_extreme_elevation() {
        let config = WaveConfig::default();
        assert_eq!(octave_color_mix(&config, 1.0e9), 1.0);
        assert_eq!(octave_color_mix(&config, -1.0e9), 0.0);
        assert_eq!(octave_color_mix(&config, f32::INFINITY), 1.0);
        assert_eq!(octave_color_mix(&config, f32::NEG_INFINITY), 0.0);

        let radial = RadialWaveConfig::default();
        assert_eq!(radial_color_mix(&radial, 0.0), 0.0);
        assert_eq!(radial_color_mix(&radial, 1.0e6), 1.0);
    }

    #[test]
    fn test_zero_iterations_leaves_big_wave_only() {
        let config = WaveConfig {
            small_waves_iterations: 0,
            ..WaveConfig::default()
        };
        let x = 0.4;
        let z = -1.1;
        let t = 3.0;
        let expected = (x * 1.0 + t * 0.7f32).sin() * (z * 1.5 + t * 0.7f32).sin() * 0.05;
        assert!((octave_elevation(&config, x, z, t) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_oversized_iterations_clamped_on_construction() {
        let field = WaveField::new(WaterPreset::Octave(WaveConfig {
            small_waves_iterations: 1_000_000,
            ..WaveConfig::default()
        }));
        match field.preset() {
            WaterPreset::Octave(c) => {
                assert_eq!(c.small_waves_iterations, MAX_SMALL_WAVE_ITERATIONS)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_color_endpoints() {
        let field = radial_field();
        let (near, far) = field.preset().colors();
        let centre = field.sample(0.0, 0.0, 0.0);
        assert_eq!(field.color(&centre), near);
        let rim = field.sample(1000.0, 0.0, 0.0);
        assert_eq!(field.color(&rim).to_u8(), far.to_u8());
    }
}
