//! Hidden debug panel: live-editable wave uniforms with fixed ranges and steps.

use crate::params::{WaterPreset, MAX_SMALL_WAVE_ITERATIONS};

/// Wave parameter addressable by its shader uniform name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweakField {
    BigWavesElevation,
    BigWavesFrequencyX,
    BigWavesFrequencyY,
    BigWavesSpeed,
    SmallWavesElevation,
    SmallWavesFrequency,
    SmallWavesSpeed,
    SmallWavesIterations,
    ColorOffset,
    ColorMultiplier,
    WaveSpeed,
    WaveAmplitude,
    TextureSize,
}

impl TweakField {
    /// Current value, `None` when the preset has no such field
    pub fn get(self, preset: &WaterPreset) -> Option<f32> {
        match (preset, self) {
            (WaterPreset::Octave(c), TweakField::BigWavesElevation) => Some(c.big_waves_elevation),
            (WaterPreset::Octave(c), TweakField::BigWavesFrequencyX) => {
                Some(c.big_waves_frequency[0])
            }
            (WaterPreset::Octave(c), TweakField::BigWavesFrequencyY) => {
                Some(c.big_waves_frequency[1])
            }
            (WaterPreset::Octave(c), TweakField::BigWavesSpeed) => Some(c.big_waves_speed),
            (WaterPreset::Octave(c), TweakField::SmallWavesElevation) => {
                Some(c.small_waves_elevation)
            }
            (WaterPreset::Octave(c), TweakField::SmallWavesFrequency) => {
                Some(c.small_waves_frequency)
            }
            (WaterPreset::Octave(c), TweakField::SmallWavesSpeed) => Some(c.small_waves_speed),
            (WaterPreset::Octave(c), TweakField::SmallWavesIterations) => {
                Some(c.small_waves_iterations as f32)
            }
            (WaterPreset::Octave(c), TweakField::ColorOffset) => Some(c.color_offset),
            (WaterPreset::Octave(c), TweakField::ColorMultiplier) => Some(c.color_multiplier),
            (WaterPreset::Radial(c), TweakField::WaveSpeed) => Some(c.wave_speed),
            (WaterPreset::Radial(c), TweakField::WaveAmplitude) => Some(c.wave_amplitude),
            (WaterPreset::Radial(c), TweakField::TextureSize) => Some(c.texture_size),
            _ => None,
        }
    }

    /// Write a value that is already clamped to the control's range
    fn set(self, preset: &mut WaterPreset, value: f32) -> bool {
        match (preset, self) {
            (WaterPreset::Octave(c), TweakField::BigWavesElevation) => c.big_waves_elevation = value,
            (WaterPreset::Octave(c), TweakField::BigWavesFrequencyX) => {
                c.big_waves_frequency[0] = value
            }
            (WaterPreset::Octave(c), TweakField::BigWavesFrequencyY) => {
                c.big_waves_frequency[1] = value
            }
            (WaterPreset::Octave(c), TweakField::BigWavesSpeed) => c.big_waves_speed = value,
            (WaterPreset::Octave(c), TweakField::SmallWavesElevation) => {
                c.small_waves_elevation = value
            }
            (WaterPreset::Octave(c), TweakField::SmallWavesFrequency) => {
                c.small_waves_frequency = value
            }
            (WaterPreset::Octave(c), TweakField::SmallWavesSpeed) => c.small_waves_speed = value,
            (WaterPreset::Octave(c), TweakField::SmallWavesIterations) => {
                c.small_waves_iterations = value as u32
            }
            (WaterPreset::Octave(c), TweakField::ColorOffset) => c.color_offset = value,
            (WaterPreset::Octave(c), TweakField::ColorMultiplier) => c.color_multiplier = value,
            (WaterPreset::Radial(c), TweakField::WaveSpeed) => c.wave_speed = value,
            (WaterPreset::Radial(c), TweakField::WaveAmplitude) => c.wave_amplitude = value,
            (WaterPreset::Radial(c), TweakField::TextureSize) => c.texture_size = value,
            _ => return false,
        }
        true
    }
}

/// One slider of the debug panel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweakControl {
    pub field: TweakField,
    /// Uniform name shown in the panel
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl TweakControl {
    /// Snap to the step grid and clamp into range
    pub fn quantize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min;
        }
        let snapped = self.min + ((value - self.min) / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }

    /// Clamp `value` and write it into `preset`; returns the stored value
    pub fn apply(&self, preset: &mut WaterPreset, value: f32) -> Option<f32> {
        let value = self.quantize(value);
        self.field.set(preset, value).then_some(value)
    }
}

const fn control(field: TweakField, name: &'static str, min: f32, max: f32, step: f32) -> TweakControl {
    TweakControl {
        field,
        name,
        min,
        max,
        step,
    }
}

/// Controls for the octave preset
pub const OCTAVE_CONTROLS: [TweakControl; 10] = [
    control(TweakField::BigWavesElevation, "uBigWavesElevation", 0.0, 2.0, 0.01),
    control(TweakField::BigWavesFrequencyX, "uBigWavesFrequencyX", 0.0, 10.0, 0.01),
    control(TweakField::BigWavesFrequencyY, "uBigWavesFrequencyY", 0.0, 10.0, 0.01),
    control(TweakField::BigWavesSpeed, "uBigWavesSpeed", 0.0, 4.0, 0.01),
    control(TweakField::SmallWavesElevation, "uSmallWavesElevation", 0.0, 1.0, 0.01),
    control(TweakField::SmallWavesFrequency, "uSmallWavesFrequency", 0.0, 20.0, 0.01),
    control(TweakField::SmallWavesSpeed, "uSmallWavesSpeed", 0.0, 4.0, 0.01),
    control(
        TweakField::SmallWavesIterations,
        "uSmallWavesIterations",
        0.0,
        MAX_SMALL_WAVE_ITERATIONS as f32,
        1.0,
    ),
    control(TweakField::ColorOffset, "uColorOffset", 0.0, 1.0, 0.001),
    control(TweakField::ColorMultiplier, "uColorMultiplier", 0.0, 10.0, 0.001),
];

/// Controls for the radial preset
pub const RADIAL_CONTROLS: [TweakControl; 3] = [
    control(TweakField::WaveSpeed, "uWaveSpeed", 0.0, 4.0, 0.01),
    control(TweakField::WaveAmplitude, "uWaveAmplitude", 0.0, 1.0, 0.01),
    control(TweakField::TextureSize, "uTextureSize", 0.5, 20.0, 0.1),
];

/// Controls that apply to `preset`
pub fn controls_for(preset: &WaterPreset) -> &'static [TweakControl] {
    match preset {
        WaterPreset::Octave(_) => &OCTAVE_CONTROLS,
        WaterPreset::Radial(_) => &RADIAL_CONTROLS,
    }
}

/// Find a control by uniform name
pub fn control_by_name(name: &str) -> Option<&'static TweakControl> {
    OCTAVE_CONTROLS
        .iter()
        .chain(RADIAL_CONTROLS.iter())
        .find(|c| c.name == name)
}

/// Panel selection state; hidden by default
#[derive(Clone, Debug, Default)]
pub struct DebugPanel {
    visible: bool,
    selected: usize,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn selected(&self, preset: &WaterPreset) -> &'static TweakControl {
        let controls = controls_for(preset);
        &controls[self.selected % controls.len()]
    }

    pub fn select_next(&mut self, preset: &WaterPreset) -> &'static TweakControl {
        self.selected = (self.selected + 1) % controls_for(preset).len();
        self.selected(preset)
    }

    /// Move the selected control by `steps`; ignored while hidden
    pub fn nudge(&self, preset: &mut WaterPreset, steps: i32) -> Option<(&'static str, f32)> {
        if !self.visible {
            return None;
        }
        let control = self.selected(preset);
        let current = control.field.get(preset)?;
        let value = control.apply(preset, current + steps as f32 * control.step)?;
        Some((control.name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{RadialWaveConfig, WaveConfig};

    #[test]
    fn test_iterations_control_rejects_fractional_and_negative() {
        let mut preset = WaterPreset::Octave(WaveConfig::default());
        let control = control_by_name("uSmallWavesIterations").unwrap();

        assert_eq!(control.apply(&mut preset, 2.4), Some(2.0));
        assert_eq!(control.apply(&mut preset, -3.0), Some(0.0));
        assert_eq!(control.apply(&mut preset, 99.0), Some(5.0));
        assert_eq!(TweakField::SmallWavesIterations.get(&preset), Some(5.0));
    }

    #[test]
    fn test_nonfinite_input_goes_to_min() {
        let control = control_by_name("uBigWavesElevation").unwrap();
        assert_eq!(control.quantize(f32::NAN), 0.0);
    }

    #[test]
    fn test_field_mismatch_is_rejected() {
        let mut preset = WaterPreset::Radial(RadialWaveConfig::default());
        let control = control_by_name("uBigWavesSpeed").unwrap();
        assert_eq!(control.apply(&mut preset, 1.0), None);
        assert_eq!(TweakField::BigWavesSpeed.get(&preset), None);
    }

    #[test]
    fn test_hidden_panel_ignores_nudges() {
        let mut preset = WaterPreset::Octave(WaveConfig::default());
        let mut panel = DebugPanel::new();
        assert!(panel.nudge(&mut preset, 1).is_none());

        panel.toggle_visible();
        let (name, value) = panel.nudge(&mut preset, 5).unwrap();
        assert_eq!(name, "uBigWavesElevation");
        assert!((value - 0.10).abs() < 1e-6);
    }

    #[test]
    fn test_selection_wraps() {
        let preset = WaterPreset::Radial(RadialWaveConfig::default());
        let mut panel = DebugPanel::new();
        assert_eq!(panel.selected(&preset).name, "uWaveSpeed");
        panel.select_next(&preset);
        panel.select_next(&preset);
        assert_eq!(panel.select_next(&preset).name, "uWaveSpeed");
    }
}
