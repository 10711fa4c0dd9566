//! Procedural ambient compositions and the click chime.

use std::f32::consts::{PI, TAU};

use super::mixer::Track;

/// Daytime ambience: bright bell arpeggio
pub const DAY_AMBIENCE: &str = r#"
~gate: speed 1.0 >> seq 72 _ 76 _ 79 _ 76 _
~amp: ~gate >> envperc 0.01 0.6
~pit: ~gate >> mul 261.63
~bell: sin ~pit >> mul ~amp >> mul 0.08
o: ~bell >> plate 0.2
"#;

/// Night ambience: slow low pad
pub const NIGHT_AMBIENCE: &str = r#"
~gate: speed 0.5 >> seq 60 _ _ 67 _ _ 63 _
~amp: ~gate >> envperc 0.2 2.0
~pit: ~gate >> mul 130.81
~pad: tri ~pit >> mul ~amp >> lpf 800.0 1.0 >> mul 0.06
o: ~pad >> plate 0.3
"#;

/// Surf: filtered noise swelling in and out
pub const WAVES: &str = r#"
~swell: sin 0.1 >> mul 0.5 >> add 0.5
~surf: noise 42 >> lpf 600.0 1.0 >> mul ~swell >> mul 0.05
o: ~surf >> plate 0.1
"#;

pub fn composition(track: Track) -> &'static str {
    match track {
        Track::DayAmbience => DAY_AMBIENCE,
        Track::NightAmbience => NIGHT_AMBIENCE,
        Track::Waves => WAVES,
    }
}

/// One-shot falling chime played when the cloud is launched
pub struct Chime {
    cursor: usize,
    length: usize,
    sample_rate: f32,
}

impl Chime {
    pub fn new(duration_s: f32, sample_rate_hz: u32) -> Self {
        let sample_rate = sample_rate_hz as f32;
        let length = (duration_s.max(0.0) * sample_rate) as usize;
        Self {
            // Starts finished until triggered
            cursor: length,
            length,
            sample_rate,
        }
    }

    pub fn trigger(&mut self) {
        self.cursor = 0;
    }

    pub fn is_playing(&self) -> bool {
        self.cursor < self.length
    }

    /// Next mono sample, 0 once finished
    pub fn next_sample(&mut self) -> f32 {
        if !self.is_playing() {
            return 0.0;
        }
        let sample = chime_sample(self.cursor, self.length, self.sample_rate);
        self.cursor += 1;
        sample
    }
}

/// Sine sweep from 880 Hz down to 440 Hz under a Hann envelope
fn chime_sample(index: usize, length: usize, sample_rate: f32) -> f32 {
    let t = index as f32 / sample_rate;
    let progress = index as f32 / length.max(1) as f32;
    // Phase of a linear 880 -> 440 Hz sweep
    let duration = length as f32 / sample_rate;
    let phase = TAU * (880.0 * t - 220.0 * t * t / duration.max(f32::EPSILON));
    phase.sin() * hann_window(index, length) * 0.2 * (1.0 - progress)
}

/// Hann window function
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_chime_plays_once_per_trigger() {
        let mut chime = Chime::new(0.01, 44_100);
        assert!(!chime.is_playing());
        assert_eq!(chime.next_sample(), 0.0);

        chime.trigger();
        let samples: Vec<f32> = (0..441).map(|_| chime.next_sample()).collect();
        assert!(!chime.is_playing());
        assert!(samples.iter().any(|s| s.abs() > 0.0));
        assert!(samples.iter().all(|s| s.abs() <= 0.2));
        assert_eq!(chime.next_sample(), 0.0);
    }

    #[test]
    fn test_every_track_has_output() {
        for track in Track::ALL {
            assert!(composition(track).contains("o:"));
        }
    }
}
