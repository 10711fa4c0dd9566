//! Which ambient tracks play for a given theme.

use crate::scene::ThemeState;

/// Looping ambient tracks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Track {
    DayAmbience,
    NightAmbience,
    Waves,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::DayAmbience, Track::NightAmbience, Track::Waves];
}

/// Active/inactive flag per looping track
///
/// Day and night ambience are mutually exclusive; waves are independent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackMix {
    pub day_ambience: bool,
    pub night_ambience: bool,
    pub waves: bool,
}

impl TrackMix {
    /// Everything stopped
    pub fn silent() -> Self {
        Self::default()
    }

    /// Tracks for `theme`; `waves_track` enables the independent waves loop
    pub fn for_theme(theme: &ThemeState, waves_track: bool) -> Self {
        if theme.muted {
            return Self::silent();
        }
        Self {
            day_ambience: !theme.is_night,
            night_ambience: theme.is_night,
            waves: waves_track,
        }
    }

    pub fn is_active(&self, track: Track) -> bool {
        match track {
            Track::DayAmbience => self.day_ambience,
            Track::NightAmbience => self.night_ambience,
            Track::Waves => self.waves,
        }
    }

    pub fn is_silent(&self) -> bool {
        !(self.day_ambience || self.night_ambience || self.waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_is_silent() {
        for is_night in [false, true] {
            let mix = TrackMix::for_theme(&ThemeState::new(is_night, true), true);
            assert!(mix.is_silent());
        }
    }

    #[test]
    fn test_day_and_night_never_overlap() {
        for is_night in [false, true] {
            for muted in [false, true] {
                for waves in [false, true] {
                    let mix = TrackMix::for_theme(&ThemeState::new(is_night, muted), waves);
                    assert!(!(mix.day_ambience && mix.night_ambience));
                }
            }
        }
    }

    #[test]
    fn test_night_unmuted_plays_night_and_waves() {
        let mix = TrackMix::for_theme(&ThemeState::new(true, false), true);
        assert!(mix.is_active(Track::NightAmbience));
        assert!(!mix.is_active(Track::DayAmbience));
        assert!(mix.is_active(Track::Waves));
    }

    #[test]
    fn test_waves_track_optional() {
        let mix = TrackMix::for_theme(&ThemeState::new(false, false), false);
        assert!(mix.day_ambience);
        assert!(!mix.waves);
    }
}
