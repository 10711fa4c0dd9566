//! Day/night and mute state.

use crate::params::{CloudConfig, Palette, ThemeConfig};

/// Which baked island texture is active
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BakedTexture {
    Day,
    Night,
}

/// State flipped by the theme and music buttons
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeState {
    pub is_night: bool,
    pub muted: bool,
    texture_refresh_pending: bool,
}

impl ThemeState {
    pub fn new(is_night: bool, muted: bool) -> Self {
        Self {
            is_night,
            muted,
            texture_refresh_pending: false,
        }
    }

    /// Flip day/night and mark the baked texture for re-upload
    pub fn toggle_night(&mut self) -> bool {
        self.is_night = !self.is_night;
        self.texture_refresh_pending = true;
        self.is_night
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn palette<'a>(&self, config: &'a ThemeConfig) -> &'a Palette {
        if self.is_night {
            &config.night
        } else {
            &config.day
        }
    }

    pub fn baked_texture(&self) -> BakedTexture {
        if self.is_night {
            BakedTexture::Night
        } else {
            BakedTexture::Day
        }
    }

    pub fn texture_path<'a>(&self, config: &'a ThemeConfig) -> &'a str {
        match self.baked_texture() {
            BakedTexture::Day => &config.day_texture,
            BakedTexture::Night => &config.night_texture,
        }
    }

    pub fn starfield_visible(&self, config: &ThemeConfig) -> bool {
        self.is_night && config.starfield
    }

    pub fn cloud_visible(&self, cloud: &CloudConfig) -> bool {
        !(self.is_night && cloud.hide_at_night)
    }

    /// Mark the current baked texture for upload without flipping the theme
    pub fn request_texture_refresh(&mut self) {
        self.texture_refresh_pending = true;
    }

    /// Consume the pending texture refresh flag
    pub fn take_texture_refresh(&mut self) -> bool {
        std::mem::take(&mut self.texture_refresh_pending)
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_palette_and_texture() {
        let config = ThemeConfig::default();
        let mut theme = ThemeState::default();
        let palette = theme.palette(&config).clone();
        let texture = theme.texture_path(&config).to_string();

        assert!(theme.toggle_night());
        assert_eq!(theme.palette(&config), &config.night);
        assert_eq!(theme.baked_texture(), BakedTexture::Night);

        assert!(!theme.toggle_night());
        assert_eq!(theme.palette(&config), &palette);
        assert_eq!(theme.texture_path(&config), texture);
    }

    #[test]
    fn test_texture_refresh_consumed_once() {
        let mut theme = ThemeState::default();
        assert!(!theme.take_texture_refresh());
        theme.toggle_night();
        assert!(theme.take_texture_refresh());
        assert!(!theme.take_texture_refresh());
    }

    #[test]
    fn test_requested_refresh_keeps_theme() {
        let mut theme = ThemeState::new(true, false);
        theme.request_texture_refresh();
        assert!(theme.is_night);
        assert_eq!(theme.baked_texture(), BakedTexture::Night);
        assert!(theme.take_texture_refresh());
        assert!(!theme.take_texture_refresh());
    }

    #[test]
    fn test_night_visibility() {
        let theme_config = ThemeConfig::default();
        let cloud_config = CloudConfig::default();
        let mut theme = ThemeState::default();
        assert!(!theme.starfield_visible(&theme_config));
        assert!(theme.cloud_visible(&cloud_config));

        theme.toggle_night();
        assert!(theme.starfield_visible(&theme_config));
        assert!(!theme.cloud_visible(&cloud_config));

        let always_shown = CloudConfig {
            hide_at_night: false,
            ..CloudConfig::default()
        };
        assert!(theme.cloud_visible(&always_shown));
    }
}
