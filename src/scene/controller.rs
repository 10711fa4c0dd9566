//! Scene animation controller: per-frame tick plus discrete UI events.

use crate::audio::TrackMix;
use crate::ocean::WaveField;
use crate::params::{Palette, Rgb, SceneVariantConfig};

use super::assets::AssetSlot;
use super::cloud::{CloudMotion, CloudPhase};
use super::cloud_model::CloudModel;
use super::picking::{Aabb, Ray};
use super::theme::{BakedTexture, ThemeState};
use super::tweaks::{control_by_name, DebugPanel};
use super::{SceneState, Viewport};

/// Result of a pointer click
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing pickable under the pointer (or the cloud is not loaded/visible)
    Miss,
    /// Cloud was idle and has started its trip
    Launched { play_sfx: bool },
    /// Cloud was hit but is already drifting
    Busy,
}

/// What changed after a day/night toggle
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeChange {
    pub is_night: bool,
    pub texture: BakedTexture,
    pub mix: TrackMix,
}

/// Drives a [`SceneState`] according to one [`SceneVariantConfig`]
pub struct SceneController {
    config: SceneVariantConfig,
    state: SceneState,
    cloud_model: AssetSlot<CloudModel>,
    panel: DebugPanel,
}

impl SceneController {
    /// Build the scene; the cloud model is loaded through `cloud_model`
    pub fn new(
        config: SceneVariantConfig,
        mut theme: ThemeState,
        cloud_model: AssetSlot<CloudModel>,
    ) -> Self {
        let mut wave = WaveField::new(config.water.clone());
        if let Some(theme_config) = &config.theme {
            let palette = theme.palette(theme_config);
            wave.preset_mut().set_colors(palette.near, palette.far);
            // The starting texture needs an upload just like a toggled one
            theme.request_texture_refresh();
        }
        let cloud = config.cloud.as_ref().map(CloudMotion::new);
        let viewport = Viewport::new(
            config.render.window_width,
            config.render.window_height,
            1.0,
            config.render.max_pixel_ratio,
        );

        log::info!(
            "Scene '{}' ready (cloud: {}, theme toggle: {}, audio: {})",
            config.name,
            cloud.is_some(),
            config.theme.is_some(),
            config.audio.is_some()
        );

        Self {
            state: SceneState::new(wave, theme, cloud, viewport),
            config,
            cloud_model,
            panel: DebugPanel::new(),
        }
    }

    /// Start the procedural cloud mesh on a background loader
    pub fn spawn_cloud_loader(config: &SceneVariantConfig) -> AssetSlot<CloudModel> {
        match &config.cloud {
            Some(cloud) => {
                let puffs = cloud.puffs.clone();
                AssetSlot::spawn("cloud", move || Some(CloudModel::from_puffs(&puffs)))
            }
            None => AssetSlot::empty(),
        }
    }

    pub fn config(&self) -> &SceneVariantConfig {
        &self.config
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn cloud_model(&self) -> Option<&CloudModel> {
        self.cloud_model.get()
    }

    /// Advance one frame to host time `elapsed_s`
    ///
    /// Returns the cloud's new phase when it changed this tick.
    pub fn tick(&mut self, elapsed_s: f32) -> Option<CloudPhase> {
        let t = self.state.clock.advance_to(elapsed_s);
        self.state.water_time_s = t;

        // Cloud updates wait for the asset; a missing asset just skips them
        if !self.cloud_model.is_ready() {
            return None;
        }
        let (Some(config), Some(cloud)) = (&self.config.cloud, &mut self.state.cloud) else {
            return None;
        };

        let transition = cloud.step(config);
        cloud.animate(config, t);
        if let Some(phase) = transition {
            log::debug!("Cloud {:?} at x={:.1}", phase, cloud.position.x);
        }
        transition
    }

    /// Flip day/night; `None` when this variant has no theme
    pub fn toggle_theme(&mut self) -> Option<ThemeChange> {
        let theme_config = self.config.theme.as_ref()?;
        let is_night = self.state.theme.toggle_night();

        let Palette { near, far, .. } = *self.state.theme.palette(theme_config);
        self.state.wave.preset_mut().set_colors(near, far);

        let change = ThemeChange {
            is_night,
            texture: self.state.theme.baked_texture(),
            mix: self.track_mix(),
        };
        log::debug!(
            "Theme -> {} (texture {})",
            if is_night { "night" } else { "day" },
            self.state.theme.texture_path(theme_config)
        );
        Some(change)
    }

    /// Flip mute; returns the tracks that should now be playing
    pub fn toggle_mute(&mut self) -> TrackMix {
        let muted = self.state.theme.toggle_mute();
        log::debug!("Audio {}", if muted { "muted" } else { "unmuted" });
        self.track_mix()
    }

    /// Tracks implied by the current theme
    pub fn track_mix(&self) -> TrackMix {
        match &self.config.audio {
            Some(audio) => TrackMix::for_theme(&self.state.theme, audio.waves_track),
            None => TrackMix::silent(),
        }
    }

    /// Record a new window size; the host forwards the result to the renderer
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> Viewport {
        self.state.viewport = Viewport::new(
            width,
            height,
            device_pixel_ratio,
            self.config.render.max_pixel_ratio,
        );
        self.state.viewport
    }

    /// World-space bounds of the cloud, if it is loaded and visible
    pub fn cloud_bounds(&self) -> Option<Aabb> {
        let model = self.cloud_model.get()?;
        let cloud = self.state.cloud.as_ref()?;
        if !self.cloud_visible() {
            return None;
        }
        Some(model.bounds.transformed(&cloud.transform()))
    }

    pub fn cloud_visible(&self) -> bool {
        match &self.config.cloud {
            Some(config) => self.cloud_model.is_ready() && self.state.theme.cloud_visible(config),
            None => false,
        }
    }

    /// Whether `ray` touches any world-space puff of the loaded cloud
    fn ray_hits_puff(&self, ray: &Ray) -> bool {
        let (Some(model), Some(cloud)) = (self.cloud_model.get(), &self.state.cloud) else {
            return false;
        };
        let transform = cloud.transform();
        model
            .puffs
            .iter()
            .any(|puff| ray.hit_sphere(&puff.transformed(&transform, cloud.scale)).is_some())
    }

    /// Handle a click whose pick ray is `ray`
    pub fn click(&mut self, ray: &Ray) -> ClickOutcome {
        let Some(bounds) = self.cloud_bounds() else {
            return ClickOutcome::Miss;
        };
        if !ray.crosses_box(&bounds) || !self.ray_hits_puff(ray) {
            return ClickOutcome::Miss;
        }
        let (Some(config), Some(cloud)) = (&self.config.cloud, &mut self.state.cloud) else {
            return ClickOutcome::Miss;
        };
        if !cloud.launch(config) {
            return ClickOutcome::Busy;
        }
        log::debug!("Cloud launched from x={:.1}", cloud.position.x);

        let play_sfx = self
            .config
            .audio
            .as_ref()
            .is_some_and(|audio| audio.click_sfx && !self.state.theme.muted);
        ClickOutcome::Launched { play_sfx }
    }

    /// Current clear colour
    pub fn sky_color(&self) -> Rgb {
        match &self.config.theme {
            Some(theme) => self.state.theme.palette(theme).sky,
            None => Rgb::BLACK,
        }
    }

    pub fn starfield_visible(&self) -> bool {
        self.config
            .theme
            .as_ref()
            .is_some_and(|theme| self.state.theme.starfield_visible(theme))
    }

    /// Baked texture to re-upload, reported once per toggle
    pub fn take_texture_refresh(&mut self) -> Option<&str> {
        let theme = self.config.theme.as_ref()?;
        if self.state.theme.take_texture_refresh() {
            Some(self.state.theme.texture_path(theme))
        } else {
            None
        }
    }

    pub fn toggle_debug_panel(&mut self) -> bool {
        let visible = self.panel.toggle_visible();
        if visible {
            let control = self.panel.selected(self.state.wave.preset());
            log::info!("Debug panel shown, editing {}", control.name);
        }
        visible
    }

    pub fn select_next_tweak(&mut self) {
        if self.panel.is_visible() {
            let control = self.panel.select_next(self.state.wave.preset());
            log::info!("Editing {}", control.name);
        }
    }

    /// Set a wave uniform by name, snapped like a panel edit
    ///
    /// `None` when no control has that name or it belongs to the other preset.
    pub fn set_tweak(&mut self, name: &str, value: f32) -> Option<f32> {
        let stored = control_by_name(name)?.apply(self.state.wave.preset_mut(), value)?;
        log::info!("{} = {}", name, stored);
        Some(stored)
    }

    /// Nudge the selected wave uniform by whole steps
    pub fn nudge_tweak(&mut self, steps: i32) -> Option<f32> {
        let (name, value) = self.panel.nudge(self.state.wave.preset_mut(), steps)?;
        log::info!("{} = {}", name, value);
        Some(value)
    }
}
