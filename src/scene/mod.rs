//! Scene state and the per-frame animation controller.
//!
//! All mutable scene state lives in [`SceneState`]; the host owns one
//! [`SceneController`] and calls `tick` once per frame plus the event
//! handlers when the user presses a button or clicks.

mod assets;
mod clock;
mod cloud;
mod cloud_model;
mod controller;
mod picking;
mod theme;
pub mod tweaks;

pub use assets::{AssetPublisher, AssetSlot};
pub use clock::AnimationClock;
pub use cloud::{CloudMotion, CloudPhase};
pub use cloud_model::{CloudModel, CloudVertex};
pub use controller::{ClickOutcome, SceneController, ThemeChange};
pub use picking::{Aabb, Ray, Sphere};
pub use theme::{BakedTexture, ThemeState};

use crate::ocean::WaveField;

/// Output surface size as forwarded to the renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical size (pixels)
    pub width: u32,
    pub height: u32,

    /// Device pixel ratio after clamping
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(max_pixel_ratio)
        } else {
            1.0
        };
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Renderer output size in physical pixels
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Everything the tick and event handlers mutate
#[derive(Clone, Debug)]
pub struct SceneState {
    pub clock: AnimationClock,

    /// Value of the `uTime` uniform
    pub water_time_s: f32,

    pub wave: WaveField,

    pub theme: ThemeState,

    /// `None` when the scene variant has no cloud
    pub cloud: Option<CloudMotion>,

    pub viewport: Viewport,
}

impl SceneState {
    pub fn new(
        wave: WaveField,
        theme: ThemeState,
        cloud: Option<CloudMotion>,
        viewport: Viewport,
    ) -> Self {
        Self {
            clock: AnimationClock::new(),
            water_time_s: 0.0,
            wave,
            theme,
            cloud,
            viewport,
        }
    }
}
