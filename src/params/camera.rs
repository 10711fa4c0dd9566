//! Orbit camera configuration.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_3;

use crate::error::{Error, Result};

/// Damped orbit camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitParams {
    /// Initial eye position (meters)
    pub position: [f32; 3],

    /// Orbit centre (meters)
    pub target: [f32; 3],

    /// Polar angle range from +Y (radians); equal bounds lock the tilt
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    /// Zoom range, eye-to-target distance (meters)
    pub min_distance_m: f32,
    pub max_distance_m: f32,

    /// Enable right-drag panning of the target
    pub enable_pan: bool,

    /// Enable velocity damping (inertia)
    pub enable_damping: bool,

    /// Fraction of the pending motion applied per update (0..1)
    pub damping_factor: f32,

    /// Radians of azimuth per viewport height of drag
    pub rotate_speed: f32,

    /// Distance scale per wheel line
    pub zoom_speed: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            position: [-2.0, 9.0, 15.0],
            target: [0.0, 0.0, 0.0],
            min_polar_angle: FRAC_PI_3,
            max_polar_angle: FRAC_PI_3,
            min_distance_m: 5.0,
            max_distance_m: 40.0,
            enable_pan: false,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

impl OrbitParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_polar_angle > self.max_polar_angle {
            return Err(Error::Config(format!(
                "min_polar_angle {} exceeds max_polar_angle {}",
                self.min_polar_angle, self.max_polar_angle
            )));
        }
        if !(self.min_distance_m > 0.0) || self.min_distance_m > self.max_distance_m {
            return Err(Error::Config(format!(
                "invalid distance range {}..{}",
                self.min_distance_m, self.max_distance_m
            )));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(Error::Config(format!(
                "damping_factor must be in 0..=1, got {}",
                self.damping_factor
            )));
        }
        Ok(())
    }
}
