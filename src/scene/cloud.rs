//! Cloud motion state machine: click-triggered drift, bobbing and breathing.

use glam::{Mat4, Quat, Vec3};

use crate::params::CloudConfig;

/// Drift phase of the cloud
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloudPhase {
    /// Resting near its home x, waiting for a click
    Idle,
    /// Drifting toward the far edge after a click
    MovingForward,
    /// Re-entered from the opposite edge, drifting home
    MovingBack,
}

/// Per-tick cloud state
#[derive(Clone, Debug, PartialEq)]
pub struct CloudMotion {
    pub position: Vec3,
    pub phase: CloudPhase,
    pub rotation_y: f32,
    pub scale: f32,
    rest_y: f32,
}

impl CloudMotion {
    /// Cloud at its load-time pose, idle
    pub fn new(config: &CloudConfig) -> Self {
        let position = Vec3::from_array(config.start_position);
        Self {
            position,
            phase: CloudPhase::Idle,
            rotation_y: config.rest_rotation_y,
            scale: config.base_scale,
            rest_y: position.y,
        }
    }

    pub fn is_moving_forward(&self) -> bool {
        self.phase == CloudPhase::MovingForward
    }

    pub fn is_moving_back(&self) -> bool {
        self.phase == CloudPhase::MovingBack
    }

    /// Start a trip if idle; returns whether the click was accepted
    pub fn launch(&mut self, config: &CloudConfig) -> bool {
        if self.phase != CloudPhase::Idle {
            return false;
        }
        self.phase = CloudPhase::MovingForward;
        self.rotation_y = config.facing_rotation_y;
        true
    }

    /// Advance the drift by one tick; returns the new phase on a transition
    pub fn step(&mut self, config: &CloudConfig) -> Option<CloudPhase> {
        match self.phase {
            CloudPhase::Idle => None,
            CloudPhase::MovingForward => {
                self.position.x += config.step_per_tick_m;
                if self.position.x > config.forward_limit_x_m {
                    self.position.x = config.reset_x_m;
                    self.phase = CloudPhase::MovingBack;
                    Some(self.phase)
                } else {
                    None
                }
            }
            CloudPhase::MovingBack => {
                self.position.x += config.step_per_tick_m;
                if self.position.x > config.home_x_m {
                    self.rotation_y = config.rest_rotation_y;
                    self.phase = CloudPhase::Idle;
                    Some(self.phase)
                } else {
                    None
                }
            }
        }
    }

    /// Bobbing and breathing, applied in every phase
    pub fn animate(&mut self, config: &CloudConfig, elapsed_s: f32) {
        self.position.y = self.rest_y + (elapsed_s * config.bob_speed).sin() * config.bob_amplitude_m;
        self.scale =
            config.base_scale + (elapsed_s * config.breathe_speed).cos() * config.breathe_amplitude;
    }

    /// Model matrix for rendering and picking
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            self.position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_6;

    #[test]
    fn test_idle_ignores_ticks() {
        let config = CloudConfig::default();
        let mut cloud = CloudMotion::new(&config);
        for _ in 0..100 {
            assert_eq!(cloud.step(&config), None);
        }
        assert_eq!(cloud.position.x, -2.0);
        assert!(!cloud.is_moving_forward() && !cloud.is_moving_back());
    }

    #[test]
    fn test_full_trip() {
        let config = CloudConfig::default();
        let mut cloud = CloudMotion::new(&config);
        assert_eq!(cloud.position.x, -2.0);
        assert_eq!(cloud.phase, CloudPhase::Idle);

        assert!(cloud.launch(&config));
        assert!(cloud.is_moving_forward());
        assert_eq!(cloud.rotation_y, config.facing_rotation_y);

        // Forward until the wrap
        let mut ticks = 0;
        while cloud.step(&config).is_none() {
            ticks += 1;
            assert!(ticks < 10_000, "cloud never wrapped");
            assert!(cloud.position.x <= 100.0);
        }
        assert_eq!(cloud.phase, CloudPhase::MovingBack);
        assert_eq!(cloud.position.x, -100.0);

        // Back until home
        let mut ticks = 0;
        while cloud.step(&config).is_none() {
            ticks += 1;
            assert!(ticks < 10_000, "cloud never came home");
            assert!(cloud.is_moving_back());
        }
        assert_eq!(cloud.phase, CloudPhase::Idle);
        assert!(cloud.position.x > -2.0);
        assert_eq!(cloud.rotation_y, FRAC_PI_6);
    }

    #[test]
    fn test_click_while_moving_is_ignored() {
        let config = CloudConfig::default();
        let mut cloud = CloudMotion::new(&config);
        assert!(cloud.launch(&config));
        cloud.step(&config);
        assert!(!cloud.launch(&config));
        assert!(cloud.is_moving_forward());
    }

    #[test]
    fn test_bobbing_independent_of_phase() {
        let config = CloudConfig::default();
        let mut idle = CloudMotion::new(&config);
        let mut moving = CloudMotion::new(&config);
        moving.launch(&config);

        for i in 0..50 {
            let t = i as f32 * 0.1;
            idle.animate(&config, t);
            moving.animate(&config, t);
            assert_eq!(idle.position.y, moving.position.y);
            assert_eq!(idle.scale, moving.scale);
            assert!((idle.position.y - 6.0).abs() <= config.bob_amplitude_m + 1e-6);
        }
    }

    #[test]
    fn test_breathing_at_time_zero() {
        let config = CloudConfig::default();
        let mut cloud = CloudMotion::new(&config);
        cloud.animate(&config, 0.0);
        assert_eq!(cloud.position.y, 6.0);
        assert_eq!(cloud.scale, config.base_scale + config.breathe_amplitude);
    }
}
