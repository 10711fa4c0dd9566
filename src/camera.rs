//! Damped orbit camera with polar and distance limits.

use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

use crate::params::{OrbitParams, RenderConfig};
use crate::scene::{Ray, Viewport};

/// Keeps the polar angle off the poles so `look_at` stays defined
const POLAR_EPSILON: f32 = 1e-6;

/// Pending motion below this is dropped
const MOTION_EPSILON: f32 = 1e-6;

/// Orbit camera around a target point
///
/// Input handlers accumulate pending motion; [`OrbitCamera::update`] applies
/// it once per frame, leaving a decaying remainder when damping is enabled.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    params: OrbitParams,

    target: Vec3,

    /// Eye-to-target distance (meters)
    radius: f32,

    /// Azimuth around +Y (radians)
    theta: f32,

    /// Angle from +Y (radians)
    phi: f32,

    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    pending_scale: f32,
}

impl OrbitCamera {
    /// Create camera from the initial eye position and target
    pub fn new(params: OrbitParams) -> Self {
        let target = Vec3::from_array(params.target);
        let offset = Vec3::from_array(params.position) - target;
        let radius = offset.length().max(MOTION_EPSILON);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let mut camera = Self {
            params,
            target,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            pending_scale: 1.0,
        };
        // Limits apply from the first frame
        camera.update();
        camera
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    /// Current eye position
    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                sin_phi * self.theta.sin(),
                self.phi.cos(),
                sin_phi * self.theta.cos(),
            ) * self.radius
    }

    /// Queue a drag of `dx`,`dy` logical pixels
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let height = viewport_height.max(1) as f32;
        self.delta_theta -= TAU * dx / height * self.params.rotate_speed;
        self.delta_phi -= TAU * dy / height * self.params.rotate_speed;
    }

    /// Queue a pan of the target; ignored unless panning is enabled
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: u32, fov_degrees: f32) {
        if !self.params.enable_pan {
            return;
        }
        let height = viewport_height.max(1) as f32;
        // World units per pixel at the target's depth
        let scale = 2.0 * self.radius * (fov_degrees.to_radians() * 0.5).tan() / height;

        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        self.pan_offset += (-dx * right + dy * up) * scale;
    }

    /// Queue a zoom; positive `lines` moves closer
    pub fn zoom(&mut self, lines: f32) {
        if lines.is_finite() {
            self.pending_scale *= 0.95f32.powf(self.params.zoom_speed * lines);
        }
    }

    /// Apply pending motion and limits; returns true when the camera moved
    pub fn update(&mut self) -> bool {
        let before = (self.theta, self.phi, self.radius, self.target);

        let factor = if self.params.enable_damping {
            self.params.damping_factor
        } else {
            1.0
        };

        self.theta += self.delta_theta * factor;
        self.phi += self.delta_phi * factor;
        self.target += self.pan_offset * factor;

        let min_phi = self.params.min_polar_angle.max(POLAR_EPSILON);
        let max_phi = self.params.max_polar_angle.min(PI - POLAR_EPSILON).max(min_phi);
        self.phi = self.phi.clamp(min_phi, max_phi);

        self.radius = (self.radius * self.pending_scale)
            .clamp(self.params.min_distance_m, self.params.max_distance_m);
        self.pending_scale = 1.0;

        if self.params.enable_damping {
            let keep = 1.0 - self.params.damping_factor;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
            if self.delta_theta.abs() < MOTION_EPSILON {
                self.delta_theta = 0.0;
            }
            if self.delta_phi.abs() < MOTION_EPSILON {
                self.delta_phi = 0.0;
            }
            if self.pan_offset.length_squared() < MOTION_EPSILON * MOTION_EPSILON {
                self.pan_offset = Vec3::ZERO;
            }
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }

        before != (self.theta, self.phi, self.radius, self.target)
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, render_config: &RenderConfig, aspect_ratio: f32) -> (Mat4, Vec3) {
        let eye = self.eye();

        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect_ratio.max(f32::EPSILON),
            render_config.near_plane_m,
            render_config.far_plane_m,
        );

        (proj * view, eye)
    }

    /// World-space ray through a cursor position in logical pixels
    pub fn screen_ray(&self, cursor: (f32, f32), viewport: &Viewport, render_config: &RenderConfig) -> Ray {
        let (view_proj, eye) = self.view_proj(render_config, viewport.aspect_ratio());
        let ndc_x = 2.0 * cursor.0 / viewport.width.max(1) as f32 - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.1 / viewport.height.max(1) as f32;

        let inverse = view_proj.inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        let direction = (far - near).try_normalize().unwrap_or((self.target - eye).normalize_or_zero());

        Ray::new(near, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_3;

    fn viewport() -> Viewport {
        Viewport::new(1280, 720, 1.0, 2.0)
    }

    #[test]
    fn test_initial_pose_respects_polar_lock() {
        let camera = OrbitCamera::new(OrbitParams::default());
        assert!((camera.polar_angle() - FRAC_PI_3).abs() < 1e-5);
        assert!((camera.distance() - 310f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_drag_cannot_change_locked_tilt() {
        let mut camera = OrbitCamera::new(OrbitParams::default());
        camera.rotate(0.0, 300.0, 720);
        for _ in 0..200 {
            camera.update();
        }
        assert!((camera.polar_angle() - FRAC_PI_3).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_drag_orbits_with_damping() {
        let mut camera = OrbitCamera::new(OrbitParams::default());
        let start = camera.azimuth();
        camera.rotate(100.0, 0.0, 720);

        camera.update();
        let first_step = (camera.azimuth() - start).abs();
        assert!(first_step > 0.0);

        // Inertia keeps moving after the drag ends
        assert!(camera.update());
        let total = TAU * 100.0 / 720.0;
        assert!(first_step < total);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut camera = OrbitCamera::new(OrbitParams::default());
        camera.zoom(500.0);
        camera.update();
        assert_eq!(camera.distance(), 5.0);

        camera.zoom(-500.0);
        camera.update();
        assert_eq!(camera.distance(), 40.0);
    }

    #[test]
    fn test_pan_disabled_by_default() {
        let mut camera = OrbitCamera::new(OrbitParams::default());
        camera.pan(50.0, 50.0, 720, 45.0);
        camera.update();
        assert_eq!(camera.target(), Vec3::ZERO);
    }

    #[test]
    fn test_centre_ray_hits_target() {
        let camera = OrbitCamera::new(OrbitParams::default());
        let ray = camera.screen_ray((640.0, 360.0), &viewport(), &RenderConfig::default());

        let to_target = (camera.target() - ray.origin).normalize();
        assert!(ray.direction.dot(to_target) > 0.9999);
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = OrbitCamera::new(OrbitParams::default());
        let (view_proj, eye_pos) = camera.view_proj(&RenderConfig::default(), 16.0 / 9.0);

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(eye_pos.is_finite());
        assert!((eye_pos - camera.eye()).length() < 1e-6);
    }
}
