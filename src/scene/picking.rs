//! Pointer picking against the cloud: a coarse box reject, then exact puff spheres.

use glam::{Mat4, Vec3};

/// Pick ray from the camera through the cursor
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl Ray {
    /// `direction` is normalized here; a zero direction stays zero and hits nothing
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Whether the ray passes through `bounds` in front of its origin
    pub fn crosses_box(&self, bounds: &Aabb) -> bool {
        let mut enter = 0.0f32;
        let mut exit = f32::INFINITY;
        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (lo, hi) = (bounds.min[axis], bounds.max[axis]);

            if direction.abs() < f32::EPSILON {
                // Parallel to this slab: must already be inside it
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let (mut near, mut far) = ((lo - origin) / direction, (hi - origin) / direction);
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }
            enter = enter.max(near);
            exit = exit.min(far);
            if enter > exit {
                return false;
            }
        }
        true
    }

    /// Distance along the ray to the first hit on `sphere`, if any
    pub fn hit_sphere(&self, sphere: &Sphere) -> Option<f32> {
        let to_center = sphere.center - self.origin;
        let along = to_center.dot(self.direction);
        let miss_sq = to_center.length_squared() - along * along;
        let radius_sq = sphere.radius * sphere.radius;
        if miss_sq > radius_sq {
            return None;
        }

        let half_chord = (radius_sq - miss_sq).sqrt();
        let (first, second) = (along - half_chord, along + half_chord);
        if second < 0.0 {
            // Sphere entirely behind the origin
            return None;
        }
        Some(first.max(0.0))
    }
}

/// One cloud puff
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Sphere under a model matrix with uniform `scale`
    pub fn transformed(&self, model: &Mat4, scale: f32) -> Sphere {
        Sphere {
            center: model.transform_point3(self.center),
            radius: self.radius * scale.abs(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        let extent = Vec3::splat(self.radius);
        Aabb {
            min: self.center - extent,
            max: self.center + extent,
        }
    }
}

/// Axis-aligned box used as a cheap first test
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// World-space box enclosing this box after `model`
    pub fn transformed(&self, model: &Mat4) -> Aabb {
        (0..8)
            .map(|corner| {
                let pick = |bit: usize, axis: usize| {
                    if corner & bit == 0 {
                        self.min[axis]
                    } else {
                        self.max[axis]
                    }
                };
                model.transform_point3(Vec3::new(pick(1, 0), pick(2, 1), pick(4, 2)))
            })
            .fold(None, |acc: Option<Aabb>, p| {
                let point = Aabb { min: p, max: p };
                Some(acc.map_or(point, |b| b.union(&point)))
            })
            .unwrap_or_default()
    }
}
