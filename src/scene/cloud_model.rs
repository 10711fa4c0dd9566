//! Procedural cloud mesh built from overlapping sphere puffs.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

use super::picking::{Aabb, Sphere};
use crate::params::CloudPuff;

const STACKS: u32 = 12;
const SLICES: u32 = 18;

/// Vertex data for the cloud mesh (position + normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CloudVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Cloud geometry in model space plus the puffs and bounds used for picking
pub struct CloudModel {
    pub vertices: Vec<CloudVertex>,
    pub indices: Vec<u32>,
    pub puffs: Vec<Sphere>,
    pub bounds: Aabb,
}

impl CloudModel {
    /// Merge one UV sphere per puff into a single mesh
    pub fn from_puffs(puffs: &[CloudPuff]) -> Self {
        let per_sphere = ((STACKS + 1) * (SLICES + 1)) as usize;
        let mut vertices = Vec::with_capacity(per_sphere * puffs.len());
        let mut indices = Vec::with_capacity((STACKS * SLICES * 6) as usize * puffs.len());
        let mut spheres = Vec::with_capacity(puffs.len());

        for puff in puffs {
            let center = Vec3::from_array(puff.offset);
            let base = vertices.len() as u32;

            for stack in 0..=STACKS {
                let polar = stack as f32 / STACKS as f32 * PI;
                for slice in 0..=SLICES {
                    let azimuth = slice as f32 / SLICES as f32 * TAU;
                    let normal = Vec3::new(
                        polar.sin() * azimuth.cos(),
                        polar.cos(),
                        polar.sin() * azimuth.sin(),
                    );
                    vertices.push(CloudVertex {
                        position: (center + normal * puff.radius_m).to_array(),
                        normal: normal.to_array(),
                    });
                }
            }

            for stack in 0..STACKS {
                for slice in 0..SLICES {
                    let a = base + stack * (SLICES + 1) + slice;
                    let b = a + SLICES + 1;
                    indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
                }
            }

            spheres.push(Sphere {
                center,
                radius: puff.radius_m,
            });
        }

        let bounds = spheres
            .iter()
            .map(Sphere::bounds)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();

        Self {
            vertices,
            indices,
            puffs: spheres,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CloudConfig;

    #[test]
    fn test_single_puff_bounds() {
        let model = CloudModel::from_puffs(&[CloudPuff {
            offset: [1.0, 2.0, 3.0],
            radius_m: 0.5,
        }]);
        assert_eq!(model.bounds.min, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(model.bounds.max, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(model.vertices.len(), ((STACKS + 1) * (SLICES + 1)) as usize);
        assert_eq!(model.puffs.len(), 1);
        assert_eq!(model.puffs[0].center, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_default_cloud_mesh_is_consistent() {
        let config = CloudConfig::default();
        let model = CloudModel::from_puffs(&config.puffs);

        assert_eq!(model.indices.len() % 3, 0);
        assert!(model
            .indices
            .iter()
            .all(|&i| (i as usize) < model.vertices.len()));

        // Every vertex sits inside the merged bounds
        for v in &model.vertices {
            let p = Vec3::from_array(v.position);
            assert!(p.cmpge(model.bounds.min - 1e-4).all());
            assert!(p.cmple(model.bounds.max + 1e-4).all());
        }
    }
}
