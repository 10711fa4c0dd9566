//! Flat water mesh (plane or disc); the water shader displaces it.

use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

use crate::params::{WaterMeshConfig, WaterMeshShape};

/// Vertex data for water mesh (position + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Undisplaced water surface at its rest height
pub struct WaterMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl WaterMesh {
    /// Create a new water mesh with specified parameters
    pub fn new(config: &WaterMeshConfig) -> Self {
        match config.shape {
            WaterMeshShape::Plane {
                size_m,
                subdivisions,
            } => Self::plane(size_m, subdivisions as usize, config.surface_height_m),
            WaterMeshShape::Disc {
                radius_m,
                segments,
                rings,
            } => Self::disc(
                radius_m,
                segments as usize,
                rings as usize,
                config.surface_height_m,
            ),
        }
    }

    fn plane(size_m: f32, subdivisions: usize, height_m: f32) -> Self {
        let spacing = size_m / subdivisions as f32;
        let half_size = size_m / 2.0;

        let mut vertices = Vec::with_capacity((subdivisions + 1).pow(2));
        let mut indices = Vec::with_capacity(subdivisions.pow(2) * 6);

        // Generate flat XZ plane grid
        for z in 0..=subdivisions {
            for x in 0..=subdivisions {
                vertices.push(Vertex {
                    position: [
                        x as f32 * spacing - half_size,
                        height_m,
                        z as f32 * spacing - half_size,
                    ],
                    uv: [
                        x as f32 / subdivisions as f32,
                        z as f32 / subdivisions as f32,
                    ],
                });
            }
        }

        // Generate triangle indices (counter-clockwise winding seen from +Y)
        for z in 0..subdivisions {
            for x in 0..subdivisions {
                let top_left = (z * (subdivisions + 1) + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((z + 1) * (subdivisions + 1) + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Self { vertices, indices }
    }

    fn disc(radius_m: f32, segments: usize, rings: usize, height_m: f32) -> Self {
        let mut vertices = Vec::with_capacity(1 + segments * rings);
        let mut indices = Vec::with_capacity(segments * 3 + (rings - 1) * segments * 6);

        vertices.push(Vertex {
            position: [0.0, height_m, 0.0],
            uv: [0.5, 0.5],
        });

        // Ring r (1-based) sits at radius r / rings
        for ring in 1..=rings {
            let fraction = ring as f32 / rings as f32;
            for segment in 0..segments {
                let angle = segment as f32 / segments as f32 * TAU;
                let (sin, cos) = angle.sin_cos();
                vertices.push(Vertex {
                    position: [cos * radius_m * fraction, height_m, sin * radius_m * fraction],
                    uv: [0.5 + cos * 0.5 * fraction, 0.5 + sin * 0.5 * fraction],
                });
            }
        }

        let ring_start = |ring: usize| (1 + (ring - 1) * segments) as u32;

        // Centre fan
        for segment in 0..segments {
            let next = (segment + 1) % segments;
            indices.extend_from_slice(&[
                0,
                ring_start(1) + next as u32,
                ring_start(1) + segment as u32,
            ]);
        }

        // Quads between consecutive rings
        for ring in 1..rings {
            let inner = ring_start(ring);
            let outer = ring_start(ring + 1);
            for segment in 0..segments {
                let next = ((segment + 1) % segments) as u32;
                let segment = segment as u32;
                indices.extend_from_slice(&[
                    inner + segment,
                    inner + next,
                    outer + segment,
                    outer + segment,
                    inner + next,
                    outer + next,
                ]);
            }
        }

        Self { vertices, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_creation() {
        let config = WaterMeshConfig {
            shape: WaterMeshShape::Plane {
                size_m: 100.0,
                subdivisions: 16,
            },
            surface_height_m: 1.3,
        };
        let mesh = WaterMesh::new(&config);

        // Check vertex count: (subdivisions + 1)^2
        assert_eq!(mesh.vertices.len(), 17 * 17);

        // Check triangle count: subdivisions^2 * 2 triangles * 3 indices
        assert_eq!(mesh.indices.len(), 16 * 16 * 6);

        // Corners span the full plane at rest height
        assert_eq!(mesh.vertices[0].position, [-50.0, 1.3, -50.0]);
        assert_eq!(mesh.vertices.last().unwrap().position, [50.0, 1.3, 50.0]);
    }

    #[test]
    fn test_disc_creation() {
        let config = WaterMeshConfig {
            shape: WaterMeshShape::Disc {
                radius_m: 10.0,
                segments: 32,
                rings: 4,
            },
            surface_height_m: 0.0,
        };
        let mesh = WaterMesh::new(&config);

        assert_eq!(mesh.vertices.len(), 1 + 32 * 4);
        assert_eq!(mesh.indices.len(), 32 * 3 + 3 * 32 * 6);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));

        // Outer ring lies on the rim
        let rim = mesh.vertices.last().unwrap().position;
        let radius = (rim[0] * rim[0] + rim[2] * rim[2]).sqrt();
        assert!((radius - 10.0).abs() < 1e-4);
    }
}
