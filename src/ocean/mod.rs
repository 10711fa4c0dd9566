//! Water surface: procedural wave field, mesh and snapshots.

mod field;
mod mesh;
pub mod snapshot;

// Re-export public types
pub use field::{
    octave_color_mix, octave_elevation, radial_color_mix, radial_elevation, WaveField, WaveSample,
};
pub use mesh::{Vertex, WaterMesh};
