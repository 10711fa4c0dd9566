//! Islewave library - procedural water scene with a drifting cloud

pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod logging;
pub mod ocean;
pub mod params;
pub mod rendering;
pub mod scene;
