//! Error types for the islewave scene.

use thiserror::Error;

/// Main error type for configuration, assets and host subsystems
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, Error>;
