//! Error type for the fallible edges of icy_gallery
//!
//! Widget operations never fail; only options I/O and the software surface return errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read options '{path}': {message}")]
    ReadOptions { path: PathBuf, message: String },

    // === Options Errors ===
    #[error("Invalid options file: {0}")]
    OptionsParse(#[from] toml::de::Error),

    #[error("Failed to serialize options: {0}")]
    OptionsWrite(#[from] toml::ser::Error),

    // === Surface Errors ===
    #[error("Invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    // === External Errors ===
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type alias for icy_gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

impl GalleryError {
    pub fn read_options(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ReadOptions {
            path: path.into(),
            message: msg.into(),
        }
    }
}
