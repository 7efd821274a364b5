//! AppIcon Resizer Library
//!
//! This library turns one master image into the set of bitmaps an icon set
//! manifest asks for, and writes them next to the manifest.

pub mod bitmap_writer;
pub mod resized_image;

pub use bitmap_writer::BitmapFormat;
pub use resized_image::{resize_all, ResizedImage};

use image::imageops::FilterType;

/// Result type for appicon-resizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for appicon-resizer operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("AppIcon core error: {0}")]
    Core(#[from] appicon_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Writing bitmap to {path} failed: {reason}")]
    Persist { path: String, reason: String },

    #[error("Size {0} has no pixels or is too large")]
    InvalidSize(String),

    #[error("Several sizes would be written as {0}")]
    NameCollision(String),
}

/// Largest icon edge, in pixels, the resizer will allocate
pub const MAX_EDGE: u32 = 16_384;

/// Resizing configuration
#[derive(Debug, Clone, Copy)]
pub struct ResizeConfig {
    /// Output file format
    pub format: BitmapFormat,
    /// Resampling filter
    pub filter: FilterType,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            format: BitmapFormat::Png,
            filter: FilterType::Lanczos3,
        }
    }
}
