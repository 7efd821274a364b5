//! AppIcon Core Library
//!
//! This library provides the data structures for app icon sets: the size
//! descriptions declared by a `Contents.json` manifest, discovery of
//! `.appiconset` folders on disk, and rewriting a manifest so each size points
//! at a freshly produced image.

pub mod discovery;
pub mod manifest;
pub mod size;

pub use discovery::{find_app_icon_sets, find_catalogs};
pub use manifest::{AssetManifest, ImageEntry, ManifestContents, ProducedImage, UpdateSummary};
pub use size::SizeDescription;

use std::path::PathBuf;

/// Result type for appicon-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for appicon-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not interpret image sizes from {}", path.display())]
    Schema { path: PathBuf },

    #[error("Could not write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
