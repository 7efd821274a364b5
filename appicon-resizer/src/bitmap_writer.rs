//! Bitmap encoding and atomic file writing

use crate::{Error, Result};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// File formats an icon can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitmapFormat {
    #[default]
    Png,
    Jpeg,
    Tiff,
    Bmp,
}

impl BitmapFormat {
    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
        }
    }

    /// The matching `image` crate format
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Tiff => ImageFormat::Tiff,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

/// Encodes `bitmap` in `format` into `writer`
///
/// JPEG has no alpha channel, so the bitmap is flattened to RGB first.
pub fn encode<W: Write + Seek>(
    bitmap: &RgbaImage,
    format: BitmapFormat,
    writer: &mut W,
) -> Result<()> {
    match format {
        BitmapFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(bitmap.clone()).to_rgb8();
            rgb.write_to(writer, format.image_format())?;
        }
        _ => bitmap.write_to(writer, format.image_format())?,
    }
    Ok(())
}

/// Writes `bitmap` to `path`, replacing any existing file atomically
pub fn write_atomic(bitmap: &RgbaImage, format: BitmapFormat, path: &Path) -> Result<()> {
    let persist_error = |reason: String| Error::Persist {
        path: path.display().to_string(),
        reason,
    };

    let parent = path
        .parent()
        .ok_or_else(|| persist_error("no parent directory".to_string()))?;

    let temp_file = NamedTempFile::new_in(parent)?;
    let mut writer = BufWriter::new(temp_file);
    encode(bitmap, format, &mut writer)?;
    let temp_file = writer
        .into_inner()
        .map_err(|e| persist_error(e.error().to_string()))?;

    temp_file
        .persist(path)
        .map_err(|e| persist_error(format!("Failed to persist temp file: {}", e.error)))?;

    Ok(())
}
