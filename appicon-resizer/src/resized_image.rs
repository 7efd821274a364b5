//! Resized icon variants

use crate::{bitmap_writer, Error, ResizeConfig, Result, MAX_EDGE};
use appicon_core::{ProducedImage, SizeDescription};
use image::{imageops, DynamicImage, RgbaImage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A bitmap resized for one size of an icon set
#[derive(Debug, Clone)]
pub struct ResizedImage {
    filename: String,
    size_description: SizeDescription,
    config: ResizeConfig,
    bitmap: RgbaImage,
}

impl ResizedImage {
    /// Resizes `original` to the pixel size of `size_description`
    ///
    /// The output is always square; a non-square original is stretched. The
    /// file name is `name` plus the extension of the configured format. Edges
    /// that round to zero or exceed [`MAX_EDGE`] are rejected before any
    /// allocation.
    pub fn new(
        original: &DynamicImage,
        name: &str,
        size_description: &SizeDescription,
        config: &ResizeConfig,
    ) -> Result<Self> {
        let edge = size_description
            .pixel_size()
            .filter(|edge| *edge <= MAX_EDGE)
            .ok_or_else(|| Error::InvalidSize(size_description.canonical_name()))?;

        let bitmap = if original.width() == edge && original.height() == edge {
            original.to_rgba8()
        } else {
            imageops::resize(original, edge, edge, config.filter)
        };

        Ok(Self {
            filename: format!("{}.{}", name, config.format.extension()),
            size_description: size_description.clone(),
            config: *config,
            bitmap,
        })
    }

    /// File name relative to the icon set folder
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The size this image satisfies
    pub fn size_description(&self) -> &SizeDescription {
        &self.size_description
    }

    /// The resized pixels
    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    /// Writes the image into `folder` under its file name
    pub fn save(&self, folder: &Path) -> Result<PathBuf> {
        let path = folder.join(&self.filename);
        bitmap_writer::write_atomic(&self.bitmap, self.config.format, &path)?;
        tracing::debug!(path = %path.display(), edge = self.bitmap.width(), "icon written");
        Ok(path)
    }
}

impl ProducedImage for ResizedImage {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn size_description(&self) -> &SizeDescription {
        &self.size_description
    }
}

/// Produces one image per size, each named after the size's canonical name
///
/// Fails with [`Error::NameCollision`] when two distinct sizes share a
/// canonical name, since their files would overwrite each other.
pub fn resize_all(
    original: &DynamicImage,
    sizes: &[SizeDescription],
    config: &ResizeConfig,
) -> Result<Vec<ResizedImage>> {
    let mut names = HashMap::new();
    for size in sizes {
        if let Some(earlier) = names.insert(size.canonical_name(), size) {
            if earlier != size {
                return Err(Error::NameCollision(size.canonical_name()));
            }
        }
    }

    sizes
        .iter()
        .map(|size| ResizedImage::new(original, &size.canonical_name(), size, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitmapFormat;
    use appicon_core::AssetManifest;
    use image::Rgba;
    use std::fs;
    use tempfile::TempDir;

    fn master() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([200, 20, 20, 255])))
    }

    #[test]
    fn test_resize_to_pixel_size() {
        let size = SizeDescription::new("iphone", 20.0, 3);
        let resized =
            ResizedImage::new(&master(), &size.canonical_name(), &size, &ResizeConfig::default())
                .unwrap();

        assert_eq!(resized.filename(), "iphone-20x20@3x.png");
        assert_eq!(resized.bitmap().dimensions(), (60, 60));
        assert_eq!(resized.size_description(), &size);
    }

    #[test]
    fn test_filename_follows_format() {
        let size = SizeDescription::new("mac", 16.0, 1);
        let config = ResizeConfig {
            format: BitmapFormat::Jpeg,
            ..ResizeConfig::default()
        };

        let resized = ResizedImage::new(&master(), "small", &size, &config).unwrap();

        assert_eq!(resized.filename(), "small.jpg");
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let size = SizeDescription::new("mac", 0.2, 1);

        let result = ResizedImage::new(&master(), "tiny", &size, &ResizeConfig::default());

        assert!(matches!(result, Err(Error::InvalidSize(_))));
    }

    #[test]
    fn test_huge_size_is_rejected_without_allocating() {
        for size in [
            SizeDescription::new("mac", 1e9, 3),
            SizeDescription::new("mac", 1e9, 1),
            SizeDescription::new("mac", f64::from(MAX_EDGE) + 1.0, 1),
        ] {
            let result = ResizedImage::new(&master(), "huge", &size, &ResizeConfig::default());

            assert!(matches!(result, Err(Error::InvalidSize(_))), "{size} should be rejected");
        }
    }

    #[test]
    fn test_colliding_canonical_names_are_rejected() {
        let sizes = [
            SizeDescription::new("ipad", 83.0, 2),
            SizeDescription::new("ipad", 83.5, 2),
        ];

        let result = resize_all(&master(), &sizes, &ResizeConfig::default());

        assert!(matches!(result, Err(Error::NameCollision(name)) if name == "ipad-83x83@2x"));
    }

    #[test]
    fn test_repeated_size_is_not_a_collision() {
        let sizes = [
            SizeDescription::new("iphone", 29.0, 2),
            SizeDescription::new("iphone", 29.0, 2),
        ];

        let images = resize_all(&master(), &sizes, &ResizeConfig::default()).unwrap();

        assert_eq!(images.len(), 2);
    }

    #[test]
    fn test_save_and_update_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Contents.json"),
            r#"{
                "images": [
                    { "size": "16x16", "idiom": "mac", "scale": "1x" },
                    { "size": "16x16", "idiom": "mac", "scale": "2x" }
                ],
                "info": { "version": 1, "author": "xcode" }
            }"#,
        )
        .unwrap();
        let mut manifest = AssetManifest::open(dir.path());

        let images = resize_all(&master(), &manifest.sizes(), &ResizeConfig::default()).unwrap();
        for image in &images {
            image.save(dir.path()).unwrap();
        }
        manifest.update(&images).unwrap();

        let entries = manifest.contents().unwrap().images.clone().unwrap();
        for entry in entries {
            let filename = entry.filename.unwrap();
            let written = image::open(dir.path().join(&filename)).unwrap();
            let expected = if filename.ends_with("@2x.png") { 32 } else { 16 };
            assert_eq!(written.width(), expected);
        }
    }
}
