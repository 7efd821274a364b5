//! Size descriptions declared by an icon set manifest

use crate::manifest::ImageEntry;
use std::fmt;

/// One required icon variant: a device idiom, a square point size and a scale
///
/// Two descriptions are equal when idiom, size and scale match. `role` and
/// `subtype` are carried along for display only.
#[derive(Debug, Clone)]
pub struct SizeDescription {
    /// Device family, e.g. `iphone`, `ipad`, `mac`, `watch`, `car`
    pub idiom: String,
    /// Edge length in points
    pub size: f64,
    /// Pixel density multiplier
    pub scale: u32,
    /// Watch role such as `notificationCenter`, when declared
    pub role: Option<String>,
    /// Watch subtype such as `38mm`, when declared
    pub subtype: Option<String>,
}

impl SizeDescription {
    /// Creates a new size description
    pub fn new(idiom: impl Into<String>, size: f64, scale: u32) -> Self {
        Self {
            idiom: idiom.into(),
            size,
            scale,
            role: None,
            subtype: None,
        }
    }

    /// Parses a manifest entry, returning `None` when idiom, size or scale
    /// cannot be interpreted
    pub fn from_entry(entry: &ImageEntry) -> Option<Self> {
        let idiom = entry.idiom.as_deref()?;
        if idiom.is_empty() {
            return None;
        }
        let size = parse_size(entry.size.as_deref()?)?;
        let scale = parse_scale(entry.scale.as_deref()?)?;

        Some(Self {
            idiom: idiom.to_string(),
            size,
            scale,
            role: entry.role().map(String::from),
            subtype: entry.subtype().map(String::from),
        })
    }

    /// Deterministic base filename, e.g. `iphone-60x60@2x`
    ///
    /// Fractional point sizes are truncated, so `83.5x83.5` becomes `83x83`.
    /// Two sizes of one idiom and scale that differ only below the point (say
    /// `83x83` and `83.5x83.5`) therefore share a name; `resize_all` in the
    /// resizer crate rejects such a pair rather than overwrite one file.
    pub fn canonical_name(&self) -> String {
        let points = self.size.trunc() as u64;
        format!("{}-{}x{}@{}x", self.idiom, points, points, self.scale)
    }

    /// Edge length in pixels of the image satisfying this description
    ///
    /// `None` when the edge rounds to zero or does not fit in a `u32`.
    pub fn pixel_size(&self) -> Option<u32> {
        let edge = (self.size * f64::from(self.scale)).round();
        if (1.0..=f64::from(u32::MAX)).contains(&edge) {
            Some(edge as u32)
        } else {
            None
        }
    }
}

impl PartialEq for SizeDescription {
    fn eq(&self, other: &Self) -> bool {
        self.idiom == other.idiom && self.size == other.size && self.scale == other.scale
    }
}

impl fmt::Display for SizeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Parses `"<w>x<h>"`; only positive square sizes are accepted
fn parse_size(raw: &str) -> Option<f64> {
    let (width, height) = raw.split_once('x')?;
    let width: f64 = width.trim().parse().ok()?;
    let height: f64 = height.trim().parse().ok()?;

    if !width.is_finite() || width <= 0.0 || width != height {
        return None;
    }
    Some(width)
}

/// Parses `"<k>x"` into `k`
fn parse_scale(raw: &str) -> Option<u32> {
    let scale: u32 = raw.strip_suffix('x')?.trim().parse().ok()?;
    (scale > 0).then_some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(idiom: Option<&str>, size: Option<&str>, scale: Option<&str>) -> ImageEntry {
        ImageEntry {
            idiom: idiom.map(String::from),
            size: size.map(String::from),
            scale: scale.map(String::from),
            ..ImageEntry::default()
        }
    }

    #[test]
    fn test_parse_entry() {
        let size = SizeDescription::from_entry(&entry(Some("iphone"), Some("60x60"), Some("2x")))
            .unwrap();

        assert_eq!(size.idiom, "iphone");
        assert_eq!(size.size, 60.0);
        assert_eq!(size.scale, 2);
        assert_eq!(size.canonical_name(), "iphone-60x60@2x");
        assert_eq!(size.pixel_size(), Some(120));
    }

    #[test]
    fn test_fractional_size() {
        let size = SizeDescription::from_entry(&entry(Some("ipad"), Some("83.5x83.5"), Some("2x")))
            .unwrap();

        assert_eq!(size.canonical_name(), "ipad-83x83@2x");
        assert_eq!(size.pixel_size(), Some(167));
    }

    #[test]
    fn test_pixel_size_out_of_range() {
        assert_eq!(SizeDescription::new("mac", 0.2, 1).pixel_size(), None);
        assert_eq!(SizeDescription::new("mac", 1e9, 3).pixel_size(), None);
        assert_eq!(
            SizeDescription::new("mac", 1e9, 4).pixel_size(),
            None,
            "must not saturate at u32::MAX"
        );
        assert_eq!(SizeDescription::new("mac", 1e9, 1).pixel_size(), Some(1_000_000_000));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert!(SizeDescription::from_entry(&entry(None, Some("60x60"), Some("2x"))).is_none());
        assert!(SizeDescription::from_entry(&entry(Some("iphone"), None, Some("2x"))).is_none());
        assert!(SizeDescription::from_entry(&entry(Some("iphone"), Some("60x60"), None)).is_none());
    }

    #[test]
    fn test_malformed_fields_are_rejected() {
        for (size, scale) in [
            ("60", "2x"),
            ("60x40", "2x"),
            ("0x0", "1x"),
            ("axa", "1x"),
            ("60x60", "2"),
            ("60x60", "0x"),
            ("60x60", "-1x"),
        ] {
            assert!(
                SizeDescription::from_entry(&entry(Some("iphone"), Some(size), Some(scale)))
                    .is_none(),
                "{size} @ {scale} should not parse"
            );
        }
    }

    #[test]
    fn test_role_and_subtype_read_from_entry() {
        let mut watch = entry(Some("watch"), Some("24x24"), Some("2x"));
        watch.other.insert("role".into(), "notificationCenter".into());
        watch.other.insert("subtype".into(), 38.into());

        let size = SizeDescription::from_entry(&watch).unwrap();

        assert_eq!(size.role.as_deref(), Some("notificationCenter"));
        assert_eq!(size.subtype, None);
    }

    #[test]
    fn test_equality_ignores_role_and_subtype() {
        let mut watch = SizeDescription::new("watch", 24.0, 2);
        watch.role = Some("notificationCenter".to_string());
        watch.subtype = Some("38mm".to_string());

        assert_eq!(watch, SizeDescription::new("watch", 24.0, 2));
        assert_ne!(watch, SizeDescription::new("watch", 24.0, 3));
        assert_ne!(watch, SizeDescription::new("iphone", 24.0, 2));
    }
}
