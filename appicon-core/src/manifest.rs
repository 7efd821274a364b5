//! `Contents.json` manifest reading and rewriting

use crate::{Error, Result, SizeDescription};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the sidecar file inside an icon set folder
pub const CONTENTS_FILE_NAME: &str = "Contents.json";

/// Parsed `Contents.json` document
///
/// Only `images` is interpreted. Every other top-level key (usually `info`)
/// is kept in `other` and written back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestContents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageEntry>>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// One object of the `images` list
///
/// A known key holding something other than a string reads as absent, so the
/// entry is skipped on its own instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub idiom: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    /// Keys this crate does not interpret, `role` and `subtype` included
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ImageEntry {
    /// Watch role such as `notificationCenter`
    pub fn role(&self) -> Option<&str> {
        self.other.get("role").and_then(Value::as_str)
    }

    /// Watch subtype such as `38mm`
    pub fn subtype(&self) -> Option<&str> {
        self.other.get("subtype").and_then(Value::as_str)
    }
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(Some(value)),
        _ => Ok(None),
    }
}

/// An image produced for one size of a manifest
pub trait ProducedImage {
    /// File name the image was (or will be) written under, relative to the
    /// icon set folder
    fn filename(&self) -> &str;

    /// The size this image satisfies
    fn size_description(&self) -> &SizeDescription;
}

/// Outcome of [`AssetManifest::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    /// Entries that received a filename
    pub matched: usize,
    /// Entries left without a filename
    pub unmatched: usize,
    /// Malformed entries removed from the manifest
    pub dropped: usize,
}

impl UpdateSummary {
    /// Number of entries written to the manifest
    pub fn written(&self) -> usize {
        self.matched + self.unmatched
    }
}

/// An icon set folder and its parsed `Contents.json`
#[derive(Debug, Clone)]
pub struct AssetManifest {
    path: PathBuf,
    contents: Option<ManifestContents>,
}

impl AssetManifest {
    /// Opens the icon set at `path`
    ///
    /// A missing or unparsable `Contents.json` is not an error: the manifest
    /// then has no sizes and cannot be updated.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let contents_path = path.join(CONTENTS_FILE_NAME);

        let contents = match read_contents(&contents_path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                tracing::debug!(path = %contents_path.display(), error = %e, "manifest unreadable");
                None
            }
        };

        Self { path, contents }
    }

    /// The icon set folder
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the `Contents.json` sidecar
    pub fn contents_path(&self) -> PathBuf {
        self.path.join(CONTENTS_FILE_NAME)
    }

    /// Whether `Contents.json` was read and parsed
    pub fn is_loaded(&self) -> bool {
        self.contents.is_some()
    }

    /// The parsed document, if it could be read
    pub fn contents(&self) -> Option<&ManifestContents> {
        self.contents.as_ref()
    }

    /// Sizes declared by the manifest, in manifest order
    ///
    /// Entries whose idiom, size or scale cannot be interpreted are skipped.
    pub fn sizes(&self) -> Vec<SizeDescription> {
        self.entries()
            .iter()
            .filter_map(SizeDescription::from_entry)
            .collect()
    }

    /// Points every size at its produced image and writes `Contents.json`
    ///
    /// Each entry takes the filename of the first image whose size description
    /// equals its own; entries without a matching image lose their filename.
    /// Malformed entries are removed. The file is replaced atomically and the
    /// in-memory contents only change once the write succeeded.
    pub fn update<I: ProducedImage>(&mut self, images: &[I]) -> Result<UpdateSummary> {
        let contents_path = self.contents_path();
        let contents = self.contents.as_ref().ok_or_else(|| Error::Schema {
            path: contents_path.clone(),
        })?;
        let entries = contents.images.as_ref().ok_or_else(|| Error::Schema {
            path: contents_path.clone(),
        })?;

        warn_on_duplicates(images);

        let mut summary = UpdateSummary::default();
        let mut rebuilt = Vec::with_capacity(entries.len());

        for entry in entries {
            let Some(description) = SizeDescription::from_entry(entry) else {
                tracing::trace!(?entry, "dropping malformed image entry");
                summary.dropped += 1;
                continue;
            };

            let matched = images
                .iter()
                .find(|image| *image.size_description() == description);

            let mut entry = entry.clone();
            entry.filename = matched.map(|image| image.filename().to_string());
            match entry.filename {
                Some(_) => summary.matched += 1,
                None => summary.unmatched += 1,
            }
            rebuilt.push(entry);
        }

        let updated = ManifestContents {
            images: Some(rebuilt),
            other: contents.other.clone(),
        };
        write_contents(&contents_path, &updated)?;

        tracing::info!(
            path = %contents_path.display(),
            matched = summary.matched,
            unmatched = summary.unmatched,
            dropped = summary.dropped,
            "manifest updated"
        );

        self.contents = Some(updated);
        Ok(summary)
    }

    fn entries(&self) -> &[ImageEntry] {
        self.contents
            .as_ref()
            .and_then(|contents| contents.images.as_deref())
            .unwrap_or_default()
    }
}

fn read_contents(path: &Path) -> Result<ManifestContents> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

/// Writes through a temporary file in the same folder, then renames it over
/// `path`
fn write_contents(path: &Path, contents: &ManifestContents) -> Result<()> {
    let mut json = serde_json::to_vec_pretty(contents)?;
    json.push(b'\n');

    let persist_error = |source: io::Error| Error::Persist {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().ok_or_else(|| {
        persist_error(io::Error::new(io::ErrorKind::NotFound, "no parent directory"))
    })?;

    let mut temp_file = NamedTempFile::new_in(parent).map_err(persist_error)?;
    temp_file.write_all(&json).map_err(persist_error)?;
    temp_file.as_file().sync_all().map_err(persist_error)?;
    temp_file.persist(path).map_err(|e| persist_error(e.error))?;

    Ok(())
}

fn warn_on_duplicates<I: ProducedImage>(images: &[I]) {
    for (i, image) in images.iter().enumerate() {
        let first = images[..i]
            .iter()
            .find(|earlier| earlier.size_description() == image.size_description());
        if let Some(first) = first {
            tracing::warn!(
                size = %image.size_description(),
                kept = first.filename(),
                ignored = image.filename(),
                "several images produced for the same size, keeping the first"
            );
        }
    }
}
