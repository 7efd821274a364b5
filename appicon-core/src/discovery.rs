//! Discovery of icon set folders on disk

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of Xcode app icon set folders
pub const APP_ICON_SET_EXTENSION: &str = "appiconset";

/// Finds every `.appiconset` folder below `root`
pub fn find_app_icon_sets<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    find_catalogs(APP_ICON_SET_EXTENSION, root)
}

/// Finds every directory below `root` whose name ends with `.` + `extension`
///
/// A directory named exactly `.appiconset` matches too. The root itself is
/// never reported and files never match. Discovery is best effort: a missing
/// root or unreadable entries are skipped, not reported.
pub fn find_catalogs<P: AsRef<Path>>(extension: &str, root: P) -> Vec<PathBuf> {
    let suffix = format!(".{}", extension);

    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(&suffix))
        .map(|entry| entry.into_path())
        .collect()
}
