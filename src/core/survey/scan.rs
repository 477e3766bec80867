//! Discovery of source images

use crate::domain::{ImageRef, Result, TaggerError};
use std::path::Path;
use walkdir::WalkDir;

/// File extensions accepted as images, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg"];

/// Whether `path` has an accepted image extension
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Recursively list the images under `root`, relative to `root`
///
/// Entries are visited in file name order so repeated runs produce the
/// same survey. Any image whose path cannot be encoded as an embedded data
/// field fails the whole scan.
pub fn scan_images(root: &Path) -> Result<Vec<ImageRef>> {
    if !root.is_dir() {
        return Err(TaggerError::Configuration(format!(
            "Images directory not found: {}",
            root.display()
        )));
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| TaggerError::Io(format!("Failed to scan images: {e}")))?;
        let path = entry.path();
        if !path.is_file() || !is_image(path) {
            continue;
        }

        let relative = path.strip_prefix(root).map_err(|e| {
            TaggerError::Other(format!("{} is outside {}: {}", path.display(), root.display(), e))
        })?;
        let image = ImageRef::new(relative)
            .map_err(|e| TaggerError::Configuration(e.to_string()))?;
        images.push(image);
    }

    tracing::debug!(root = %root.display(), count = images.len(), "Scanned images");
    Ok(images)
}
