//! Enumerating image roots.

use crate::paths::{absolute_normalized, has_image_extension};
use crate::types::{DatasetError, DatasetResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// List image files directly under `root`, absolute and sorted.
///
/// A root that does not exist or is not a directory yields an empty list.
/// Sorting removes the platform's directory order from every later seeded draw.
pub fn list_images(root: &Path) -> DatasetResult<Vec<PathBuf>> {
    if !root.is_dir() {
        warn!(root = %root.display(), "image root missing or not a directory");
        return Ok(Vec::new());
    }
    let abs_root = absolute_normalized(root).map_err(|e| DatasetError::io(root, e))?;
    let entries = fs::read_dir(&abs_root).map_err(|e| DatasetError::io(&abs_root, e))?;
    let mut images: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| has_image_extension(p) && p.is_file())
        .collect();
    images.sort();
    Ok(images)
}

/// Like [`list_images`], but an empty result is a configuration error.
pub fn list_primary_images(root: &Path) -> DatasetResult<Vec<PathBuf>> {
    let images = list_images(root)?;
    if images.is_empty() {
        return Err(DatasetError::EmptyRoot {
            path: root.to_path_buf(),
        });
    }
    Ok(images)
}
