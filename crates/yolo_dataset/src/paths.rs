//! Path conventions shared by the sampler and the cleaner.

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Image extensions recognized when enumerating a root (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Extension of every label file.
pub const LABEL_EXTENSION: &str = "txt";

const IMAGES_DIR: &str = "images";
const LABELS_DIR: &str = "labels";

/// The image path has no component named `images`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no `images` component in {}", .0.display())]
pub struct UnmappablePath(pub PathBuf);

/// Map `.../images/.../name.ext` to `.../labels/.../name.txt`.
///
/// Only the first component named exactly `images` is replaced.
pub fn image_to_label(image: &Path) -> Result<PathBuf, UnmappablePath> {
    let mut swapped = false;
    let mapped: PathBuf = image
        .components()
        .map(|component| match component {
            Component::Normal(name) if !swapped && name == IMAGES_DIR => {
                swapped = true;
                Component::Normal(OsStr::new(LABELS_DIR))
            }
            other => other,
        })
        .collect();
    if !swapped {
        return Err(UnmappablePath(image.to_path_buf()));
    }
    Ok(mapped.with_extension(LABEL_EXTENSION))
}

pub fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

/// Absolute form of `path` with `.` and `..` folded away without touching the filesystem.
///
/// `..` at the root stays at the root. Symlinks are not resolved.
pub fn absolute_normalized(path: &Path) -> io::Result<PathBuf> {
    let abs = std::path::absolute(path)?;
    let mut out = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Manifest form of a path: forward slashes regardless of platform.
pub fn manifest_line(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
