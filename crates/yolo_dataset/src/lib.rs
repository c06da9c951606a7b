//! Label cleaning and subset sampling for YOLO-style detection datasets.
//!
//! This crate provides utilities for:
//! - Mapping image paths to their label files
//! - Parsing, validating, and rewriting label files in place
//! - Reading and writing split manifests
//! - Enumerating image roots
//! - Seeded fraction sampling and equal-size sharding
//! - Threshold checks over cleaning summaries

pub mod enumerate;
pub mod label;
pub mod manifest;
pub mod paths;
pub mod splits;
pub mod types;
pub mod validation;

pub use enumerate::{list_images, list_primary_images};
pub use label::{clean_label_file, parse_line, LineParseError};
pub use manifest::{clean_from_manifest, clean_manifests, read_manifest, write_manifest};
pub use paths::{
    absolute_normalized, has_image_extension, image_to_label, manifest_line, UnmappablePath,
    IMAGE_EXTENSIONS, LABEL_EXTENSION,
};
pub use splits::{
    check_fraction, sample_fraction, select, select_shard, shard_range, shard_sizes, shuffled,
    subset_size,
};
pub use types::*;
pub use validation::validate_summary;
