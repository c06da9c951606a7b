//! Core types, error definitions, and summaries for yolo_dataset.

use data_contracts::InvalidAnnotation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no images found in {path}")]
    EmptyRoot { path: PathBuf },
    #[error("fraction must lie in (0, 1], got {0}")]
    InvalidFraction(f64),
    #[error("shard count must be at least 1")]
    InvalidShardCount,
    #[error("shard index {index} outside 1..={count}")]
    ShardIndexOutOfRange { index: usize, count: usize },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    /// Configuration problems abort a run; everything else is a filesystem failure.
    pub fn is_config(&self) -> bool {
        !matches!(self, DatasetError::Io { .. })
    }
}

/// Why records were dropped from label files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectCounts {
    pub malformed: usize,
    pub unknown_class: usize,
    pub center_out_of_range: usize,
    pub size_out_of_range: usize,
    pub outside_image: usize,
}

impl RejectCounts {
    pub fn record_invalid(&mut self, err: &InvalidAnnotation) {
        match err {
            InvalidAnnotation::UnknownClass { .. } => self.unknown_class += 1,
            InvalidAnnotation::CenterOutOfRange(..) => self.center_out_of_range += 1,
            InvalidAnnotation::SizeOutOfRange(..) => self.size_out_of_range += 1,
            InvalidAnnotation::OutsideImage(_) => self.outside_image += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.malformed
            + self.unknown_class
            + self.center_out_of_range
            + self.size_out_of_range
            + self.outside_image
    }

    pub fn merge(&mut self, other: &RejectCounts) {
        self.malformed += other.malformed;
        self.unknown_class += other.unknown_class;
        self.center_out_of_range += other.center_out_of_range;
        self.size_out_of_range += other.size_out_of_range;
        self.outside_image += other.outside_image;
    }
}

/// What happened to a label file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelRewrite {
    /// No label file exists.
    Missing,
    /// The file holds only blank lines and was left alone.
    Untouched,
    /// The file was replaced with its valid records.
    Rewritten,
    /// Every record was dropped; the file is now zero-length.
    Emptied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOutcome {
    /// Non-blank lines encountered.
    pub total: usize,
    /// Records written back.
    pub kept: usize,
    pub rejects: RejectCounts,
    pub rewrite: LabelRewrite,
}

impl LabelOutcome {
    pub fn missing() -> Self {
        Self {
            total: 0,
            kept: 0,
            rejects: RejectCounts::default(),
            rewrite: LabelRewrite::Missing,
        }
    }
}

/// Aggregated counts over one or more split manifests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanCounts {
    /// Label files with at least one non-blank line.
    pub files: usize,
    pub boxes_before: usize,
    pub boxes_after: usize,
    /// Files truncated to zero length.
    pub emptied: usize,
    /// Manifest entries without an `images` path component.
    pub unmappable: usize,
    /// Manifest entries whose label file does not exist.
    pub missing_labels: usize,
    pub rejects: RejectCounts,
}

impl CleanCounts {
    pub fn record(&mut self, outcome: &LabelOutcome) {
        match outcome.rewrite {
            LabelRewrite::Missing => self.missing_labels += 1,
            LabelRewrite::Emptied => self.emptied += 1,
            LabelRewrite::Untouched | LabelRewrite::Rewritten => {}
        }
        if outcome.total > 0 {
            self.files += 1;
            self.boxes_before += outcome.total;
            self.boxes_after += outcome.kept;
        }
        self.rejects.merge(&outcome.rejects);
    }

    pub fn merge(&mut self, other: &CleanCounts) {
        self.files += other.files;
        self.boxes_before += other.boxes_before;
        self.boxes_after += other.boxes_after;
        self.emptied += other.emptied;
        self.unmappable += other.unmappable;
        self.missing_labels += other.missing_labels;
        self.rejects.merge(&other.rejects);
    }

    pub fn dropped(&self) -> usize {
        self.boxes_before.saturating_sub(self.boxes_after)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestSummary {
    pub manifest: PathBuf,
    pub counts: CleanCounts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanSummary {
    pub manifests: Vec<ManifestSummary>,
    /// Manifests that were requested but not found.
    pub missing: Vec<PathBuf>,
    pub totals: CleanCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Pass,
    Warn,
    Fail,
}

impl ValidationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationOutcome::Pass => "pass",
            ValidationOutcome::Warn => "warn",
            ValidationOutcome::Fail => "fail",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationThresholds {
    pub max_dropped: Option<usize>,
    pub max_dropped_ratio: Option<f32>,
    pub max_emptied: Option<usize>,
}

impl ValidationThresholds {
    /// Replace each limit whose env var is set and parses.
    pub fn with_env_overrides(self) -> Self {
        fn parse_usize(key: &str) -> Option<usize> {
            std::env::var(key).ok()?.parse().ok()
        }
        fn parse_ratio(key: &str) -> Option<f32> {
            std::env::var(key).ok()?.parse().ok()
        }
        ValidationThresholds {
            max_dropped: parse_usize("DATASET_MAX_DROPPED").or(self.max_dropped),
            max_dropped_ratio: parse_ratio("DATASET_MAX_DROPPED_RATIO").or(self.max_dropped_ratio),
            max_emptied: parse_usize("DATASET_MAX_EMPTIED").or(self.max_emptied),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub outcome: ValidationOutcome,
    pub reasons: Vec<String>,
    pub summary: CleanSummary,
}
