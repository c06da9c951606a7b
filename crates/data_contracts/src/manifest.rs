use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubsetReportSchemaVersion {
    V1,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Train,
    Val,
    Test,
}

impl SplitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Val => "val",
            SplitKind::Test => "test",
        }
    }
}

/// How the images of one split manifest were chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionMode {
    /// Every enumerated image.
    Full,
    /// `max(1, floor(fraction * N))` images drawn without replacement.
    Fraction { fraction: f64 },
    /// One contiguous slice of a seeded shuffle; `index` is 1-based.
    Shard { count: usize, index: usize },
}

/// One written (or skipped) split manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub split: SplitKind,
    pub selection: SelectionMode,
    /// `None` when the split had nothing to write.
    pub path: Option<PathBuf>,
    pub count: usize,
}

/// Traceability record for one sampler run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsetReport {
    pub schema_version: SubsetReportSchemaVersion,
    pub seed: u64,
    pub outdir: PathBuf,
    pub manifests: Vec<ManifestEntry>,
}

impl SubsetReport {
    pub fn validate(&self) -> Result<(), String> {
        for entry in &self.manifests {
            match entry.selection {
                SelectionMode::Fraction { fraction } => {
                    if fraction.is_nan() || fraction <= 0.0 || fraction > 1.0 {
                        return Err(format!(
                            "{}: fraction {fraction} outside (0, 1]",
                            entry.split.as_str()
                        ));
                    }
                }
                SelectionMode::Shard { count, index } => {
                    if count == 0 || index == 0 || index > count {
                        return Err(format!(
                            "{}: shard {index} of {count} is not a valid position",
                            entry.split.as_str()
                        ));
                    }
                }
                SelectionMode::Full => {}
            }
            if entry.path.is_none() && entry.count > 0 {
                return Err(format!(
                    "{}: {} paths selected but no manifest written",
                    entry.split.as_str(),
                    entry.count
                ));
            }
        }
        Ok(())
    }

    pub fn entry(&self, split: SplitKind) -> Option<&ManifestEntry> {
        self.manifests.iter().find(|m| m.split == split)
    }
}
