//! Sampler driver: enumerate split roots, select, and write manifests.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cli_support::common::{ManifestOutputArgs, SelectionArgs, SplitRootsArgs};
use data_contracts::{
    ManifestEntry, SelectionMode, SplitKind, SubsetReport, SubsetReportSchemaVersion,
};
use tracing::{info, warn};
use yolo_dataset::{
    check_fraction, list_images, list_primary_images, select, shard_range, write_manifest,
    DatasetResult,
};

use crate::ToolConfig;

/// Fully resolved sampler inputs.
#[derive(Debug, Clone)]
pub struct SubsetPlan {
    pub train_root: PathBuf,
    pub val_root: PathBuf,
    pub test_root: PathBuf,
    pub fraction: f64,
    /// `(count, index)` when shard mode is requested; takes precedence over `fraction`.
    pub shard: Option<(usize, usize)>,
    pub seed: u64,
    pub subset_val: bool,
    pub subset_test: bool,
    pub outdir: PathBuf,
}

impl SubsetPlan {
    /// Command-line values override the tools config.
    pub fn from_args(
        roots: &SplitRootsArgs,
        selection: &SelectionArgs,
        output: &ManifestOutputArgs,
        cfg: &ToolConfig,
    ) -> Self {
        Self {
            train_root: roots.train.clone().unwrap_or_else(|| cfg.train_root.clone()),
            val_root: roots.val.clone().unwrap_or_else(|| cfg.val_root.clone()),
            test_root: roots.test.clone().unwrap_or_else(|| cfg.test_root.clone()),
            fraction: selection.fraction.unwrap_or(cfg.fraction),
            shard: selection.shard(),
            seed: selection.seed.unwrap_or(cfg.seed),
            subset_val: selection.subset_val,
            subset_test: selection.subset_test,
            outdir: output.outdir.clone().unwrap_or_else(|| cfg.splits_dir.clone()),
        }
    }

    /// Reject bad option values before touching the filesystem.
    pub fn validate(&self) -> DatasetResult<()> {
        if let Some((count, index)) = self.shard {
            shard_range(0, count, index)?;
        }
        if self.shard.is_none() || self.subset_val || self.subset_test {
            check_fraction(self.fraction)?;
        }
        Ok(())
    }

    pub fn train_selection(&self) -> SelectionMode {
        match self.shard {
            Some((count, index)) => SelectionMode::Shard { count, index },
            None => SelectionMode::Fraction {
                fraction: self.fraction,
            },
        }
    }

    /// Val/test stay full unless asked to subsample; shard mode never applies to them.
    fn eval_selection(&self, subsample: bool, available: usize) -> SelectionMode {
        if subsample && available > 0 {
            SelectionMode::Fraction {
                fraction: self.fraction,
            }
        } else {
            SelectionMode::Full
        }
    }
}

/// Truncated percentage used in manifest names, e.g. `0.25 -> 25`.
pub fn percent_label(fraction: f64) -> u32 {
    (fraction * 100.0) as u32
}

/// File name encoding the split and how it was selected.
pub fn manifest_name(split: SplitKind, mode: &SelectionMode) -> String {
    let split = split.as_str();
    match *mode {
        SelectionMode::Full => format!("{split}_full.txt"),
        SelectionMode::Fraction { fraction } => format!("{split}_{}.txt", percent_label(fraction)),
        SelectionMode::Shard { count, index } => format!("{split}_shard{index}of{count}.txt"),
    }
}

fn write_split(
    split: SplitKind,
    selection: SelectionMode,
    selected: &[PathBuf],
    outdir: &Path,
) -> anyhow::Result<ManifestEntry> {
    if selected.is_empty() {
        warn!(split = split.as_str(), "no images selected; manifest not written");
        return Ok(ManifestEntry {
            split,
            selection,
            path: None,
            count: 0,
        });
    }
    let out = outdir.join(manifest_name(split, &selection));
    let count = write_manifest(selected, &out)
        .with_context(|| format!("writing {} manifest", split.as_str()))?;
    info!(split = split.as_str(), path = %out.display(), count, "wrote manifest");
    Ok(ManifestEntry {
        split,
        selection,
        path: Some(out),
        count,
    })
}

/// Run the sampler end to end.
///
/// Fails on configuration errors: an empty training root, an out-of-range
/// shard position, or a fraction outside `(0, 1]`.
pub fn run_subset(plan: &SubsetPlan) -> anyhow::Result<SubsetReport> {
    plan.validate()?;

    let train = list_primary_images(&plan.train_root)?;
    let train_mode = plan.train_selection();
    let subset_train = select(&train, &train_mode, plan.seed)?;

    let mut manifests = vec![write_split(
        SplitKind::Train,
        train_mode,
        &subset_train,
        &plan.outdir,
    )?];

    let eval_splits = [
        (SplitKind::Val, &plan.val_root, plan.subset_val),
        (SplitKind::Test, &plan.test_root, plan.subset_test),
    ];
    for (split, root, subsample) in eval_splits {
        let images = list_images(root)?;
        let mode = plan.eval_selection(subsample, images.len());
        let selected = select(&images, &mode, plan.seed)?;
        manifests.push(write_split(split, mode, &selected, &plan.outdir)?);
    }

    let report = SubsetReport {
        schema_version: SubsetReportSchemaVersion::V1,
        seed: plan.seed,
        outdir: plan.outdir.clone(),
        manifests,
    };
    report
        .validate()
        .map_err(|e| anyhow::anyhow!("inconsistent subset report: {e}"))?;
    Ok(report)
}

/// Human-readable summary lines for a finished run.
pub fn render_subset_summary(report: &SubsetReport) -> Vec<String> {
    let mut lines = vec!["Wrote:".to_string()];
    for entry in &report.manifests {
        match &entry.path {
            Some(path) => lines.push(format!(" - {} {}", path.display(), entry.count)),
            None => lines.push(format!(" - {} skipped (no images)", entry.split.as_str())),
        }
    }
    lines
}
