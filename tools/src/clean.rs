//! Cleaner driver: clean every label file referenced by a set of manifests.

use std::path::PathBuf;

use data_contracts::ClassUniverse;
use yolo_dataset::{
    clean_manifests, validate_summary, RejectCounts, ValidationReport, ValidationThresholds,
};

use crate::ToolConfig;

#[derive(Debug, Clone)]
pub struct CleanPlan {
    pub manifests: Vec<PathBuf>,
    pub classes: ClassUniverse,
    pub thresholds: ValidationThresholds,
}

impl CleanPlan {
    /// Empty `manifests` falls back to the configured defaults.
    pub fn from_args(manifests: Vec<PathBuf>, num_classes: Option<u32>, cfg: &ToolConfig) -> Self {
        let manifests = if manifests.is_empty() {
            cfg.clean_manifests.clone()
        } else {
            manifests
        };
        Self {
            manifests,
            classes: ClassUniverse::new(num_classes.unwrap_or(cfg.num_classes)),
            thresholds: cfg.thresholds,
        }
    }
}

pub fn run_clean(plan: &CleanPlan) -> anyhow::Result<ValidationReport> {
    let summary = clean_manifests(&plan.manifests, &plan.classes)?;
    Ok(validate_summary(summary, &plan.thresholds))
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn render_rejects(rejects: &RejectCounts) -> String {
    format!(
        "dropped: malformed={} unknown_class={} center={} size={} outside={}",
        rejects.malformed,
        rejects.unknown_class,
        rejects.center_out_of_range,
        rejects.size_out_of_range,
        rejects.outside_image
    )
}

/// Human-readable summary lines, in the order the manifests were requested.
pub fn render_clean_summary(plan: &CleanPlan, report: &ValidationReport) -> Vec<String> {
    let summary = &report.summary;
    let mut lines = Vec::new();
    for manifest in &plan.manifests {
        if let Some(result) = summary.manifests.iter().find(|m| &m.manifest == manifest) {
            let c = &result.counts;
            lines.push(format!(
                "Processed {} label files from {}: {} -> {} boxes",
                c.files,
                display_name(manifest),
                c.boxes_before,
                c.boxes_after
            ));
        } else if summary.missing.contains(manifest) {
            lines.push(format!("Split file not found: {}", manifest.display()));
        }
    }
    let t = &summary.totals;
    lines.push(format!(
        "TOTAL files: {}, boxes: {} -> {}",
        t.files, t.boxes_before, t.boxes_after
    ));
    if t.rejects.total() > 0 {
        lines.push(render_rejects(&t.rejects));
    }
    if t.emptied > 0 || t.unmappable > 0 || t.missing_labels > 0 {
        lines.push(format!(
            "emptied files: {}, unmappable paths: {}, missing labels: {}",
            t.emptied, t.unmappable, t.missing_labels
        ));
    }
    lines.push(format!("Validation outcome: {}", report.outcome.as_str()));
    for reason in &report.reasons {
        lines.push(format!(" - {reason}"));
    }
    lines
}
