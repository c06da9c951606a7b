//! Threshold checks over cleaning summaries.

use crate::types::{CleanSummary, ValidationOutcome, ValidationReport, ValidationThresholds};

/// Outcome and reasons accumulated while checking one summary.
struct Verdict {
    outcome: ValidationOutcome,
    reasons: Vec<String>,
}

impl Verdict {
    fn fail(&mut self, reason: String) {
        self.outcome = ValidationOutcome::Fail;
        self.reasons.push(reason);
    }

    fn limit_count(&mut self, what: &str, count: usize, max: Option<usize>) {
        if let Some(max) = max.filter(|&max| count > max) {
            self.fail(format!("{what}: {count} exceeds max {max}"));
        }
    }

    /// `part` out of `whole`; an empty whole never fails.
    fn limit_ratio(&mut self, what: &str, part: usize, whole: usize, max: Option<f32>) {
        let Some(max) = max else { return };
        if whole == 0 {
            return;
        }
        let ratio = part as f32 / whole as f32;
        if ratio > max {
            self.fail(format!("{what}: ratio {ratio:.3} exceeds max {max:.3}"));
        }
    }

    /// Any loss at all downgrades a pass to a warning.
    fn note(&mut self, what: &str, count: usize) {
        if count == 0 {
            return;
        }
        if self.outcome == ValidationOutcome::Pass {
            self.outcome = ValidationOutcome::Warn;
        }
        self.reasons.push(format!("{what}: {count} observed"));
    }
}

/// Classify a cleaning summary: pass when nothing was dropped, warn when
/// something was dropped within limits, fail when a limit is exceeded.
pub fn validate_summary(summary: CleanSummary, thresholds: &ValidationThresholds) -> ValidationReport {
    let totals = &summary.totals;
    let dropped = totals.dropped();
    let mut verdict = Verdict {
        outcome: ValidationOutcome::Pass,
        reasons: Vec::new(),
    };

    verdict.limit_count("dropped boxes", dropped, thresholds.max_dropped);
    verdict.limit_ratio(
        "dropped boxes",
        dropped,
        totals.boxes_before,
        thresholds.max_dropped_ratio,
    );
    verdict.note("dropped boxes", dropped);

    verdict.limit_count("emptied label files", totals.emptied, thresholds.max_emptied);
    verdict.note("emptied label files", totals.emptied);

    ValidationReport {
        outcome: verdict.outcome,
        reasons: verdict.reasons,
        summary,
    }
}
