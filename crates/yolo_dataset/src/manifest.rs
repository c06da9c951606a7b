//! Split manifests: plain lists of image paths, one per line.

use crate::label::clean_label_file;
use crate::paths::{absolute_normalized, image_to_label, manifest_line};
use crate::types::{
    CleanCounts, CleanSummary, DatasetError, DatasetResult, LabelOutcome, ManifestSummary,
};
use data_contracts::ClassUniverse;
use rayon::prelude::*;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Read a manifest, normalizing backslashes and skipping blank lines.
pub fn read_manifest(path: &Path) -> DatasetResult<Vec<PathBuf>> {
    let raw = fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
    Ok(raw
        .lines()
        .map(|line| line.trim().replace('\\', "/"))
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Write absolute, forward-slash paths to `out`, creating parent directories.
pub fn write_manifest(paths: &[PathBuf], out: &Path) -> DatasetResult<usize> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
        }
    }
    let file = fs::File::create(out).map_err(|e| DatasetError::io(out, e))?;
    let mut writer = BufWriter::new(file);
    for path in paths {
        let abs = absolute_normalized(path).map_err(|e| DatasetError::io(path, e))?;
        writeln!(writer, "{}", manifest_line(&abs)).map_err(|e| DatasetError::io(out, e))?;
    }
    writer.flush().map_err(|e| DatasetError::io(out, e))?;
    Ok(paths.len())
}

enum EntryTally {
    Unmappable,
    Cleaned(LabelOutcome),
}

/// Clean the label file of every image listed in `manifest`.
///
/// Entries are independent, so they are processed in parallel.
pub fn clean_from_manifest(
    manifest: &Path,
    classes: &ClassUniverse,
) -> DatasetResult<ManifestSummary> {
    let images = read_manifest(manifest)?;
    let tallies = images
        .par_iter()
        .map(|image| match image_to_label(image) {
            Ok(label) => clean_label_file(&label, classes).map(EntryTally::Cleaned),
            Err(err) => {
                warn!("skipping manifest entry: {err}");
                Ok(EntryTally::Unmappable)
            }
        })
        .collect::<DatasetResult<Vec<_>>>()?;

    let mut counts = CleanCounts::default();
    for tally in &tallies {
        match tally {
            EntryTally::Unmappable => counts.unmappable += 1,
            EntryTally::Cleaned(outcome) => counts.record(outcome),
        }
    }
    info!(
        manifest = %manifest.display(),
        files = counts.files,
        before = counts.boxes_before,
        after = counts.boxes_after,
        "cleaned manifest"
    );
    Ok(ManifestSummary {
        manifest: manifest.to_path_buf(),
        counts,
    })
}

/// Clean several manifests; ones that do not exist are recorded and skipped.
pub fn clean_manifests(manifests: &[PathBuf], classes: &ClassUniverse) -> DatasetResult<CleanSummary> {
    let mut summary = CleanSummary::default();
    for manifest in manifests {
        if !manifest.is_file() {
            warn!(manifest = %manifest.display(), "split manifest not found");
            summary.missing.push(manifest.clone());
            continue;
        }
        let result = clean_from_manifest(manifest, classes)?;
        summary.totals.merge(&result.counts);
        summary.manifests.push(result);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_manifest_normalizes_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("list.txt");
        fs::write(&path, "  /a/images/1.jpg \r\n\nC:\\b\\images\\2.jpg\n   \n").unwrap();
        let entries = read_manifest(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                PathBuf::from("/a/images/1.jpg"),
                PathBuf::from("C:/b/images/2.jpg")
            ]
        );
    }

    #[test]
    fn write_manifest_creates_parents_and_terminates_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("splits/nested/train.txt");
        let paths = vec![tmp.path().join("x/images/a.jpg"), tmp.path().join("x/images/b.jpg")];
        assert_eq!(write_manifest(&paths, &out).unwrap(), 2);
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.ends_with('\n'));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], manifest_line(&paths[0]));
        assert!(!text.contains('\\'));
    }

    #[test]
    fn missing_manifest_is_recorded_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("absent.txt");
        let summary = clean_manifests(&[missing.clone()], &ClassUniverse::default()).unwrap();
        assert_eq!(summary.missing, vec![missing]);
        assert!(summary.manifests.is_empty());
        assert_eq!(summary.totals, CleanCounts::default());
    }

    #[test]
    fn unmappable_and_missing_labels_contribute_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let manifest = tmp.path().join("list.txt");
        fs::write(
            &manifest,
            format!(
                "{}\n{}\n",
                tmp.path().join("photos/a.jpg").display(),
                tmp.path().join("images/b.jpg").display()
            ),
        )
        .unwrap();
        let summary = clean_from_manifest(&manifest, &ClassUniverse::default()).unwrap();
        assert_eq!(summary.counts.unmappable, 1);
        assert_eq!(summary.counts.missing_labels, 1);
        assert_eq!(summary.counts.files, 0);
        assert_eq!(summary.counts.boxes_before, 0);
    }
}
