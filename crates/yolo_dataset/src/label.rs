//! Parsing, validating, and rewriting YOLO label files.

use crate::types::{DatasetError, DatasetResult, LabelOutcome, LabelRewrite, RejectCounts};
use data_contracts::{AnnotationRecord, ClassUniverse, InvalidAnnotation};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineParseError {
    #[error("expected 5 tokens, found {0}")]
    TokenCount(usize),
    #[error("invalid {field} '{raw}'; expected a number")]
    NotANumber { field: &'static str, raw: String },
    #[error("class id '{0}' is not finite")]
    NonFiniteClass(String),
}

const FIELDS: [&str; 5] = ["class_id", "x_center", "y_center", "width", "height"];

/// Parse one label line into a record.
///
/// The class id may be stored as a float; it is truncated toward zero.
pub fn parse_line(line: &str) -> Result<AnnotationRecord, LineParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != FIELDS.len() {
        return Err(LineParseError::TokenCount(tokens.len()));
    }
    let mut values = [0.0f64; 5];
    for (i, (raw, field)) in tokens.iter().zip(FIELDS).enumerate() {
        values[i] = raw.parse::<f64>().map_err(|_| LineParseError::NotANumber {
            field,
            raw: (*raw).to_string(),
        })?;
    }
    if !values[0].is_finite() {
        return Err(LineParseError::NonFiniteClass(tokens[0].to_string()));
    }
    Ok(AnnotationRecord::new(
        values[0].trunc() as i64,
        values[1],
        values[2],
        values[3],
        values[4],
    ))
}

/// Decode bytes as UTF-8, dropping invalid sequences instead of replacing them.
fn decode_lossy(raw: &[u8]) -> String {
    raw.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// The record exactly as it will be written back, checked again.
///
/// Six-decimal rounding can push a box that sits on the tolerance limit past
/// it; such a box is rejected now rather than on the next pass.
fn written_form(
    record: &AnnotationRecord,
    classes: &ClassUniverse,
) -> Result<AnnotationRecord, InvalidAnnotation> {
    let rounded = AnnotationRecord::new(
        record.class_id,
        round_to_written(record.x_center),
        round_to_written(record.y_center),
        round_to_written(record.width),
        round_to_written(record.height),
    );
    rounded.validate(classes)?;
    Ok(rounded)
}

fn round_to_written(value: f64) -> f64 {
    format!("{value:.6}").parse().unwrap_or(value)
}

/// Replace `path` with `contents` via a sibling temp file, keeping its permissions.
fn replace_contents(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let perms = fs::metadata(path)?.permissions();
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.as_file().set_permissions(perms)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Clean one label file in place and report `(total, kept)` with rejection reasons.
///
/// A missing file is a no-op. A file of only blank lines is left untouched.
/// When every record is dropped the file is truncated to zero length.
pub fn clean_label_file(path: &Path, classes: &ClassUniverse) -> DatasetResult<LabelOutcome> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LabelOutcome::missing()),
        Err(e) => return Err(DatasetError::io(path, e)),
    };
    let text = decode_lossy(&raw);

    let mut total = 0usize;
    let mut rejects = RejectCounts::default();
    let mut kept = Vec::new();
    for line in text.split(['\n', '\r']) {
        if line.trim().is_empty() {
            continue;
        }
        total += 1;
        let record = match parse_line(line) {
            Ok(record) => record,
            Err(_) => {
                rejects.malformed += 1;
                continue;
            }
        };
        match record.validate(classes).and_then(|()| written_form(&record, classes)) {
            Ok(written) => kept.push(written),
            Err(err) => rejects.record_invalid(&err),
        }
    }

    let rewrite = if total == 0 {
        LabelRewrite::Untouched
    } else if kept.is_empty() {
        replace_contents(path, b"").map_err(|e| DatasetError::io(path, e))?;
        LabelRewrite::Emptied
    } else {
        let mut out = String::new();
        for record in &kept {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        replace_contents(path, out.as_bytes()).map_err(|e| DatasetError::io(path, e))?;
        LabelRewrite::Rewritten
    };
    debug!(
        path = %path.display(),
        total,
        kept = kept.len(),
        ?rewrite,
        "cleaned label file"
    );

    Ok(LabelOutcome {
        total,
        kept: kept.len(),
        rejects,
        rewrite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> ClassUniverse {
        ClassUniverse::new(4)
    }

    #[test]
    fn parse_line_accepts_valid_rows() {
        let rec = parse_line("1 0.5 0.25 0.1 0.2").unwrap();
        assert_eq!(rec, AnnotationRecord::new(1, 0.5, 0.25, 0.1, 0.2));
        let rec = parse_line("  2\t0.5   0.5 1 1 \r").unwrap();
        assert_eq!(rec.class_id, 2);
    }

    #[test]
    fn parse_line_truncates_float_class_ids() {
        assert_eq!(parse_line("3.0 0.5 0.5 0.1 0.1").unwrap().class_id, 3);
        assert_eq!(parse_line("2.9 0.5 0.5 0.1 0.1").unwrap().class_id, 2);
        assert_eq!(parse_line("-0.5 0.5 0.5 0.1 0.1").unwrap().class_id, 0);
        assert_eq!(parse_line("1e0 0.5 0.5 0.1 0.1").unwrap().class_id, 1);
    }

    #[test]
    fn parse_line_rejects_wrong_token_counts() {
        assert_eq!(
            parse_line("0 0.5 0.5 0.1"),
            Err(LineParseError::TokenCount(4))
        );
        assert_eq!(
            parse_line("0 0.5 0.5 0.1 0.1 0.9"),
            Err(LineParseError::TokenCount(6))
        );
    }

    #[test]
    fn parse_line_rejects_non_numeric_tokens() {
        let err = parse_line("cat 0.5 0.5 0.1 0.1").unwrap_err();
        assert!(matches!(
            err,
            LineParseError::NotANumber {
                field: "class_id",
                ..
            }
        ));
        let err = parse_line("0 0.5 0.5 wide 0.1").unwrap_err();
        assert!(matches!(err, LineParseError::NotANumber { field: "width", .. }));
        assert!(matches!(
            parse_line("inf 0.5 0.5 0.1 0.1"),
            Err(LineParseError::NonFiniteClass(_))
        ));
        assert!(matches!(
            parse_line("nan 0.5 0.5 0.1 0.1"),
            Err(LineParseError::NonFiniteClass(_))
        ));
    }

    #[test]
    fn decode_lossy_drops_invalid_bytes() {
        assert_eq!(decode_lossy(b"0 0.5\xff 0.5"), "0 0.5 0.5");
    }

    #[test]
    fn decode_lossy_keeps_literal_replacement_characters() {
        let mut raw = "0 \u{FFFD} 0.5".as_bytes().to_vec();
        raw.extend_from_slice(b"\xc3\n");
        assert_eq!(decode_lossy(&raw), "0 \u{FFFD} 0.5\n");
    }

    #[test]
    fn box_pushed_past_the_edge_by_rounding_is_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("edge.txt");
        fs::write(&path, "0 0.99999951 0.5 0.0000029 0.2\n1 0.5 0.5 0.2 0.2\n").unwrap();
        assert!(parse_line("0 0.99999951 0.5 0.0000029 0.2")
            .unwrap()
            .is_valid(&classes()));

        let outcome = clean_label_file(&path, &classes()).unwrap();
        assert_eq!((outcome.total, outcome.kept), (2, 1));
        assert_eq!(outcome.rejects.outside_image, 1);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1 0.500000 0.500000 0.200000 0.200000\n"
        );
    }

    #[test]
    fn missing_file_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = clean_label_file(&tmp.path().join("absent.txt"), &classes()).unwrap();
        assert_eq!(outcome, LabelOutcome::missing());
        assert!(!tmp.path().join("absent.txt").exists());
    }

    #[test]
    fn blank_file_is_left_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blank.txt");
        fs::write(&path, "\n   \n\t\n").unwrap();
        let outcome = clean_label_file(&path, &classes()).unwrap();
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.kept, 0);
        assert_eq!(outcome.rewrite, LabelRewrite::Untouched);
        assert_eq!(fs::read_to_string(&path).unwrap(), "\n   \n\t\n");
    }

    #[test]
    fn malformed_and_invalid_records_are_tallied_by_reason() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("mixed.txt");
        fs::write(
            &path,
            "0 0.5 0.5 0.2 0.2\nbad line\n9 0.5 0.5 0.2 0.2\n1 1.5 0.5 0.2 0.2\n\n1 0.5 0.5 0 0.2\n2 0.05 0.5 0.2 0.2\r\n",
        )
        .unwrap();
        let outcome = clean_label_file(&path, &classes()).unwrap();
        assert_eq!(outcome.total, 6);
        assert_eq!(outcome.kept, 1);
        assert_eq!(
            outcome.rejects,
            RejectCounts {
                malformed: 1,
                unknown_class: 1,
                center_out_of_range: 1,
                size_out_of_range: 1,
                outside_image: 1,
            }
        );
        assert_eq!(outcome.rewrite, LabelRewrite::Rewritten);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "0 0.500000 0.500000 0.200000 0.200000\n"
        );
    }

    #[test]
    fn invalid_utf8_bytes_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bytes.txt");
        fs::write(&path, b"1 0.5 0.5\xfe 0.2 0.2\n").unwrap();
        let outcome = clean_label_file(&path, &classes()).unwrap();
        assert_eq!((outcome.total, outcome.kept), (1, 1));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1 0.500000 0.500000 0.200000 0.200000\n"
        );
    }
}
