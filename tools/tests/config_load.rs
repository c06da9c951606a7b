use std::fs;
use std::path::PathBuf;

use dataset_tools::ToolConfig;

fn write_temp_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("dataset-tools.toml");
    fs::write(&path, contents).expect("write temp config");
    (dir, path)
}

#[test]
fn loads_minimal_config() {
    let (_dir, path) = write_temp_config("num_classes = 7\n");
    let cfg = ToolConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.num_classes, 7);
    assert_eq!(cfg.splits_dir, PathBuf::from("splits"));
    assert_eq!(cfg.train_root, PathBuf::from("train/images"));
    assert_eq!(cfg.fraction, 0.25);
    assert_eq!(cfg.seed, 42);
}

#[test]
fn loads_every_section() {
    let (_dir, path) = write_temp_config(
        r#"
num_classes = 3
splits_dir = "out/splits"

[roots]
train = "data/train/images"
val = "data/valid/images"
test = "data/test/images"

[subset]
fraction = 0.1
seed = 7

[clean]
manifests = ["out/splits/train_10.txt"]

[thresholds]
max_dropped = 100
max_dropped_ratio = 0.05
"#,
    );
    let cfg = ToolConfig::from_path(&path).expect("load config");
    assert_eq!(cfg.num_classes, 3);
    assert_eq!(cfg.val_root, PathBuf::from("data/valid/images"));
    assert_eq!(cfg.fraction, 0.1);
    assert_eq!(cfg.seed, 7);
    assert_eq!(cfg.clean_manifests, vec![PathBuf::from("out/splits/train_10.txt")]);
    assert_eq!(cfg.thresholds.max_dropped, Some(100));
    assert_eq!(cfg.thresholds.max_dropped_ratio, Some(0.05));
    assert_eq!(cfg.thresholds.max_emptied, None);
}

#[test]
fn missing_or_malformed_config_yields_none() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert!(ToolConfig::from_path(&dir.path().join("absent.toml")).is_none());
    let (_dir, path) = write_temp_config("num_classes = \"four\"\n");
    assert!(ToolConfig::from_path(&path).is_none());
    let (_dir, path) = write_temp_config("unknown_key = 1\n");
    assert!(ToolConfig::from_path(&path).is_none());
}

#[test]
fn default_matches_empty_file() {
    let cfg = ToolConfig::parse("").expect("parse");
    assert_eq!(cfg, ToolConfig::default());
    assert_eq!(
        cfg.clean_manifests,
        vec![PathBuf::from("splits/train_5.txt"), PathBuf::from("splits/val_full.txt")]
    );
}

#[test]
fn env_overrides_class_count() {
    std::env::set_var("DATASET_NUM_CLASSES", "9");
    let cfg = ToolConfig::parse("num_classes = 3\n")
        .expect("parse")
        .with_env_overrides();
    std::env::remove_var("DATASET_NUM_CLASSES");
    assert_eq!(cfg.num_classes, 9);
}
