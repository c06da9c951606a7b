use std::path::{Path, PathBuf};

use data_contracts::DEFAULT_NUM_CLASSES;
use serde::Deserialize;
use tracing::warn;
use yolo_dataset::ValidationThresholds;

const DEFAULT_CONFIG_NAME: &str = "dataset-tools.toml";
const DEFAULT_FRACTION: f64 = 0.25;
const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    pub num_classes: u32,
    pub splits_dir: PathBuf,
    pub train_root: PathBuf,
    pub val_root: PathBuf,
    pub test_root: PathBuf,
    pub fraction: f64,
    pub seed: u64,
    pub clean_manifests: Vec<PathBuf>,
    pub thresholds: ValidationThresholds,
}

impl Default for ToolConfig {
    fn default() -> Self {
        let splits_dir = PathBuf::from("splits");
        Self {
            num_classes: DEFAULT_NUM_CLASSES,
            train_root: PathBuf::from("train/images"),
            val_root: PathBuf::from("valid/images"),
            test_root: PathBuf::from("test/images"),
            fraction: DEFAULT_FRACTION,
            seed: DEFAULT_SEED,
            clean_manifests: default_clean_manifests(&splits_dir),
            splits_dir,
            thresholds: ValidationThresholds::default(),
        }
    }
}

fn default_clean_manifests(splits_dir: &Path) -> Vec<PathBuf> {
    vec![splits_dir.join("train_5.txt"), splits_dir.join("val_full.txt")]
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ToolConfigFile {
    num_classes: Option<u32>,
    splits_dir: Option<String>,
    roots: Option<RootsSection>,
    subset: Option<SubsetSection>,
    clean: Option<CleanSection>,
    thresholds: Option<ThresholdsSection>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RootsSection {
    train: Option<String>,
    val: Option<String>,
    test: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct SubsetSection {
    fraction: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CleanSection {
    manifests: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ThresholdsSection {
    max_dropped: Option<usize>,
    max_dropped_ratio: Option<f32>,
    max_emptied: Option<usize>,
}

impl ToolConfig {
    /// Load from `DATASET_TOOLS_CONFIG` or `dataset-tools.toml`, then apply env overrides.
    pub fn load() -> Self {
        let path = std::env::var("DATASET_TOOLS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME));
        let cfg = Self::from_path(&path)
            .unwrap_or_default()
            .with_env_overrides();
        cfg.warn_if_invalid();
        cfg
    }

    /// `None` when the file is absent, unreadable, or malformed (the latter two are logged).
    pub fn from_path(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), "tools config unreadable, using defaults: {e}");
                return None;
            }
        };
        match Self::parse(&raw) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!(path = %path.display(), "tools config malformed, using defaults: {e}");
                None
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        let file: ToolConfigFile = toml::from_str(raw)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: ToolConfigFile) -> Self {
        let defaults = Self::default();
        let splits_dir = file
            .splits_dir
            .map(|v| expand_path(&v))
            .unwrap_or(defaults.splits_dir);
        let roots = file.roots.unwrap_or_default();
        let subset = file.subset.unwrap_or_default();
        let thresholds = file.thresholds.unwrap_or_default();
        let clean_manifests = file
            .clean
            .and_then(|c| c.manifests)
            .map(|paths| paths.into_iter().map(|v| expand_path(&v)).collect())
            .unwrap_or_else(|| default_clean_manifests(&splits_dir));

        ToolConfig {
            num_classes: file.num_classes.unwrap_or(defaults.num_classes),
            train_root: roots
                .train
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.train_root),
            val_root: roots
                .val
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.val_root),
            test_root: roots
                .test
                .map(|v| expand_path(&v))
                .unwrap_or(defaults.test_root),
            fraction: subset.fraction.unwrap_or(defaults.fraction),
            seed: subset.seed.unwrap_or(defaults.seed),
            clean_manifests,
            splits_dir,
            thresholds: ValidationThresholds {
                max_dropped: thresholds.max_dropped,
                max_dropped_ratio: thresholds.max_dropped_ratio,
                max_emptied: thresholds.max_emptied,
            },
        }
    }

    /// `DATASET_NUM_CLASSES` and the `DATASET_MAX_*` threshold variables win over the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(n) = std::env::var("DATASET_NUM_CLASSES")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.num_classes = n;
        }
        self.thresholds = self.thresholds.with_env_overrides();
        self
    }

    fn warn_if_invalid(&self) {
        if self.num_classes == 0 {
            warn!("tools config: num_classes is 0; every label record will be dropped");
        }
        if self.splits_dir.as_os_str().is_empty() {
            warn!("tools config: splits_dir is empty; manifests will be written to the working directory");
        }
        if self.clean_manifests.is_empty() {
            warn!("tools config: clean.manifests is empty; clean_labels has nothing to do by default");
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let mut out = raw.to_string();
    if let Some(stripped) = out.strip_prefix('~') {
        if let Ok(home) = std::env::var("HOME") {
            out = format!("{home}{stripped}");
        }
    }
    PathBuf::from(expand_env(&out))
}

/// Substitute `${VAR}` with its value; unknown variables stay verbatim.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let key = &rest[start + 2..start + 2 + len];
        match std::env::var(key) {
            Ok(val) => out.push_str(&val),
            Err(_) => out.push_str(&rest[start..start + 3 + len]),
        }
        rest = &rest[start + 3 + len..];
    }
    out.push_str(rest);
    out
}
