use clap::Args;
use std::path::PathBuf;

/// Image roots for each split; unset roots fall back to the tools config.
#[derive(Debug, Clone, Default, Args)]
pub struct SplitRootsArgs {
    /// Path to the train images folder.
    #[arg(long)]
    pub train: Option<PathBuf>,
    /// Path to the validation images folder (kept full by default).
    #[arg(long)]
    pub val: Option<PathBuf>,
    /// Path to the test images folder (kept full by default).
    #[arg(long)]
    pub test: Option<PathBuf>,
}

/// How the training subset is chosen.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    /// Fraction of training images to keep, in (0, 1].
    #[arg(long)]
    pub fraction: Option<f64>,
    /// Split the training images into this many equal shards and keep one.
    #[arg(long)]
    pub shards: Option<usize>,
    /// 1-based shard to keep (requires --shards; defaults to 1).
    #[arg(long, requires = "shards")]
    pub shard_index: Option<usize>,
    /// Random seed for sampling and shuffling.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Also subsample the validation set by --fraction.
    #[arg(long, default_value_t = false)]
    pub subset_val: bool,
    /// Also subsample the test set by --fraction.
    #[arg(long, default_value_t = false)]
    pub subset_test: bool,
}

impl SelectionArgs {
    /// `(count, index)` when shard mode was requested.
    pub fn shard(&self) -> Option<(usize, usize)> {
        self.shards
            .map(|count| (count, self.shard_index.unwrap_or(1)))
    }
}

/// Directory that receives split manifests.
#[derive(Debug, Clone, Default, Args)]
pub struct ManifestOutputArgs {
    /// Directory to write manifest lists into.
    #[arg(long)]
    pub outdir: Option<PathBuf>,
}

/// Options shared by every dataset tool.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Optional path for a JSON summary of the run.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}
