use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli_support::common::CommonArgs;
use cli_support::init_tracing;
use dataset_tools::{render_clean_summary, run_clean, write_json_report, CleanPlan, ToolConfig};
use yolo_dataset::ValidationOutcome;

#[derive(Parser, Debug)]
#[command(
    name = "clean_labels",
    about = "Drop malformed or out-of-bounds boxes from the label files listed in split manifests"
)]
struct Args {
    /// Split manifests to process (defaults to the configured train/val lists).
    manifests: Vec<PathBuf>,
    /// Number of valid classes; ids 0..N are kept.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    num_classes: Option<u32>,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.common.verbose);
    let cfg = ToolConfig::load();

    let plan = CleanPlan::from_args(args.manifests, args.num_classes, &cfg);
    let report = run_clean(&plan)?;
    for line in render_clean_summary(&plan, &report) {
        println!("{line}");
    }
    if let Some(path) = &args.common.report {
        write_json_report(path, &report)?;
    }
    if report.outcome == ValidationOutcome::Fail {
        anyhow::bail!("Label cleaning exceeded configured thresholds; see above.");
    }
    Ok(())
}
