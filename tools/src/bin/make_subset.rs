use anyhow::Result;
use clap::Parser;
use cli_support::common::{CommonArgs, ManifestOutputArgs, SelectionArgs, SplitRootsArgs};
use cli_support::init_tracing;
use dataset_tools::{render_subset_summary, run_subset, write_json_report, SubsetPlan, ToolConfig};

#[derive(Parser, Debug)]
#[command(
    name = "make_subset",
    about = "Create subset or shard manifest lists of image paths for YOLO data configs"
)]
struct Args {
    #[command(flatten)]
    roots: SplitRootsArgs,
    #[command(flatten)]
    selection: SelectionArgs,
    #[command(flatten)]
    output: ManifestOutputArgs,
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.common.verbose);
    let cfg = ToolConfig::load();

    let plan = SubsetPlan::from_args(&args.roots, &args.selection, &args.output, &cfg);
    let report = run_subset(&plan)?;
    for line in render_subset_summary(&report) {
        println!("{line}");
    }
    if let Some(path) = &args.common.report {
        write_json_report(path, &report)?;
    }
    Ok(())
}
