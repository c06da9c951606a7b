pub mod clean;
pub mod config;
pub mod report;
pub mod subset;

pub use clean::{render_clean_summary, run_clean, CleanPlan};
pub use config::ToolConfig;
pub use report::write_json_report;
pub use subset::{manifest_name, percent_label, render_subset_summary, run_subset, SubsetPlan};
