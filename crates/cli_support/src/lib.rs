//! Shared CLI plumbing for the dataset tools.

pub mod common;
pub mod logging;

pub use logging::init_tracing;
