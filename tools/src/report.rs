use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json_report<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report dir {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value).context("serializing report")?;
    fs::write(path, json).with_context(|| format!("writing report {}", path.display()))?;
    Ok(())
}
