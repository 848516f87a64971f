// =============================================================================
// Report Export — ranked scan report as pretty JSON
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::aggregator::ScanReport;

/// Write `report` to `path`.  The file is replaced atomically so a reader never
/// sees a half-written report.
pub fn write_report(report: &ScanReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let content =
        serde_json::to_string_pretty(report).context("failed to serialise scan report to JSON")?;

    let tmp_path = path.with_extension("json.tmp");

    std::fs::write(&tmp_path, &content)
        .with_context(|| format!("failed to write tmp report to {}", tmp_path.display()))?;

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp report to {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = report.rows.len(),
        "scan report written"
    );
    Ok(())
}
