//! Run summary report
//!
//! Renders the per-run summary.txt consumed by whoever kicked off the
//! run. The format mirrors the console recap: totals first, then the
//! per-class breakdown, then itemized success and failure lists.

use crate::config::MediaClass;
use crate::error::Result;
use crate::pipeline::RunResult;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

/// Render the summary text for a run result
pub fn render_summary(result: &RunResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "File Processing Summary");
    let _ = writeln!(out, "=======================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Total files considered: {}", result.total_considered());
    let _ = writeln!(out, "Skipped (already filed): {}", result.total_skipped());
    let _ = writeln!(out, "Attempted: {}", result.total_attempted());
    let _ = writeln!(out, "Successfully processed: {}", result.total_succeeded());
    let _ = writeln!(out, "Failed: {}", result.total_failed());
    let _ = writeln!(out);

    for class in [MediaClass::Photo, MediaClass::Video] {
        let counts = result.counts(class);
        let _ = writeln!(
            out,
            "{}: {} considered, {} succeeded, {} failed, {} skipped",
            capitalize(class.label()),
            counts.considered,
            counts.succeeded,
            counts.failed,
            counts.skipped,
        );
    }

    if result.total_considered() == 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "No media files found.");
    }

    if !result.successful.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Successfully Processed Files:");
        let _ = writeln!(out, "-----------------------------");
        for filename in &result.successful {
            let _ = writeln!(out, "[OK] {}", filename);
        }
    }

    if !result.failed.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Failed Files:");
        let _ = writeln!(out, "-------------");
        for (filename, error) in &result.failed {
            let _ = writeln!(out, "[X] {}: {}", filename, error);
        }
    }

    out
}

/// Write the summary report to disk (UTF-8)
pub fn write_summary(path: &Path, result: &RunResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_summary(result))?;
    info!(path = %path.display(), "Summary written");
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
