//! Run report rendering.

use crate::classifier::OrganizeMode;
use crate::organizer::RunStatistics;
use std::path::Path;

/// Renders the statistics of one run as a plain-text report.
///
/// Pure formatting: reflects all four counters plus the source directory
/// and mode, and touches nothing else.
pub fn render_report(stats: &RunStatistics, source_dir: &Path, mode: OrganizeMode) -> String {
    let rule = "=".repeat(24);
    [
        "File Organization Report".to_string(),
        rule.clone(),
        format!("Source Directory: {}", source_dir.display()),
        format!("Organization Type: {}", mode),
        format!("Total Files: {}", stats.total_files),
        format!("Files Organized: {}", stats.organized_files),
        format!("Files Skipped: {}", stats.skipped_files),
        format!("Errors: {}", stats.errors),
        rule,
    ]
    .join("\n")
}
