//! Output formatting for the run summary.

use serde_json::json;
use zippatch::{ArchiveOutcome, BatchReport, TransformStats};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats the summary of a finished run
    fn format_report(&self, report: &BatchReport) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &BatchReport) -> String {
        let mut output = String::new();

        for outcome in &report.outcomes {
            match outcome {
                ArchiveOutcome::Patched {
                    source,
                    target,
                    stats,
                } => {
                    if source == target {
                        output.push_str(&format!("{}: {}\n", source.display(), describe(stats)));
                    } else {
                        output.push_str(&format!(
                            "{} -> {}: {}\n",
                            source.display(),
                            target.display(),
                            describe(stats)
                        ));
                    }
                }
                ArchiveOutcome::Missing { path } => {
                    output.push_str(&format!("{}: not found\n", path.display()));
                }
            }
        }

        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{} archive(s) patched, {} missing, {} total\n",
            report.patched(),
            report.missing(),
            humanize_bytes(report.totals.total_bytes)
        ));

        output
    }
}

fn describe(stats: &TransformStats) -> String {
    let mut parts = Vec::new();
    let counts = [
        (stats.entries_deleted, "deleted"),
        (stats.entries_renamed, "renamed"),
        (stats.entries_updated, "updated"),
        (stats.entries_edited, "edited"),
        (stats.entries_added, "added"),
        (stats.missing_sources, "missing source(s)"),
        (stats.duplicates_skipped, "duplicate(s) skipped"),
    ];
    for (count, label) in counts {
        if count > 0 {
            parts.push(format!("{} {}", count, label));
        }
    }
    if parts.is_empty() {
        format!("{} entries, unchanged", stats.total_entries())
    } else {
        format!("{} entries, {}", stats.total_entries(), parts.join(", "))
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &BatchReport) -> String {
        let archives: Vec<_> = report
            .outcomes
            .iter()
            .map(|outcome| match outcome {
                ArchiveOutcome::Patched {
                    source,
                    target,
                    stats,
                } => json!({
                    "path": source.display().to_string(),
                    "status": "patched",
                    "target": target.display().to_string(),
                    "stats": stats_json(stats),
                }),
                ArchiveOutcome::Missing { path } => json!({
                    "path": path.display().to_string(),
                    "status": "missing",
                }),
            })
            .collect();

        let obj = json!({
            "archives": archives,
            "patched": report.patched(),
            "missing": report.missing(),
            "totals": stats_json(&report.totals),
            "warnings": report.has_warnings(),
        });
        serde_json::to_string_pretty(&obj).unwrap_or_default()
    }
}

fn stats_json(stats: &TransformStats) -> serde_json::Value {
    json!({
        "entries": stats.total_entries(),
        "kept": stats.entries_kept,
        "renamed": stats.entries_renamed,
        "edited": stats.entries_edited,
        "updated": stats.entries_updated,
        "deleted": stats.entries_deleted,
        "added": stats.entries_added,
        "missing_sources": stats.missing_sources,
        "duplicates_skipped": stats.duplicates_skipped,
        "substitutions": stats.substitutions,
        "total_bytes": stats.total_bytes,
    })
}

/// Creates a formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Formats bytes in human-readable form
pub fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
