//! Console rendering of operation reports.
//!
//! Every function returns the full text so output stays testable; `main`
//! decides which stream it goes to.

use mnemonics_core::{
    ForgetOutcome, ForgetReport, RecallHit, RecallReport, RememberReport, RememberStatus, Warning,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

const RULE_WIDTH: usize = 50;
const COMPLETE: &str = "✅ Complete";
/// Display prefix for store-relative paths in recall output.
const RECALL_PATH_PREFIX: &str = "./opencode/memory/";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

pub fn warning_line(warning: &Warning) -> String {
    format!("⚠️  Warning: {warning}")
}

/// Text recall report: header, numbered entries, completion marker.
pub fn recall_text(report: &RecallReport) -> String {
    let mut lines = vec!["📋 Memories Recall".to_string(), rule()];
    if report.hits.is_empty() {
        lines.push("No memories found".to_string());
    }
    for (index, hit) in report.hits.iter().enumerate() {
        lines.push(format!("\n📝 Memory {}:", index + 1));
        lines.push(format!("   📍 Path: {RECALL_PATH_PREFIX}{}", hit.path));
        lines.push("   📄 Content:".to_string());
        lines.extend(hit.content.split('\n').map(|line| format!("      {line}")));
        if index + 1 < report.hits.len() {
            lines.push(String::new());
        }
    }
    lines.push(format!("\n{}", rule()));
    lines.push(COMPLETE.to_string());
    lines.join("\n")
}

#[derive(Serialize)]
struct RecallJson<'a> {
    count: usize,
    memories: &'a [RecallHit],
}

pub fn recall_json(report: &RecallReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&RecallJson {
        count: report.hits.len(),
        memories: &report.hits,
    })
}

/// Outcome lines of a `remember` call.
///
/// `announce_similar` prints the similar list that an interactive prompt
/// would otherwise have shown.
pub fn remember_text(report: &RememberReport, title: &str, announce_similar: bool) -> String {
    let mut out = String::new();
    if announce_similar && !report.similar.is_empty() {
        let _ = writeln!(out, "🔍 Similar memory found:");
        for similar in &report.similar {
            let _ = writeln!(
                out,
                "  - {} (similarity: {:.2})",
                similar.title, similar.score
            );
        }
    }
    match report.status {
        RememberStatus::Cancelled(_) => {
            let _ = write!(out, "❌ Update cancelled");
            return out;
        }
        RememberStatus::Created => {
            if report.category_created {
                if let Some(dir) = report.path.parent() {
                    let _ = writeln!(out, "Directory missing, created: {}", dir.display());
                }
            }
            let _ = writeln!(out, "✓ Added: {title}");
        }
        RememberStatus::Updated => {
            let _ = writeln!(out, "✓ Updated: {title}");
        }
    }
    let _ = write!(out, "{COMPLETE}");
    out
}

/// Everything printed after a delete request, in every outcome.
pub fn forget_text(report: &ForgetReport, requested_title: &str) -> String {
    let mut out = String::new();
    let (header, summary) = match &report.outcome {
        ForgetOutcome::NotFound => {
            let _ = writeln!(out, "No memories found matching your criteria.");
            (
                None,
                summary_block(
                    requested_title,
                    "",
                    "Not Found",
                    Path::new("not_found"),
                    &format!("No memories found with title '{requested_title}'"),
                ),
            )
        }
        ForgetOutcome::Ambiguous { candidates } => {
            let _ = writeln!(out, "Invalid choice. Aborting.");
            (
                None,
                summary_block(
                    requested_title,
                    "",
                    "Aborted",
                    Path::new("not_selected"),
                    &format!("{} memories matched; none was selected", candidates.len()),
                ),
            )
        }
        ForgetOutcome::Cancelled { path } => (
            Some("DELETION SUMMARY:"),
            summary_block(&stem_title(path), &category_of(path), "Cancelled", path, ""),
        ),
        ForgetOutcome::Deleted(deleted) => {
            for referencer in &deleted.stripped {
                let _ = writeln!(out, "🔄 Removed reference from: {}", referencer.display());
            }
            let _ = writeln!(out, "✓ Removed: {}", deleted.path.display());
            if deleted.directory_removed {
                if let Some(dir) = deleted.path.parent() {
                    let _ = writeln!(out, "✓ Removed empty directory: {}", dir.display());
                }
            }
            (
                Some("DELETION SUMMARY:"),
                summary_block(&deleted.title, &deleted.category, "Deleted", &deleted.path, ""),
            )
        }
        ForgetOutcome::Failed {
            path,
            error,
            stripped,
        } => {
            for referencer in stripped {
                let _ = writeln!(out, "🔄 Removed reference from: {}", referencer.display());
            }
            let _ = writeln!(out, "❌ Error deleting memory: {error}");
            (
                Some("DELETION FAILED:"),
                summary_block(
                    &stem_title(path),
                    &category_of(path),
                    "Deletion Failed",
                    path,
                    &error.to_string(),
                ),
            )
        }
    };
    if let Some(header) = header {
        let _ = writeln!(out, "\n{}\n{header}\n{}", rule(), rule());
    }
    let _ = writeln!(out, "{summary}");
    let _ = write!(out, "{COMPLETE}");
    out
}

fn summary_block(title: &str, category: &str, status: &str, path: &Path, details: &str) -> String {
    let mut block = format!(
        "# Memory Forgotten\n\n**Title**: {title}\n**Type**: {category}\n**Status**: {status}\n**Path**: {}\n",
        path.display()
    );
    if !details.is_empty() {
        block.push('\n');
        block.push_str(details);
        block.push('\n');
    }
    block
}

fn stem_title(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
        .unwrap_or_default()
}

fn category_of(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
