//! Read-only listing and search.

use crate::model::memory_type::RecallType;
use crate::store::scanner::{read_note_text, scan_notes};
use crate::store::StoreError;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// Filters of one recall call. Empty strings behave like `None`.
#[derive(Debug, Clone, Default)]
pub struct RecallQuery {
    pub recall_type: Option<RecallType>,
    pub topic: Option<String>,
    pub query: Option<String>,
}

impl RecallQuery {
    fn filters(&self) -> Vec<String> {
        [self.topic.as_deref(), self.query.as_deref()]
            .into_iter()
            .flatten()
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

/// One listed note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecallHit {
    /// Store-relative path, `/`-separated.
    pub path: String,
    /// Trimmed content, or a placeholder when the note was unreadable and
    /// no filter was active.
    pub content: String,
}

#[derive(Debug, Default)]
pub struct RecallReport {
    pub hits: Vec<RecallHit>,
    /// Unreadable notes dropped because filters were active.
    pub skipped: Vec<StoreError>,
}

/// Lists notes under `root` (or one recall category), optionally filtered by
/// case-insensitive content substrings. Results are ordered by path.
pub fn recall(root: &Path, query: &RecallQuery) -> RecallReport {
    let mut report = RecallReport::default();
    let filters = query.filters();
    let category = query.recall_type.map(RecallType::as_str);

    for path in scan_notes(root, category) {
        let relative = relative_display(root, &path);
        match read_note_text(&path) {
            Ok(content) => {
                let lowered = content.to_lowercase();
                if filters.iter().all(|filter| lowered.contains(filter.as_str())) {
                    report.hits.push(RecallHit {
                        path: relative,
                        content: content.trim().to_string(),
                    });
                }
            }
            Err(err) if filters.is_empty() => {
                warn!(
                    "event=recall module=service status=warn error_code={} path={}",
                    err.code(),
                    path.display()
                );
                report.hits.push(RecallHit {
                    path: relative,
                    content: format!("[Error reading file: {err}]"),
                });
            }
            Err(err) => {
                warn!(
                    "event=recall module=service status=skip error_code={} path={}",
                    err.code(),
                    path.display()
                );
                report.skipped.push(err);
            }
        }
    }

    info!(
        "event=recall module=service status=ok category={} filters={} hits={}",
        category.unwrap_or("all"),
        filters.len(),
        report.hits.len()
    );
    report
}

fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
