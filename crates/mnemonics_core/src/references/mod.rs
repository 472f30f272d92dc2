//! Cross-note reference tracking and repair.
//!
//! # Responsibility
//! - Find notes that mention another note's filename (inbound references).
//! - Strip `[[...<filename>...]]` link tokens from referencing notes before
//!   the referenced note is removed.
//! - Detect a circular link before a new note links to a related note.
//!
//! # Invariants
//! - A reference is a literal substring occurrence of the target filename;
//!   no markup is parsed and no edges are stored.
//! - After stripping, no rewritten note contains a link token holding the
//!   target filename.
//! - A note that fails to read or write is reported and left untouched; it
//!   never aborts cleanup of the other referencers.

mod strip;

pub use strip::strip_link_tokens;

use crate::store::files::write_note;
use crate::store::scanner::{read_note_text, scan_notes};
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory inbound-reference graph, rebuilt from a full corpus scan.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    /// target path -> notes whose content contains the target's filename.
    inbound: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Notes skipped because they could not be read.
    skipped: Vec<StoreError>,
}

impl ReferenceGraph {
    /// Scans every note under `root` and records who mentions whom.
    pub fn build(root: &Path) -> Self {
        let mut graph = Self::default();
        let mut contents = Vec::new();
        for path in scan_notes(root, None) {
            match read_note_text(&path) {
                Ok(content) => contents.push((path, content)),
                Err(err) => {
                    warn!(
                        "event=reference_scan module=references status=warn error_code={} path={}",
                        err.code(),
                        path.display()
                    );
                    graph.skipped.push(err);
                }
            }
        }

        for (target, _) in &contents {
            let Some(filename) = file_name_of(target) else {
                continue;
            };
            let referencers = contents
                .iter()
                .filter(|(source, content)| source != target && content.contains(&filename))
                .map(|(source, _)| source.clone())
                .collect::<BTreeSet<_>>();
            graph.inbound.insert(target.clone(), referencers);
        }
        graph
    }

    /// Notes referencing `target`, path-sorted, each listed once.
    pub fn inbound(&self, target: &Path) -> Vec<PathBuf> {
        self.inbound
            .get(target)
            .map(|sources| sources.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Read failures met while building the graph.
    pub fn skipped(&self) -> &[StoreError] {
        &self.skipped
    }

    /// Consumes the graph, returning the read failures.
    pub fn into_skipped(self) -> Vec<StoreError> {
        self.skipped
    }
}

/// Result of an inbound-reference lookup.
#[derive(Debug, Default)]
pub struct ReferenceScan {
    pub referencers: Vec<PathBuf>,
    pub skipped: Vec<StoreError>,
}

/// Finds every note under `root` (other than `target`) whose content
/// contains `target`'s filename.
///
/// Unlike [`ReferenceGraph::build`], this only checks the one filename and
/// works even when `target` itself is unreadable.
pub fn find_referencers(root: &Path, target: &Path) -> ReferenceScan {
    let mut scan = ReferenceScan::default();
    let Some(filename) = file_name_of(target) else {
        return scan;
    };
    for path in scan_notes(root, None) {
        if path.as_path() == target {
            continue;
        }
        match read_note_text(&path) {
            Ok(content) if content.contains(&filename) => scan.referencers.push(path),
            Ok(_) => {}
            Err(err) => {
                warn!(
                    "event=reference_scan module=references status=warn error_code={} path={}",
                    err.code(),
                    path.display()
                );
                scan.skipped.push(err);
            }
        }
    }
    scan
}

/// Outcome of stripping one target's link tokens from its referencers.
#[derive(Debug, Default)]
pub struct StripReport {
    /// Referencers whose content was rewritten.
    pub rewritten: Vec<PathBuf>,
    /// Referencers that contained the filename but no link token; left as is.
    pub unchanged: Vec<PathBuf>,
    /// Referencers that could not be read or written; left as is.
    pub failed: Vec<StoreError>,
}

/// Removes every link token naming `target_filename` from each referencer.
///
/// Best effort: each failure is recorded and the loop continues.
pub fn strip_references(referencers: &[PathBuf], target_filename: &str) -> StripReport {
    let mut report = StripReport::default();
    for path in referencers {
        match strip_references_in(path, target_filename) {
            Ok(true) => {
                info!(
                    "event=reference_strip module=references status=ok path={}",
                    path.display()
                );
                report.rewritten.push(path.clone());
            }
            Ok(false) => report.unchanged.push(path.clone()),
            Err(err) => {
                warn!(
                    "event=reference_strip module=references status=warn error_code={} path={} error={}",
                    err.code(),
                    path.display(),
                    err
                );
                report.failed.push(err);
            }
        }
    }
    report
}

/// Rewrites one referencing note. Returns `false` when nothing changed.
pub fn strip_references_in(path: &Path, target_filename: &str) -> StoreResult<bool> {
    let content = read_note_text(path)?;
    let rewritten = strip_link_tokens(&content, target_filename);
    if rewritten == content {
        return Ok(false);
    }
    write_note(path, &rewritten)?;
    Ok(true)
}

/// Whether linking a note named `new_filename` to `related` would close a cycle,
/// i.e. `related` already mentions `new_filename`.
///
/// A related note that does not exist cannot form a cycle.
pub fn detect_cycle(related: &Path, new_filename: &str) -> StoreResult<bool> {
    match read_note_text(related) {
        Ok(content) => Ok(content.contains(new_filename)),
        Err(StoreError::UnreadableNote { source, .. })
            if source.kind() == io::ErrorKind::NotFound =>
        {
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
}
