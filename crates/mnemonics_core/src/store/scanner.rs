//! Corpus scanner: enumerates note files under the store root.
//!
//! # Invariants
//! - A missing root or category directory yields an empty set, never an error.
//! - Hidden entries (dot-prefixed) are not part of the corpus.
//! - Results are sorted by path so every caller sees one stable order.

use crate::model::note::{Note, NOTE_EXTENSION};
use crate::store::{StoreError, StoreResult};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lists every `.md` file under `root`, or under `root/<category>` when a
/// category is given. Recursive.
pub fn scan_notes(root: &Path, category: Option<&str>) -> Vec<PathBuf> {
    let scope = match category {
        Some(category) => root.join(category),
        None => root.to_path_buf(),
    };
    collect_notes(&scope)
}

/// Lists every `.md` file below `dir`, recursively.
pub fn collect_notes(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    "event=scan_entry module=store status=warn path={} error={}",
                    err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                    err
                );
                continue;
            }
        };
        if entry.file_type().is_file() && has_note_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    files
}

/// Lists the category directories directly under `root`, sorted.
pub fn list_categories(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut dirs = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            !path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    dirs.sort();
    dirs
}

/// Reads a note file as UTF-8 text.
///
/// Both I/O failures and invalid UTF-8 map to [`StoreError::UnreadableNote`].
pub fn read_note_text(path: &Path) -> StoreResult<String> {
    fs::read_to_string(path).map_err(|source| StoreError::UnreadableNote {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses one note. `path` must live under `root`.
pub fn load_note(root: &Path, path: &Path) -> StoreResult<Note> {
    let body = read_note_text(path)?;
    Note::from_parts(root, path, body).ok_or_else(|| StoreError::UnreadableNote {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "note is outside the store root",
        ),
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn has_note_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == NOTE_EXTENSION)
        .unwrap_or(false)
}
