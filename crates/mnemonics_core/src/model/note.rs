//! Note identity and filename derivation.
//!
//! # Invariants
//! - `kebab_case` is deterministic: equal titles always derive equal identifiers.
//! - A note's location is `<category>/<identifier>.md` relative to the store root.

use super::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File extension carried by every note.
pub const NOTE_EXTENSION: &str = "md";

static NON_ALNUM_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid kebab regex"));
static FIRST_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t\r]*$").expect("valid heading regex"));

/// Where a note lives inside the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NoteLocation {
    /// Folder path relative to the store root, `/`-separated. Empty for
    /// notes stored directly under the root.
    pub category: String,
    /// Filename stem.
    pub identifier: String,
}

impl NoteLocation {
    pub fn new(category: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            identifier: identifier.into(),
        }
    }

    /// Derives a location from an absolute note path under `root`.
    ///
    /// Returns `None` when `path` is outside `root` or has no stem.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        let identifier = relative.file_stem()?.to_string_lossy().to_string();
        let category = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .map(|component| component.as_os_str().to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join("/")
            })
            .unwrap_or_default();
        Some(Self {
            category,
            identifier,
        })
    }

    /// `<identifier>.md`
    pub fn filename(&self) -> String {
        format!("{}.{NOTE_EXTENSION}", self.identifier)
    }

    /// Path relative to the store root.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.category.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(self.filename());
        path
    }

    /// Absolute path under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.relative_path())
    }

    /// `/`-separated relative path, used for display and JSON output.
    pub fn display_path(&self) -> String {
        if self.category.is_empty() {
            self.filename()
        } else {
            format!("{}/{}", self.category, self.filename())
        }
    }
}

/// A note loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Absolute path of the backing file.
    pub path: PathBuf,
    pub location: NoteLocation,
    /// First-level heading text, or the identifier when there is none.
    pub title: String,
    /// Full file content, untouched.
    pub body: String,
}

impl Note {
    /// Builds a note from its path and raw content.
    ///
    /// Returns `None` when `path` is not under `root`.
    pub fn from_parts(root: &Path, path: &Path, body: String) -> Option<Self> {
        let location = NoteLocation::from_path(root, path)?;
        let title = heading_title(&body).unwrap_or_else(|| location.identifier.clone());
        Some(Self {
            path: path.to_path_buf(),
            location,
            title,
            body,
        })
    }
}

/// Lower-cases `title`, turns every run of non-alphanumerics into one hyphen
/// and trims hyphens at both ends.
pub fn kebab_case(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_ALNUM_RUN_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Derives the `<identifier>.md` filename for a title.
pub fn note_filename(title: &str) -> Result<String, ModelError> {
    let identifier = kebab_case(title);
    if identifier.is_empty() {
        return Err(ModelError::EmptyIdentifier(title.to_string()));
    }
    Ok(format!("{identifier}.{NOTE_EXTENSION}"))
}

/// Text of the first `# ` heading line, if any.
pub fn heading_title(content: &str) -> Option<String> {
    FIRST_HEADING_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Human title recovered from an identifier: separators become spaces.
pub fn title_from_identifier(identifier: &str) -> String {
    identifier.replace(['-', '_'], " ")
}

#[cfg(test)]
mod tests {
    use super::{
        heading_title, kebab_case, note_filename, title_from_identifier, Note, NoteLocation,
    };
    use crate::model::ModelError;
    use std::path::Path;

    #[test]
    fn kebab_case_collapses_runs_and_trims() {
        assert_eq!(kebab_case("API Design Notes"), "api-design-notes");
        assert_eq!(kebab_case("  --Hello,   World!--  "), "hello-world");
        assert_eq!(kebab_case("v2.0 release"), "v2-0-release");
    }

    #[test]
    fn equal_titles_derive_equal_filenames() {
        assert_eq!(
            note_filename("API design notes").unwrap(),
            note_filename("api DESIGN   notes!").unwrap()
        );
    }

    #[test]
    fn punctuation_only_title_is_rejected() {
        let err = note_filename("!!! ???").unwrap_err();
        assert!(matches!(err, ModelError::EmptyIdentifier(_)));
    }

    #[test]
    fn heading_title_ignores_second_level_headings() {
        assert_eq!(heading_title("## Overview\n\nbody"), None);
        assert_eq!(
            heading_title("intro\n# Real Title  \n## Overview").as_deref(),
            Some("Real Title")
        );
    }

    #[test]
    fn location_round_trips_nested_category() {
        let root = Path::new("/store");
        let location = NoteLocation::from_path(
            root,
            Path::new("/store/decision/architectural/use-sqlite.md"),
        )
        .unwrap();
        assert_eq!(location.category, "decision/architectural");
        assert_eq!(location.identifier, "use-sqlite");
        assert_eq!(
            location.display_path(),
            "decision/architectural/use-sqlite.md"
        );
        assert_eq!(
            location.resolve(root),
            Path::new("/store/decision/architectural/use-sqlite.md")
        );
    }

    #[test]
    fn note_title_falls_back_to_identifier() {
        let root = Path::new("/store");
        let note = Note::from_parts(
            root,
            Path::new("/store/ideas/quiet-hours.md"),
            "no heading here".to_string(),
        )
        .unwrap();
        assert_eq!(note.title, "quiet-hours");
        assert_eq!(title_from_identifier("quiet-hours_v2"), "quiet hours v2");
    }
}
