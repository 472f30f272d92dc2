//! Filesystem access for the note store.
//!
//! # Responsibility
//! - Enumerate note files under the store root (`scanner`).
//! - Read, write and remove single note files (`files`).
//!
//! # Invariants
//! - Read failures surface as `StoreError::UnreadableNote` and are never fatal
//!   to a scan; callers skip the note.
//! - Write failures always carry the offending path and the I/O cause.

pub mod files;
pub mod scanner;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Per-file store failures.
#[derive(Debug)]
pub enum StoreError {
    /// Note could not be read (I/O failure or content is not valid UTF-8).
    UnreadableNote { path: PathBuf, source: io::Error },
    /// Note could not be written or overwritten.
    UnwritableNote { path: PathBuf, source: io::Error },
    /// Note file could not be removed.
    RemoveFailed { path: PathBuf, source: io::Error },
    /// Category directory could not be created.
    CreateDirFailed { path: PathBuf, source: io::Error },
}

impl StoreError {
    /// Path of the file or directory the failure is about.
    pub fn path(&self) -> &Path {
        match self {
            Self::UnreadableNote { path, .. }
            | Self::UnwritableNote { path, .. }
            | Self::RemoveFailed { path, .. }
            | Self::CreateDirFailed { path, .. } => path,
        }
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnreadableNote { .. } => "unreadable_note",
            Self::UnwritableNote { .. } => "unwritable_note",
            Self::RemoveFailed { .. } => "remove_failed",
            Self::CreateDirFailed { .. } => "create_dir_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnreadableNote { path, source } => {
                write!(f, "could not read note `{}`: {source}", path.display())
            }
            Self::UnwritableNote { path, source } => {
                write!(f, "could not write note `{}`: {source}", path.display())
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "could not remove note `{}`: {source}", path.display())
            }
            Self::CreateDirFailed { path, source } => write!(
                f,
                "could not create category directory `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnreadableNote { source, .. }
            | Self::UnwritableNote { source, .. }
            | Self::RemoveFailed { source, .. }
            | Self::CreateDirFailed { source, .. } => Some(source),
        }
    }
}
