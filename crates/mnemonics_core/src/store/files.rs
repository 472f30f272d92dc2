//! Single-file mutations: overwrite, remove, empty-directory cleanup.

use crate::store::{StoreError, StoreResult};
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Replaces the full content of `path` with `content`.
///
/// The new content is written to a hidden sibling file first and renamed
/// over the target, so readers never observe a half-written note.
pub fn write_note(path: &Path, content: &str) -> StoreResult<()> {
    let unwritable = |source: io::Error| StoreError::UnwritableNote {
        path: path.to_path_buf(),
        source,
    };

    let parent = path
        .parent()
        .ok_or_else(|| unwritable(io::Error::new(io::ErrorKind::InvalidInput, "no parent")))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| unwritable(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?;
    let staging = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let written = fs::File::create(&staging).and_then(|mut file| {
        file.write_all(content.as_bytes())?;
        file.sync_all()
    });
    if let Err(source) = written.and_then(|()| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(unwritable(source));
    }
    Ok(())
}

/// Creates a category directory (and parents) when missing.
///
/// Returns `true` when the directory had to be created.
pub fn ensure_category_dir(dir: &Path) -> StoreResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|source| StoreError::CreateDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Removes one note file.
pub fn remove_note(path: &Path) -> StoreResult<()> {
    fs::remove_file(path).map_err(|source| StoreError::RemoveFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Removes `dir` when it has no entries left.
///
/// Any failure (not empty, already gone, permissions) is swallowed and
/// reported as `false`.
pub fn remove_dir_if_empty(dir: &Path) -> bool {
    let is_empty = match fs::read_dir(dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => return false,
    };
    if !is_empty {
        return false;
    }
    match fs::remove_dir(dir) {
        Ok(()) => true,
        Err(err) => {
            debug!(
                "event=dir_cleanup module=store status=skip path={} error={}",
                dir.display(),
                err
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_category_dir, remove_dir_if_empty, remove_note, write_note};
    use crate::store::StoreError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn write_note_overwrites_whole_file_without_leftovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("note.md");
        fs::write(&path, "a much longer original body").unwrap();

        write_note(&path, "short").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn write_into_missing_directory_is_unwritable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing/note.md");
        let err = write_note(&path, "x").unwrap_err();
        assert!(matches!(err, StoreError::UnwritableNote { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn ensure_category_dir_creates_nested_once() {
        let dir = tempdir().unwrap();
        let category = dir.path().join("decision/architectural");
        assert!(ensure_category_dir(&category).unwrap());
        assert!(!ensure_category_dir(&category).unwrap());
    }

    #[test]
    fn remove_dir_if_empty_keeps_populated_dirs() {
        let dir = tempdir().unwrap();
        let category = dir.path().join("ideas");
        fs::create_dir_all(&category).unwrap();
        fs::write(category.join("a.md"), "a").unwrap();

        assert!(!remove_dir_if_empty(&category));
        remove_note(&category.join("a.md")).unwrap();
        assert!(remove_dir_if_empty(&category));
        assert!(!category.exists());
        assert!(!remove_dir_if_empty(&category));
    }

    #[test]
    fn removing_missing_note_fails() {
        let dir = tempdir().unwrap();
        let err = remove_note(&dir.path().join("gone.md")).unwrap_err();
        assert!(matches!(err, StoreError::RemoveFailed { .. }));
    }
}
