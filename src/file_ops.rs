// SPDX-License-Identifier: MPL-2.0
//! Filesystem operations behind the delete and move actions.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Deletes the file at `path`.
pub fn delete_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
    tracing::debug!(?path, "Deleted file");
    Ok(())
}

/// Moves `path` into `dest_dir`, keeping its file name, and returns the new path.
///
/// Refuses to overwrite an existing file. Falls back to copy and remove when a
/// plain rename is not possible (e.g. across filesystems).
pub fn move_file(path: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Io(format!("{}: not a file", path.display())))?;
    if !dest_dir.is_dir() {
        return Err(Error::Io(format!("{}: not a directory", dest_dir.display())));
    }

    let target = dest_dir.join(file_name);
    if target.exists() {
        return Err(Error::Io(format!("{}: already exists", target.display())));
    }

    if let Err(rename_err) = fs::rename(path, &target) {
        tracing::debug!(?path, ?target, error = %rename_err, "Rename failed, copying instead");
        fs::copy(path, &target).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        fs::remove_file(path).map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
    }

    tracing::debug!(?path, ?target, "Moved file");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn delete_removes_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("a.png");
        fs::write(&path, b"data").expect("failed to write file");

        delete_file(&path).expect("delete should succeed");
        assert!(!path.exists());
    }

    #[test]
    fn delete_missing_file_is_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let result = delete_file(&temp_dir.path().join("missing.png"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn move_keeps_file_name() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let dest = temp_dir.path().join("sorted");
        fs::create_dir(&dest).expect("failed to create dest");
        let path = temp_dir.path().join("a.png");
        fs::write(&path, b"data").expect("failed to write file");

        let moved = move_file(&path, &dest).expect("move should succeed");
        assert_eq!(moved, dest.join("a.png"));
        assert!(!path.exists());
        assert_eq!(fs::read(&moved).expect("readable"), b"data");
    }

    #[test]
    fn move_refuses_to_overwrite() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let dest = temp_dir.path().join("sorted");
        fs::create_dir(&dest).expect("failed to create dest");
        fs::write(dest.join("a.png"), b"old").expect("failed to write file");
        let path = temp_dir.path().join("a.png");
        fs::write(&path, b"new").expect("failed to write file");

        assert!(move_file(&path, &dest).is_err());
        assert!(path.exists());
    }

    #[test]
    fn move_into_missing_directory_fails() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("a.png");
        fs::write(&path, b"data").expect("failed to write file");

        assert!(move_file(&path, &temp_dir.path().join("nowhere")).is_err());
        assert!(path.exists());
    }
}
