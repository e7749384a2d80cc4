//! Directory helpers.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Create `path` and its parents unless it is already a directory.
///
/// Only "already exists as a directory" counts as success; permission errors,
/// a regular file in the way, and other failures are returned.
pub fn ensure_dir(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Names of the subdirectories of `dir`, sorted. Symlinks to directories count.
pub fn list_subdirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Regular files of `dir`, sorted by name.
///
/// Symlinks are followed. A dangling symlink is still listed so that the
/// caller's open fails loudly instead of the entry vanishing.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let keep = match fs::metadata(&path) {
            Ok(meta) => meta.is_file(),
            Err(_) => entry.file_type()?.is_symlink(),
        };
        if keep {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
