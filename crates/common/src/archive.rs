//! The archive root and its numbered directories.
//!
//! Every committed archive set lives in a directory named with a decimal
//! integer directly under the archive root. Numbers increase monotonically
//! and are never reused, even if an archive is deleted out-of-band; the next
//! number is always one past the highest that ever existed at scan time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Categorized, ErrorKind};

/// The directory that holds committed, numbered archive directories.
#[derive(Debug, Clone)]
pub struct ArchiveRoot {
    path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The archive root must contain only numbered archive directories.
    #[error("archive root contains a non-numeric directory: {name:?}")]
    CorruptArchiveRoot { name: String },

    #[error("could not scan archive root: {0}")]
    Io(#[from] io::Error),
}

impl Categorized for ArchiveError {
    fn kind(&self) -> ErrorKind {
        match self {
            ArchiveError::CorruptArchiveRoot { .. } | ArchiveError::Io(_) => ErrorKind::Filesystem,
        }
    }
}

impl ArchiveRoot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The next free archive number: one past the highest existing
    /// subdirectory number, or 1 for an empty root.
    ///
    /// Comparison is numeric, so "10" sorts after "9". A subdirectory whose
    /// name is not a decimal integer fails the scan.
    pub fn next_number(&self) -> Result<u64, ArchiveError> {
        let mut highest = 0u64;
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let number = name
                .to_str()
                .and_then(|name| name.parse::<u64>().ok())
                .ok_or_else(|| ArchiveError::CorruptArchiveRoot {
                    name: name.to_string_lossy().into_owned(),
                })?;
            highest = highest.max(number);
        }
        Ok(highest + 1)
    }

    /// Path of the archive directory with the given number.
    pub fn directory_for(&self, number: u64) -> PathBuf {
        self.path.join(number.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn root_with(dirs: &[&str]) -> (tempfile::TempDir, ArchiveRoot) {
        let dir = tempfile::tempdir().unwrap();
        for name in dirs {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        let root = ArchiveRoot::new(dir.path().to_path_buf());
        (dir, root)
    }

    #[test]
    fn test_empty_root_allocates_one() {
        let (_dir, root) = root_with(&[]);
        assert_eq!(root.next_number().unwrap(), 1);
    }

    #[test]
    fn test_allocates_past_the_highest_number() {
        let (_dir, root) = root_with(&["1", "2", "5"]);
        assert_eq!(root.next_number().unwrap(), 6);
    }

    #[test]
    fn test_comparison_is_numeric_not_lexical() {
        let (_dir, root) = root_with(&["9", "10"]);
        assert_eq!(root.next_number().unwrap(), 11);
    }

    #[test]
    fn test_non_numeric_directory_fails_the_scan() {
        let (_dir, root) = root_with(&["1", "abc"]);
        let err = root.next_number().unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::CorruptArchiveRoot { ref name } if name == "abc"
        ));
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_plain_files_in_the_root_are_ignored() {
        let (dir, root) = root_with(&["3"]);
        File::create(dir.path().join("notes.txt")).unwrap();
        assert_eq!(root.next_number().unwrap(), 4);
    }

    #[test]
    fn test_directory_for_joins_the_number() {
        let (dir, root) = root_with(&[]);
        assert_eq!(root.directory_for(7), dir.path().join("7"));
    }
}
