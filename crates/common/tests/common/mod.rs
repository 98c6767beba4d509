//! Shared test utilities for lifecycle integration tests
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use common::archive::ArchiveRoot;
use common::staging::StagingList;
use tempfile::TempDir;

/// Set up a test environment with a staging record location, an empty
/// archive root, and a scratch directory for files to stage.
pub fn setup_test_env() -> (StagingList, ArchiveRoot, PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let files = temp_dir.path().join("files");
    let archive = temp_dir.path().join("archive");
    fs::create_dir(&files).unwrap();
    fs::create_dir(&archive).unwrap();

    let staging = StagingList::new(temp_dir.path().join("staging"));
    let root = ArchiveRoot::new(archive);

    (staging, root, files, temp_dir)
}

/// Create a file of `len` bytes and return its absolute path.
pub fn write_file(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    File::create(&path)
        .unwrap()
        .write_all(&vec![b'x'; len])
        .unwrap();
    path
}
