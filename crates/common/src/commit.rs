//! The commit transaction: staged set → committed archive directory.
//!
//! A commit moves every staged file into a freshly allocated numbered
//! directory under the archive root, mirroring each file's absolute path
//! (minus the leading separator) beneath it, then creates a symlink at every
//! original path pointing at the file's new location, and finally retires the
//! staging record into the archive directory as its manifest.
//!
//! The two phases never interleave. Moving a file out of a path that a
//! symlink at that same path already references would leave the entry
//! pointing at itself, so every original path is vacated before any link
//! claims one. A crash between the phases leaves a diagnosable state: files
//! moved, no links yet.
//!
//! There is no rollback. A failed move leaves the already-moved files in the
//! archive directory with their original paths vacated; a failed link leaves
//! all files moved and some paths unlinked. Both are reported and left for
//! manual repair.

use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveError, ArchiveRoot};
use crate::error::{Categorized, ErrorKind};
use crate::media::{self, SizeError};
use crate::staging::{StagingError, StagingList};

/// Drives the commit of one staged archive set.
#[derive(Debug)]
pub struct CommitEngine<'a> {
    staging: &'a StagingList,
    root: &'a ArchiveRoot,
}

/// What a successful commit produced.
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Number allocated to the new archive directory.
    pub number: u64,
    /// The archive directory itself.
    pub directory: PathBuf,
    /// How many files were moved and linked.
    pub files: usize,
    /// Total sector-rounded size of the set.
    pub bytes_on_medium: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("staged set needs {used} bytes on medium but the budget is {budget} - discard the set or remove files from the record by hand")]
    CapacityExceeded { used: u64, budget: u64 },

    #[error("could not create archive directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: io::Error,
    },

    #[error("could not create parent directories for {}: {source}", .path.display())]
    Mkdir {
        path: PathBuf,
        source: io::Error,
    },

    /// A move failed; remaining moves were aborted and no links were made.
    #[error("could not move {} into the archive: {source}", .path.display())]
    Move {
        path: PathBuf,
        source: io::Error,
    },

    /// A link failed after every move succeeded; remaining links were
    /// aborted.
    #[error("moved all files but could not link {}: {source}", .path.display())]
    Link {
        path: PathBuf,
        source: io::Error,
    },
}

impl Categorized for CommitError {
    fn kind(&self) -> ErrorKind {
        match self {
            CommitError::Staging(e) => e.kind(),
            CommitError::Size(e) => e.kind(),
            CommitError::Archive(e) => e.kind(),
            CommitError::CapacityExceeded { .. } => ErrorKind::Capacity,
            CommitError::CreateDir { .. }
            | CommitError::Mkdir { .. }
            | CommitError::Move { .. }
            | CommitError::Link { .. } => ErrorKind::Filesystem,
        }
    }
}

impl<'a> CommitEngine<'a> {
    pub fn new(staging: &'a StagingList, root: &'a ArchiveRoot) -> Self {
        Self { staging, root }
    }

    /// Commit the staged set.
    ///
    /// On any failure the staging record is left in place, so the session
    /// stays open for a retry or a discard.
    pub fn commit(&self) -> Result<CommitReceipt, CommitError> {
        let staged = self.staging.entries()?;
        let used = media::staged_size(&staged.entries)?;
        if used > staged.budget {
            return Err(CommitError::CapacityExceeded {
                used,
                budget: staged.budget,
            });
        }

        let number = self.root.next_number()?;
        let directory = self.root.directory_for(number);
        fs::create_dir(&directory).map_err(|source| CommitError::CreateDir {
            path: directory.clone(),
            source,
        })?;
        tracing::info!(
            number,
            directory = %directory.display(),
            files = staged.entries.len(),
            bytes = used,
            "committing archive set"
        );

        for original in &staged.entries {
            let target = mirrored_target(&directory, original);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| CommitError::Mkdir {
                    path: target.clone(),
                    source,
                })?;
            }
            fs::rename(original, &target).map_err(|source| CommitError::Move {
                path: original.clone(),
                source,
            })?;
            tracing::debug!(from = %original.display(), to = %target.display(), "moved");
        }

        for original in &staged.entries {
            let target = mirrored_target(&directory, original);
            symlink(&target, original).map_err(|source| CommitError::Link {
                path: original.clone(),
                source,
            })?;
            tracing::debug!(link = %original.display(), to = %target.display(), "linked");
        }

        self.staging.retire_into(&directory)?;

        Ok(CommitReceipt {
            number,
            directory,
            files: staged.entries.len(),
            bytes_on_medium: used,
        })
    }
}

/// Where `original` lands inside the archive directory: its own absolute
/// path, minus the leading separator, mirrored under `directory`.
fn mirrored_target(directory: &Path, original: &Path) -> PathBuf {
    let relative = original.strip_prefix("/").unwrap_or(original);
    directory.join(relative)
}
