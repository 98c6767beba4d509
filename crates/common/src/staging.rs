//! The persisted staging record.
//!
//! An archive set in progress is a plain text file: the first line is the
//! capacity budget as a decimal integer, every following line one absolute
//! file path, newline-terminated. The record's existence *is* the lifecycle
//! state: a user is either staging (record present) or idle (record absent).
//!
//! Paths containing embedded newlines are unsupported and corrupt the record.
//!
//! Every read goes back to the file; there is no in-memory total that could
//! drift from the record if it is edited out-of-band.

use std::collections::HashSet;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Categorized, ErrorKind};

/// File name the record is retired under inside a committed archive
/// directory.
pub const MANIFEST_FILE_NAME: &str = "manifest";

/// Handle to the staging record at a fixed location.
///
/// The handle itself holds no staged state; each operation reads or writes
/// the persisted record.
#[derive(Debug, Clone)]
pub struct StagingList {
    path: PathBuf,
}

/// The staged archive set as read from the record: the budget fixed at
/// `prepare` time and the deduplicated entries in first-appended order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSet {
    pub budget: u64,
    pub entries: Vec<PathBuf>,
}

/// What an append actually did: how many entries were new and how many were
/// discarded as duplicates of already-staged paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendOutcome {
    pub appended: usize,
    pub duplicates: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("a staging session is already open - add to it, create it, or discard it first")]
    AlreadyStaging,

    #[error("no staging session is open - run prepare first")]
    NoActiveSession,

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("staging record is corrupt: {0}")]
    CorruptRecord(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Categorized for StagingError {
    fn kind(&self) -> ErrorKind {
        match self {
            StagingError::AlreadyStaging | StagingError::NoActiveSession => ErrorKind::State,
            StagingError::NotAFile(_) => ErrorKind::Validation,
            StagingError::CorruptRecord(_) | StagingError::Io(_) => ErrorKind::Filesystem,
        }
    }
}

impl StagingList {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a staging session is open.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Open a new staging session with the given capacity budget.
    pub fn initialize(&self, budget: u64) -> Result<(), StagingError> {
        if self.exists() {
            return Err(StagingError::AlreadyStaging);
        }
        fs::write(&self.path, format!("{}\n", budget))?;
        tracing::debug!(record = %self.path.display(), budget, "opened staging session");
        Ok(())
    }

    /// Stage the given paths, normalized to absolute form.
    ///
    /// Every path must resolve to a regular file at append time. Paths
    /// already staged (or repeated within `paths`) are discarded and counted
    /// in the returned outcome.
    pub fn append(&self, paths: &[PathBuf]) -> Result<AppendOutcome, StagingError> {
        if !self.exists() {
            return Err(StagingError::NoActiveSession);
        }

        let mut normalized = Vec::with_capacity(paths.len());
        for path in paths {
            let absolute = absolutize(path)?;
            if !absolute.is_file() {
                return Err(StagingError::NotAFile(absolute));
            }
            normalized.push(absolute);
        }

        let staged = self.entries()?;
        let mut seen: HashSet<PathBuf> = staged.entries.into_iter().collect();

        let mut fresh = Vec::new();
        let mut duplicates = 0;
        for path in normalized {
            if seen.contains(&path) {
                duplicates += 1;
            } else {
                seen.insert(path.clone());
                fresh.push(path);
            }
        }

        let mut record = OpenOptions::new().append(true).open(&self.path)?;
        for path in &fresh {
            writeln!(record, "{}", path.display())?;
        }
        tracing::debug!(
            record = %self.path.display(),
            appended = fresh.len(),
            duplicates,
            "staged entries"
        );

        Ok(AppendOutcome {
            appended: fresh.len(),
            duplicates,
        })
    }

    /// Read the staged set back from the record.
    ///
    /// Entries are deduplicated in first-appended order, so a record touched
    /// out-of-band still yields a well-formed set.
    pub fn entries(&self) -> Result<StagedSet, StagingError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StagingError::NoActiveSession)
            }
            Err(e) => return Err(StagingError::Io(e)),
        };

        let mut lines = contents.lines();
        let budget_line = lines
            .next()
            .ok_or_else(|| StagingError::CorruptRecord("missing budget line".to_string()))?;
        let budget = budget_line.parse::<u64>().map_err(|_| {
            StagingError::CorruptRecord(format!("budget line is not an integer: {:?}", budget_line))
        })?;

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let path = PathBuf::from(line);
            if seen.insert(path.clone()) {
                entries.push(path);
            }
        }

        Ok(StagedSet { budget, entries })
    }

    /// Close the session without touching any staged file.
    pub fn discard(&self) -> Result<(), StagingError> {
        if !self.exists() {
            return Err(StagingError::NoActiveSession);
        }
        fs::remove_file(&self.path)?;
        tracing::debug!(record = %self.path.display(), "discarded staging session");
        Ok(())
    }

    /// Retire the record into a committed archive directory as its manifest.
    ///
    /// Called by the commit engine once every staged file has been moved and
    /// linked; this is what transitions the lifecycle back to idle.
    pub fn retire_into(&self, archive_dir: &Path) -> Result<(), StagingError> {
        let manifest = archive_dir.join(MANIFEST_FILE_NAME);
        fs::rename(&self.path, &manifest)?;
        tracing::debug!(manifest = %manifest.display(), "retired staging record");
        Ok(())
    }
}

/// Normalize a path to absolute form against the current working directory.
fn absolutize(path: &Path) -> Result<PathBuf, StagingError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
