//! Media tiers and sector-rounded size accounting.
//!
//! Optical media allocate in fixed-size sectors, so the space a file occupies
//! on the medium is its byte size rounded up to the next sector boundary.
//! The capacity check before a commit sums these rounded sizes, never the raw
//! byte sizes.

use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Categorized, ErrorKind};

/// Sector size of the CD/DVD/Blu-ray media class, in bytes.
pub const SECTOR_SIZE: u64 = 2048;

/// Usable capacity of a CD, in bytes.
pub const CD_CAPACITY: u64 = 700_000_000;
/// Usable capacity of a single-layer DVD, in bytes.
pub const DVD_CAPACITY: u64 = 4_700_000_000;
/// Usable capacity of a single-layer Blu-ray disc, in bytes.
pub const BLU_RAY_CAPACITY: u64 = 25_000_000_000;

/// Capacity tier of the target medium, fixed when an archive set is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTier {
    /// CD class.
    Small,
    /// DVD class.
    Medium,
    /// Blu-ray class.
    Large,
}

impl MediaTier {
    /// The capacity budget this tier grants an archive set.
    pub fn capacity_bytes(self) -> u64 {
        match self {
            MediaTier::Small => CD_CAPACITY,
            MediaTier::Medium => DVD_CAPACITY,
            MediaTier::Large => BLU_RAY_CAPACITY,
        }
    }
}

impl fmt::Display for MediaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaTier::Small => write!(f, "small"),
            MediaTier::Medium => write!(f, "medium"),
            MediaTier::Large => write!(f, "large"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown media tier {0:?} (expected small, medium, or large)")]
pub struct ParseTierError(String);

impl Categorized for ParseTierError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl FromStr for MediaTier {
    type Err = ParseTierError;

    /// Accepts the tier names plus the media-class aliases `cd`, `dvd`, `bd`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" | "cd" => Ok(MediaTier::Small),
            "medium" | "dvd" => Ok(MediaTier::Medium),
            "large" | "bd" => Ok(MediaTier::Large),
            other => Err(ParseTierError(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SizeError {
    /// A staged path no longer resolves to anything. This aborts whatever
    /// needed the total, since a missing entry makes the capacity figure
    /// meaningless.
    #[error("staged file no longer exists: {}", .path.display())]
    Vanished {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        source: io::Error,
    },
}

impl Categorized for SizeError {
    fn kind(&self) -> ErrorKind {
        match self {
            SizeError::Vanished { .. } => ErrorKind::Capacity,
            SizeError::Stat { .. } => ErrorKind::Filesystem,
        }
    }
}

/// Size a file of `len` bytes occupies on the medium, rounded up to a whole
/// number of sectors. Zero stays zero.
pub fn size_on_medium(len: u64) -> u64 {
    len.div_ceil(SECTOR_SIZE) * SECTOR_SIZE
}

/// Total on-medium size of the given files.
///
/// Every path is stat'ed fresh; a path that vanished since it was staged is
/// an error, never silently skipped.
pub fn staged_size(paths: &[PathBuf]) -> Result<u64, SizeError> {
    let mut total = 0u64;
    for path in paths {
        let metadata = fs::metadata(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SizeError::Vanished {
                    path: path.clone(),
                    source,
                }
            } else {
                SizeError::Stat {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        total += size_on_medium(metadata.len());
    }
    Ok(total)
}
