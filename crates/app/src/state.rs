use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::archive::ArchiveRoot;
use common::error::{Categorized, ErrorKind};
use common::staging::StagingList;

pub const APP_NAME: &str = "shelf";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STAGING_FILE_NAME: &str = "staging";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Absolute path of the directory that receives committed archives
    pub archive_root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the shelf directory (~/.shelf)
    pub shelf_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the staging record
    pub staging_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the shelf directory path (custom or default ~/.shelf)
    pub fn shelf_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Check if the shelf directory exists
    pub fn exists(custom_path: Option<PathBuf>) -> Result<bool, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;
        Ok(shelf_dir.exists())
    }

    /// Initialize a new shelf state directory
    ///
    /// Creates the archive root as well if it does not exist yet.
    pub fn init(custom_path: Option<PathBuf>, config: AppConfig) -> Result<Self, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;

        if shelf_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }
        if !config.archive_root.is_absolute() {
            return Err(StateError::ArchiveRootNotAbsolute(config.archive_root));
        }

        fs::create_dir_all(&shelf_dir)?;
        fs::create_dir_all(&config.archive_root)?;

        let config_path = shelf_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            staging_path: shelf_dir.join(STAGING_FILE_NAME),
            shelf_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the shelf directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;

        if !shelf_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = shelf_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        if !config.archive_root.is_dir() {
            return Err(StateError::ArchiveRootMissing(config.archive_root));
        }

        Ok(Self {
            staging_path: shelf_dir.join(STAGING_FILE_NAME),
            shelf_dir,
            config_path,
            config,
        })
    }

    /// Handle to the staging record inside the shelf directory
    pub fn staging(&self) -> StagingList {
        StagingList::new(self.staging_path.clone())
    }

    /// Handle to the configured archive root
    pub fn archive_root(&self) -> ArchiveRoot {
        ArchiveRoot::new(self.config.archive_root.clone())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("shelf directory not initialized. Run 'shelf init' first")]
    NotInitialized,

    #[error("shelf directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("archive root must be an absolute path: {}", .0.display())]
    ArchiveRootNotAbsolute(PathBuf),

    #[error("configured archive root is not a directory: {}", .0.display())]
    ArchiveRootMissing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl Categorized for StateError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Configuration
    }
}
