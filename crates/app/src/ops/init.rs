use std::env;
use std::path::PathBuf;

use clap::Args;

use common::error::{Categorized, ErrorKind};

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Directory that will hold the numbered archive directories
    #[arg(long)]
    pub archive_root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Categorized for InitError {
    fn kind(&self) -> ErrorKind {
        match self {
            InitError::StateFailed(e) => e.kind(),
            InitError::Io(_) => ErrorKind::Configuration,
        }
    }
}

impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let archive_root = if self.archive_root.is_absolute() {
            self.archive_root.clone()
        } else {
            env::current_dir()?.join(&self.archive_root)
        };

        let state = AppState::init(ctx.config_path.clone(), AppConfig { archive_root })?;

        let output = format!(
            "Initialized shelf directory at: {}\n\
             - Config: {}\n\
             - Archive root: {}",
            state.shelf_dir.display(),
            state.config_path.display(),
            state.config.archive_root.display()
        );

        Ok(output)
    }
}
