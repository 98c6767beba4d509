use clap::Args;

use common::commit::CommitEngine;
use common::error::{Categorized, ErrorKind};

/// Commit the staged set: move every file into a new numbered archive
/// directory and leave a symlink at every original path.
#[derive(Args, Debug, Clone)]
pub struct Create {}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),
    #[error(transparent)]
    Commit(#[from] common::commit::CommitError),
}

impl Categorized for CreateError {
    fn kind(&self) -> ErrorKind {
        match self {
            CreateError::State(e) => e.kind(),
            CreateError::Commit(e) => e.kind(),
        }
    }
}

impl crate::op::Op for Create {
    type Error = CreateError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let staging = state.staging();
        let root = state.archive_root();

        let receipt = CommitEngine::new(&staging, &root).commit()?;

        Ok(format!(
            "created archive {} at {}\n\
             - {} file(s), {} bytes on medium\n\
             - original paths now link into the archive",
            receipt.number,
            receipt.directory.display(),
            receipt.files,
            receipt.bytes_on_medium
        ))
    }
}
