use clap::Args;

use common::error::{Categorized, ErrorKind};

/// Drop the staged archive set without touching any staged file.
#[derive(Args, Debug, Clone)]
pub struct Discard {}

#[derive(Debug, thiserror::Error)]
pub enum DiscardError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),
    #[error(transparent)]
    Staging(#[from] common::staging::StagingError),
}

impl Categorized for DiscardError {
    fn kind(&self) -> ErrorKind {
        match self {
            DiscardError::State(e) => e.kind(),
            DiscardError::Staging(e) => e.kind(),
        }
    }
}

impl crate::op::Op for Discard {
    type Error = DiscardError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        state.staging().discard()?;

        Ok("discarded the staged archive set - no files were changed".to_string())
    }
}
