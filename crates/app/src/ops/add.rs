use std::path::PathBuf;

use clap::Args;

use common::error::{Categorized, ErrorKind};
use common::media;

#[derive(Args, Debug, Clone)]
pub struct Add {
    /// Files to stage for archiving
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum AddError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),
    #[error(transparent)]
    Staging(#[from] common::staging::StagingError),
    #[error(transparent)]
    Size(#[from] common::media::SizeError),
}

impl Categorized for AddError {
    fn kind(&self) -> ErrorKind {
        match self {
            AddError::State(e) => e.kind(),
            AddError::Staging(e) => e.kind(),
            AddError::Size(e) => e.kind(),
        }
    }
}

impl crate::op::Op for Add {
    type Error = AddError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let staging = state.staging();

        let outcome = staging.append(&self.files)?;

        // Usage is recomputed from the persisted record, not tracked
        // incrementally.
        let staged = staging.entries()?;
        let used = media::staged_size(&staged.entries)?;

        let mut output = format!("added {} file(s)", outcome.appended);
        if outcome.duplicates > 0 {
            output.push_str(&format!(
                ", discarded {} duplicate entr{}",
                outcome.duplicates,
                if outcome.duplicates == 1 { "y" } else { "ies" }
            ));
        }
        output.push_str(&format!(
            "\narchive set uses {} of {} bytes",
            used, staged.budget
        ));

        Ok(output)
    }
}
