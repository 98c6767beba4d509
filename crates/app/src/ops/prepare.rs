use clap::Args;

use common::error::{Categorized, ErrorKind};
use common::media::MediaTier;

#[derive(Args, Debug, Clone)]
pub struct Prepare {
    /// Capacity tier of the target medium: small (CD), medium (DVD), or
    /// large (Blu-ray). The aliases cd, dvd, and bd also work.
    pub tier: MediaTier,
}

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),
    #[error(transparent)]
    Staging(#[from] common::staging::StagingError),
}

impl Categorized for PrepareError {
    fn kind(&self) -> ErrorKind {
        match self {
            PrepareError::State(e) => e.kind(),
            PrepareError::Staging(e) => e.kind(),
        }
    }
}

impl crate::op::Op for Prepare {
    type Error = PrepareError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let budget = self.tier.capacity_bytes();
        state.staging().initialize(budget)?;

        Ok(format!(
            "prepared a new archive set for a {} medium ({} byte budget)",
            self.tier, budget
        ))
    }
}
