use std::path::PathBuf;

use clap::Args;
use walkdir::WalkDir;

use common::error::{Categorized, ErrorKind};
use common::media;

#[derive(Args, Debug, Clone)]
pub struct Adddir {
    /// Directories whose files are staged recursively
    #[arg(required = true)]
    pub directories: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum AdddirError {
    #[error(transparent)]
    State(#[from] crate::state::StateError),
    #[error(transparent)]
    Staging(#[from] common::staging::StagingError),
    #[error(transparent)]
    Size(#[from] common::media::SizeError),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("could not walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Categorized for AdddirError {
    fn kind(&self) -> ErrorKind {
        match self {
            AdddirError::State(e) => e.kind(),
            AdddirError::Staging(e) => e.kind(),
            AdddirError::Size(e) => e.kind(),
            AdddirError::NotADirectory(_) => ErrorKind::Validation,
            AdddirError::Walk(_) => ErrorKind::Filesystem,
        }
    }
}

impl crate::op::Op for Adddir {
    type Error = AdddirError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = ctx.state()?;
        let staging = state.staging();

        // Fail before walking anything if no session is open.
        if !staging.exists() {
            return Err(common::staging::StagingError::NoActiveSession.into());
        }

        for directory in &self.directories {
            if !directory.is_dir() {
                return Err(AdddirError::NotADirectory(directory.clone()));
            }
        }

        // Depth-unbounded walk; only regular files are staged, the directory
        // structure itself is recreated at commit time.
        let mut files = Vec::new();
        for directory in &self.directories {
            for entry in WalkDir::new(directory) {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        }

        let outcome = staging.append(&files)?;

        let staged = staging.entries()?;
        let used = media::staged_size(&staged.entries)?;

        let mut output = format!(
            "added {} file(s) from {} director{}",
            outcome.appended,
            self.directories.len(),
            if self.directories.len() == 1 { "y" } else { "ies" }
        );
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
