//! Failure categories and their exit-code mapping.
//!
//! Every error enum in the workspace implements [`Categorized`] so the binary
//! can translate any failure into a stable process exit code at a single
//! point, instead of scattering exit calls through the operations.

/// Category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The state directory or its configuration is missing or unusable.
    Configuration,
    /// The requested operation is not valid in the current lifecycle state.
    State,
    /// An argument did not validate (not a file, not a directory, bad tier).
    Validation,
    /// The staged set does not fit the budget, or a staged file vanished.
    Capacity,
    /// A move, link, mkdir, or record read/write failed.
    Filesystem,
}

impl ErrorKind {
    /// Stable exit code for this category.
    ///
    /// 0 is success and 2 is reserved for command-line usage errors.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Configuration => 3,
            ErrorKind::State => 4,
            ErrorKind::Validation => 5,
            ErrorKind::Capacity => 6,
            ErrorKind::Filesystem => 7,
        }
    }
}

/// Implemented by every error enum so callers can ask which category a
/// failure belongs to without matching on concrete variants.
pub trait Categorized {
    fn kind(&self) -> ErrorKind;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let kinds = [
            ErrorKind::Configuration,
            ErrorKind::State,
            ErrorKind::Validation,
            ErrorKind::Capacity,
            ErrorKind::Filesystem,
        ];
        let codes: Vec<i32> = kinds.iter().map(|k| k.exit_code()).collect();
        for (i, code) in codes.iter().enumerate() {
            assert_ne!(*code, 0);
            assert_ne!(*code, 2, "2 is reserved for usage errors");
            assert!(!codes[..i].contains(code));
        }
    }
}
