use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning one book file into a [`Book`](crate::reader::Book).
///
/// These are per-file failures: the run loop logs them and moves on to the
/// next file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read {} as its claimed format: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("unsupported book format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("no readable chapters in {}", path.display())]
    EmptyResult { path: PathBuf },
}

impl ParseError {
    pub(crate) fn format(path: &std::path::Path, reason: impl ToString) -> Self {
        ParseError::Format {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Run-level failures that abort the whole conversion.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no books were parsed successfully out of {attempted} file(s)")]
    NoBooks { attempted: usize },
}
