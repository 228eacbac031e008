//! Source reading errors.

use std::path::PathBuf;

use super::error_code::{self, ArmockErrorCode};

/// Errors raised by a `FileReader`.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Source not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl ReadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl ArmockErrorCode for ReadError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}
