//! Schema parsing errors.

use super::error_code::{self, ArmockErrorCode};
use super::ReadError;

/// Errors that can occur while reading or parsing a schema definition.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Malformed schema at line {line}{}", table.as_ref().map(|t| format!(" in table \"{t}\"")).unwrap_or_default())]
    Malformed { line: u32, table: Option<String> },

    #[error("create_table at line {line} has no literal table name")]
    InvalidTable { line: u32 },

    #[error("Ruby grammar could not be loaded: {message}")]
    Grammar { message: String },
}

impl ArmockErrorCode for SchemaError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read(e) => e.error_code(),
            _ => error_code::PARSE_ERROR,
        }
    }
}
