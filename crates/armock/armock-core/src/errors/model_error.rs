//! Model definition extraction errors.

use std::path::PathBuf;

use super::error_code::{self, ArmockErrorCode};
use super::ReadError;

/// Errors that can occur while loading a model definition.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("Syntax error in {path} at line {line}")]
    Syntax { path: PathBuf, line: u32 },

    #[error("Expected exactly one top-level class in {path}, found {found}")]
    ClassCount { path: PathBuf, found: usize },

    #[error("{class_name} does not inherit from a known base class (superclass: {})", superclass.as_deref().unwrap_or("none"))]
    Shape {
        class_name: String,
        superclass: Option<String>,
    },

    #[error("Ruby grammar could not be loaded: {message}")]
    Grammar { message: String },
}

impl ArmockErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read(e) => e.error_code(),
            Self::Shape { .. } => error_code::SHAPE_ERROR,
            _ => error_code::LOAD_ERROR,
        }
    }
}
