//! Aggregate error returned by the `Mocker` facade.

use super::error_code::ArmockErrorCode;
use super::{ConfigError, MockError, ModelError, ReadError, SchemaError};

/// Errors that can occur while producing a mock class.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum MockerError {
    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mock error: {0}")]
    Mock(#[from] MockError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ArmockErrorCode for MockerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Read(e) => e.error_code(),
            Self::Schema(e) => e.error_code(),
            Self::Model(e) => e.error_code(),
            Self::Mock(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
