//! Error handling for armock.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod mock_error;
pub mod mocker_error;
pub mod model_error;
pub mod read_error;
pub mod schema_error;

pub use config_error::ConfigError;
pub use error_code::ArmockErrorCode;
pub use mock_error::MockError;
pub use mocker_error::MockerError;
pub use model_error::ModelError;
pub use read_error::ReadError;
pub use schema_error::SchemaError;
