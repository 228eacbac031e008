//! ArmockErrorCode trait for structured error reporting.

/// Every error enum implements this to provide a stable error code string
/// that test runners can match on without parsing messages.
pub trait ArmockErrorCode {
    /// Returns the error code string (e.g., "NOT_FOUND").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const NOT_FOUND: &str = "NOT_FOUND";
pub const IO_ERROR: &str = "IO_ERROR";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const SHAPE_ERROR: &str = "SHAPE_ERROR";
pub const ARGUMENT_ERROR: &str = "ARGUMENT_ERROR";
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
pub const NO_METHOD: &str = "NO_METHOD";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
