//! Method dispatch for mocks: argument bundles, arity checks and stub/override tables.

pub mod args;
pub mod arity;
pub mod table;

use serde_json::Value;

pub use args::CallArgs;
pub use arity::{check_arity, expected_arity};
pub use table::{DispatchTable, Resolved, Slot};

use crate::instance::MockInstance;
use crate::mock_class::MockClass;

/// Replacement body for an instance method.
pub type InstanceOverride = dyn Fn(&MockInstance, &CallArgs) -> Value;

/// Replacement body for a class method.
pub type ClassOverride = dyn Fn(&MockClass, &CallArgs) -> Value;
