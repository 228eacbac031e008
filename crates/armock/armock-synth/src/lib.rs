//! armock-synth: synthesizes inert stand-ins for ActiveRecord-style models.
//!
//! - Dispatch: call arguments, Ruby-style arity enforcement, stub/override tables
//! - MockClass / MockInstance: attribute slots, relationship slots, fixed API
//! - Synthesizer: `ModelMetadata` + `Table` → `MockClass`
//! - Registry: the `Mocker` facade memoizing one class per model name

pub mod dispatch;
pub mod instance;
pub mod mock_class;
pub mod registry;
pub mod synthesizer;

pub use dispatch::{CallArgs, ClassOverride, InstanceOverride};
pub use instance::MockInstance;
pub use mock_class::{Attributes, MockClass};
pub use registry::{Mocker, MockerBuilder};
pub use synthesizer::{synthesize, synthesize_with_suffix};

pub use serde_json::{json, Value};
