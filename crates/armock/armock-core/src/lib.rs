//! armock-core: shared foundation for the armock mock synthesizer.
//!
//! - Errors: one `thiserror` enum per subsystem plus the `MockerError` aggregate
//! - Config: TOML-based, layered resolution (overrides > env > project > defaults)
//! - Tracing: `ARMOCK_LOG`-filtered subscriber setup
//! - Constants: the ActiveRecord and Object baseline member sets
//! - Traits: the `FileReader` source capability

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;

pub use config::MockerConfig;
pub use errors::{ArmockErrorCode, MockerError};
pub use traits::{FileReader, FsReader, MapReader, StringReader};
