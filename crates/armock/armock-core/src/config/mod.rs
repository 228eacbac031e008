//! Configuration system for armock.
//! TOML-based, layered resolution: explicit overrides > env > project > defaults.

pub mod mocker_config;
pub mod source_config;

pub use mocker_config::{ConfigOverrides, MockerConfig};
pub use source_config::{ModelSourceConfig, SchemaSourceConfig};
