//! Top-level armock configuration with layered resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ModelSourceConfig, SchemaSourceConfig};
use crate::constants::{DEFAULT_MASS_ASSIGNMENT, DEFAULT_MOCK_SUFFIX};
use crate::errors::ConfigError;

/// Project config file name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "armock.toml";

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `ConfigOverrides`)
/// 2. Environment variables (`ARMOCK_*`)
/// 3. Project config (`armock.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MockerConfig {
    pub schema: SchemaSourceConfig,
    pub model: ModelSourceConfig,
    /// Whether `new` accepts an attribute mapping. Default: true.
    pub mass_assignment: Option<bool>,
    /// Suffix of synthesized class names. Default: `Mock`.
    pub mock_suffix: Option<String>,
    /// Explicit model name → table name mappings for irregular names.
    #[serde(default)]
    pub tables: BTreeMap<String, String>,
}

/// Programmatic overrides with the highest priority.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub schema_path: Option<PathBuf>,
    pub model_path: Option<PathBuf>,
    pub mass_assignment: Option<bool>,
}

impl MockerConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        tracing::debug!(
            schema = %config.schema.schema_file().display(),
            model_root = %config.model.root().display(),
            mass_assignment = config.effective_mass_assignment(),
            "resolved armock config"
        );
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &MockerConfig) -> Result<(), ConfigError> {
        if let Some(ref suffix) = config.mock_suffix {
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::ValidationFailed {
                    field: "mock_suffix".to_string(),
                    message: "must be a non-empty identifier".to_string(),
                });
            }
        }
        if let Some(ref file) = config.schema.file {
            if file.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: "schema.file".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        for (model, table) in &config.tables {
            if table.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("tables.{model}"),
                    message: "table name must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns the effective mass-assignment policy, defaulting to true.
    pub fn effective_mass_assignment(&self) -> bool {
        self.mass_assignment.unwrap_or(DEFAULT_MASS_ASSIGNMENT)
    }

    /// Returns the effective mock class suffix, defaulting to `Mock`.
    pub fn effective_mock_suffix(&self) -> &str {
        self.mock_suffix.as_deref().unwrap_or(DEFAULT_MOCK_SUFFIX)
    }

    /// Explicit table name configured for `model_name`, if any.
    pub fn table_override(&self, model_name: &str) -> Option<&str> {
        self.tables.get(model_name).map(String::as_str)
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut MockerConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: MockerConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it has a value.
    fn merge(base: &mut MockerConfig, other: &MockerConfig) {
        if other.schema.path.is_some() {
            base.schema.path = other.schema.path.clone();
        }
        if other.schema.file.is_some() {
            base.schema.file = other.schema.file.clone();
        }
        if other.model.path.is_some() {
            base.model.path = other.model.path.clone();
        }
        if !other.model.base_classes.is_empty() {
            base.model.base_classes = other.model.base_classes.clone();
        }
        if other.mass_assignment.is_some() {
            base.mass_assignment = other.mass_assignment;
        }
        if other.mock_suffix.is_some() {
            base.mock_suffix = other.mock_suffix.clone();
        }
        for (model, table) in &other.tables {
            base.tables.insert(model.clone(), table.clone());
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `ARMOCK_SCHEMA_PATH`, `ARMOCK_MODEL_PATH`, `ARMOCK_MASS_ASSIGNMENT`.
    fn apply_env_overrides(config: &mut MockerConfig) {
        if let Ok(val) = std::env::var("ARMOCK_SCHEMA_PATH") {
            config.schema.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("ARMOCK_SCHEMA_FILE") {
            config.schema.file = Some(val);
        }
        if let Ok(val) = std::env::var("ARMOCK_MODEL_PATH") {
            config.model.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("ARMOCK_MASS_ASSIGNMENT") {
            if let Ok(v) = val.parse::<bool>() {
                config.mass_assignment = Some(v);
            }
        }
        if let Ok(val) = std::env::var("ARMOCK_MOCK_SUFFIX") {
            config.mock_suffix = Some(val);
        }
    }

    fn apply_overrides(config: &mut MockerConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.schema_path {
            config.schema.path = Some(v.clone());
        }
        if let Some(ref v) = overrides.model_path {
            config.model.path = Some(v.clone());
        }
        if let Some(v) = overrides.mass_assignment {
            config.mass_assignment = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
