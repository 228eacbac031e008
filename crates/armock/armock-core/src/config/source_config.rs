//! Where schema and model sources live.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_CLASSES, DEFAULT_SCHEMA_FILE};

/// Location of the schema definition.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SchemaSourceConfig {
    /// Directory holding the schema file. Default: current directory.
    pub path: Option<PathBuf>,
    /// Schema file name. Default: `schema.rb`.
    pub file: Option<String>,
}

impl SchemaSourceConfig {
    /// Full path of the schema file.
    pub fn schema_file(&self) -> PathBuf {
        let dir = self.path.clone().unwrap_or_default();
        dir.join(self.file.as_deref().unwrap_or(DEFAULT_SCHEMA_FILE))
    }
}

/// Location and shape rules for model definitions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ModelSourceConfig {
    /// Directory holding `<model>.rb` files. Default: current directory.
    pub path: Option<PathBuf>,
    /// Accepted superclasses. Default: `ActiveRecord::Base`, `ApplicationRecord`.
    #[serde(default)]
    pub base_classes: Vec<String>,
}

impl ModelSourceConfig {
    /// Returns the model root directory, defaulting to the current directory.
    pub fn root(&self) -> PathBuf {
        self.path.clone().unwrap_or_default()
    }

    /// Returns the effective base classes.
    pub fn effective_base_classes(&self) -> Vec<String> {
        if self.base_classes.is_empty() {
            DEFAULT_BASE_CLASSES.iter().map(|s| s.to_string()).collect()
        } else {
            self.base_classes.clone()
        }
    }
}
