//! SchemaReader: fetches the schema through a `FileReader` and memoizes the parse.

use std::path::PathBuf;
use std::sync::Arc;

use armock_core::config::SchemaSourceConfig;
use armock_core::errors::SchemaError;
use armock_core::traits::FileReader;
use moka::sync::Cache;

use super::parser::parse_schema;
use super::types::{Schema, Table};

/// Reads `<schema.path>/<schema.file>` once per session.
pub struct SchemaReader {
    reader: Arc<dyn FileReader>,
    config: SchemaSourceConfig,
    cache: Cache<PathBuf, Arc<Schema>>,
}

impl SchemaReader {
    pub fn new(reader: Arc<dyn FileReader>, config: SchemaSourceConfig) -> Self {
        Self {
            reader,
            config,
            cache: Cache::new(4),
        }
    }

    /// Path handed to the reader.
    pub fn path(&self) -> PathBuf {
        self.config.schema_file()
    }

    /// Parsed schema. A missing schema file is an empty schema, not an error.
    pub fn schema(&self) -> Result<Arc<Schema>, SchemaError> {
        let path = self.path();
        if let Some(schema) = self.cache.get(&path) {
            return Ok(schema);
        }

        let schema = match self.reader.read(&path) {
            Ok(text) => parse_schema(&text)?,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path.display(), "no schema source, using empty schema");
                Schema::default()
            }
            Err(e) => return Err(e.into()),
        };

        let schema = Arc::new(schema);
        self.cache.insert(path, Arc::clone(&schema));
        Ok(schema)
    }

    /// Table named `name`, if the schema declares it.
    pub fn table(&self, name: &str) -> Result<Option<Table>, SchemaError> {
        Ok(self.schema()?.table(name).cloned())
    }

    /// Drop the memoized parse so the next call re-reads the source.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
