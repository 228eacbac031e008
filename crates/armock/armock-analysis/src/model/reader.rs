//! ModelReader: locates `<model>.rb`, extracts its metadata and memoizes it per name.

use std::path::PathBuf;
use std::sync::Arc;

use armock_core::config::ModelSourceConfig;
use armock_core::errors::ModelError;
use armock_core::traits::FileReader;
use moka::sync::Cache;

use super::extractor::extract_model;
use super::types::ModelMetadata;
use crate::naming::model_file_path;

pub struct ModelReader {
    reader: Arc<dyn FileReader>,
    config: ModelSourceConfig,
    base_classes: Vec<String>,
    cache: Cache<String, Arc<ModelMetadata>>,
}

impl ModelReader {
    pub fn new(reader: Arc<dyn FileReader>, config: ModelSourceConfig) -> Self {
        let base_classes = config.effective_base_classes();
        Self {
            reader,
            config,
            base_classes,
            cache: Cache::new(256),
        }
    }

    /// `<model.path>/<underscored name>.rb`
    pub fn path_for(&self, model_name: &str) -> PathBuf {
        model_file_path(&self.config.root(), model_name)
    }

    /// Metadata for `model_name`. Reads and parses the source at most once per name.
    pub fn parse(&self, model_name: &str) -> Result<Arc<ModelMetadata>, ModelError> {
        if let Some(metadata) = self.cache.get(model_name) {
            return Ok(metadata);
        }

        let path = self.path_for(model_name);
        let source = self.reader.read(&path)?;
        let metadata = extract_model(&source, &path, &self.base_classes)?;
        if metadata.class_name != model_name {
            tracing::warn!(
                model = model_name,
                declared = %metadata.class_name,
                path = %path.display(),
                "model file declares a differently named class"
            );
        }
        tracing::info!(
            model = model_name,
            path = %path.display(),
            methods = metadata.class_methods.len() + metadata.instance_methods.len(),
            "loaded model definition"
        );

        let metadata = Arc::new(metadata);
        self.cache.insert(model_name.to_string(), Arc::clone(&metadata));
        Ok(metadata)
    }

    /// Forget every memoized model.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}
