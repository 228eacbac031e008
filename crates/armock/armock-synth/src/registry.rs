//! The `Mocker` facade: one memoized mock class per model name.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use armock_analysis::naming::table_name_for;
use armock_analysis::{ModelReader, SchemaReader};
use armock_core::config::MockerConfig;
use armock_core::traits::{FileReader, FsReader};
use armock_core::MockerError;
use rustc_hash::FxHashMap;

use crate::mock_class::MockClass;
use crate::synthesizer::synthesize_with_suffix;

/// Produces mock classes from the configured schema and model sources.
///
/// Owned by a single test thread. Calling `mock` twice for one name returns
/// the same class until `reset`.
pub struct Mocker {
    config: MockerConfig,
    schema_reader: SchemaReader,
    model_reader: ModelReader,
    classes: RefCell<FxHashMap<String, Rc<MockClass>>>,
}

impl Mocker {
    pub fn builder() -> MockerBuilder {
        MockerBuilder::default()
    }

    /// Mocker over the filesystem, configured from `root` (`armock.toml`, `ARMOCK_*`).
    pub fn load(root: &Path) -> Result<Self, MockerError> {
        let config = MockerConfig::load(root, None)?;
        Ok(Self::builder().config(config).build())
    }

    pub fn config(&self) -> &MockerConfig {
        &self.config
    }

    /// Table whose columns become the attribute slots of `model_name`'s mock:
    /// a configured mapping, then the model's own `self.table_name`, then the
    /// pluralized convention.
    fn table_name(&self, model_name: &str, declared: Option<&str>) -> String {
        self.config
            .table_override(model_name)
            .or(declared)
            .map(str::to_string)
            .unwrap_or_else(|| table_name_for(model_name))
    }

    /// Mock class for `model_name`, synthesizing it on first request.
    pub fn mock(&self, model_name: &str) -> Result<Rc<MockClass>, MockerError> {
        if let Some(class) = self.classes.borrow().get(model_name) {
            return Ok(Rc::clone(class));
        }

        let metadata = self.model_reader.parse(model_name)?;
        let table_name = self.table_name(model_name, metadata.table_name.as_deref());
        let table = self.schema_reader.table(&table_name)?;
        if table.is_none() {
            tracing::warn!(model = model_name, table = %table_name, "table not found in schema");
        }

        let class = synthesize_with_suffix(
            model_name,
            &metadata,
            table.as_ref(),
            self.config.effective_mass_assignment(),
            self.config.effective_mock_suffix(),
        );
        tracing::info!(
            model = model_name,
            class = class.name(),
            table = %table_name,
            "mock class ready"
        );

        self.classes
            .borrow_mut()
            .insert(model_name.to_string(), Rc::clone(&class));
        Ok(class)
    }

    /// Names of the models mocked so far.
    pub fn mocked(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Forget every memoized class and cached source.
    pub fn reset(&self) {
        self.classes.borrow_mut().clear();
        self.model_reader.invalidate();
        self.schema_reader.invalidate();
        tracing::debug!("mocker reset");
    }

    /// Remove the overrides on every memoized class.
    pub fn clear_overrides(&self) {
        for class in self.classes.borrow().values() {
            class.clear_overrides();
        }
    }
}

/// Builder for [`Mocker`].
///
/// Readers not supplied are created from the config, reading through the
/// given sources or the filesystem.
#[derive(Default)]
pub struct MockerBuilder {
    config: Option<MockerConfig>,
    schema_reader: Option<SchemaReader>,
    model_reader: Option<ModelReader>,
    schema_source: Option<Arc<dyn FileReader>>,
    model_source: Option<Arc<dyn FileReader>>,
}

impl MockerBuilder {
    pub fn config(mut self, config: MockerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn schema_reader(mut self, reader: SchemaReader) -> Self {
        self.schema_reader = Some(reader);
        self
    }

    pub fn model_reader(mut self, reader: ModelReader) -> Self {
        self.model_reader = Some(reader);
        self
    }

    /// Where the schema text comes from when no `SchemaReader` is given.
    pub fn schema_source(mut self, source: Arc<dyn FileReader>) -> Self {
        self.schema_source = Some(source);
        self
    }

    /// Where model sources come from when no `ModelReader` is given.
    pub fn model_source(mut self, source: Arc<dyn FileReader>) -> Self {
        self.model_source = Some(source);
        self
    }

    pub fn build(self) -> Mocker {
        let config = self.config.unwrap_or_default();
        let schema_reader = self.schema_reader.unwrap_or_else(|| {
            let source = self.schema_source.unwrap_or_else(|| Arc::new(FsReader));
            SchemaReader::new(source, config.schema.clone())
        });
        let model_reader = self.model_reader.unwrap_or_else(|| {
            let source = self.model_source.unwrap_or_else(|| Arc::new(FsReader));
            ModelReader::new(source, config.model.clone())
        });
        Mocker {
            config,
            schema_reader,
            model_reader,
            classes: RefCell::new(FxHashMap::default()),
        }
    }
}
