//! Builds a `MockClass` from extracted model metadata and the matched table.

use std::rc::Rc;

use armock_analysis::{ModelMetadata, Table};
use armock_core::constants::DEFAULT_MOCK_SUFFIX;

use crate::mock_class::{MockClass, MockClassParts};

/// Synthesize `<model_name>Mock`.
///
/// Attribute slots are exactly `table`'s fields; with no table the class has none.
pub fn synthesize(
    model_name: &str,
    metadata: &ModelMetadata,
    table: Option<&Table>,
    mass_assignment: bool,
) -> Rc<MockClass> {
    synthesize_with_suffix(model_name, metadata, table, mass_assignment, DEFAULT_MOCK_SUFFIX)
}

/// Like [`synthesize`], naming the class `<model_name><suffix>`.
pub fn synthesize_with_suffix(
    model_name: &str,
    metadata: &ModelMetadata,
    table: Option<&Table>,
    mass_assignment: bool,
    suffix: &str,
) -> Rc<MockClass> {
    let name = format!("{model_name}{suffix}");
    if table.is_none() {
        tracing::warn!(model = model_name, "no table matched, mock has no attribute slots");
    }

    let class = MockClass::from_parts(MockClassParts {
        name,
        mock_of: model_name.to_string(),
        table_name: table.map(|t| t.name().to_string()),
        fields: table.map(|t| t.fields().to_vec()).unwrap_or_default(),
        relationships: metadata.relationships.clone(),
        mass_assignment,
        instance_methods: metadata.instance_methods.clone(),
        class_methods: metadata.class_methods.clone(),
    });

    tracing::debug!(
        class = class.name(),
        columns = class.fields().len(),
        instance_methods = metadata.instance_methods.len(),
        class_methods = metadata.class_methods.len(),
        "synthesized mock class"
    );
    Rc::new(class)
}
