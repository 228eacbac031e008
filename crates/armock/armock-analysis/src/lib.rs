//! armock-analysis: turns Ruby schema and model sources into structured metadata.
//!
//! - Parsers: tree-sitter Ruby front-end, literal decoding, error-node detection
//! - Schema: `Field`, `Table`, `Schema`, the `create_table` walker and `SchemaReader`
//! - Model: `MethodSignature`, `RelationshipDescriptor`, `ModelMetadata` and `ModelReader`
//! - Naming: model name → file path and table name derivation

pub mod model;
pub mod naming;
pub mod parsers;
pub mod schema;

pub use model::{
    MethodScope, MethodSignature, ModelMetadata, ModelReader, Parameter, ParameterKind,
    RelationshipDescriptor, RelationshipKind,
};
pub use parsers::types::OptionValue;
pub use schema::{parse_schema, ColumnType, Field, Schema, SchemaReader, Table};
