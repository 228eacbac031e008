//! Schema definitions: `create_table` blocks → `Table`s of `Field`s.

pub mod parser;
pub mod reader;
pub mod types;

pub use parser::parse_schema;
pub use reader::SchemaReader;
pub use types::{ColumnType, Field, Schema, Table};
