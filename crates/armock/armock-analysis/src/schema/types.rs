//! Field, Table and Schema value objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parsers::types::{OptionMap, OptionValue};

/// Declared storage type of a column. Unknown tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    Text,
    Integer,
    BigInteger,
    Float,
    Decimal,
    Boolean,
    Date,
    Datetime,
    Time,
    Timestamp,
    Binary,
    Json,
    Jsonb,
    Uuid,
    Other(String),
}

impl ColumnType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "text" => Self::Text,
            "integer" => Self::Integer,
            "bigint" | "big_integer" => Self::BigInteger,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "binary" => Self::Binary,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "uuid" => Self::Uuid,
            other => Self::Other(other.to_string()),
        }
    }

    /// The schema DSL tag (`t.<tag>`).
    pub fn tag(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::BigInteger => "bigint",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Binary => "binary",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Uuid => "uuid",
            Self::Other(tag) => tag,
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One column declaration. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    column_type: ColumnType,
    options: OptionMap,
}

impl Field {
    pub fn new(name: impl Into<String>, column_type: ColumnType, options: OptionMap) -> Self {
        Self {
            name: name.into(),
            column_type,
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// `null: false` makes a column non-nullable; everything else is nullable.
    pub fn is_nullable(&self) -> bool {
        self.option("null").and_then(OptionValue::as_bool) != Some(false)
    }

    pub fn default_value(&self) -> Option<&OptionValue> {
        self.option("default")
    }
}

/// A named, ordered collection of fields from one `create_table` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    name: String,
    fields: Vec<Field>,
    options: OptionMap,
}

impl Table {
    pub fn new(name: impl Into<String>, options: OptionMap) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            options,
        }
    }

    /// Append a column. A repeated column name replaces the earlier one in place.
    pub(crate) fn push(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Final state of every table declared in one schema source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub version: Option<OptionValue>,
    pub tables: BTreeMap<String, Table>,
    pub content_hash: u64,
}

impl Schema {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
