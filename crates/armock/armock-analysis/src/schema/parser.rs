//! Schema parser: walks `create_table` blocks of an `ActiveRecord::Schema.define` source.

use armock_core::errors::SchemaError;
use tree_sitter::Node;

use super::types::{ColumnType, Field, Schema, Table};
use crate::parsers::error_tolerant::first_error;
use crate::parsers::nodes::{
    block_statements, call_arguments, call_block, call_method, call_options, call_receiver,
    line_of, literal_name, option_value,
};
use crate::parsers::types::{OptionMap, OptionValue};
use crate::parsers::{parse_ruby, ParsedSource};

/// Table-block methods that declare no column.
const NON_COLUMN_METHODS: &[&str] = &[
    "index",
    "remove_index",
    "foreign_key",
    "check_constraint",
    "unique_constraint",
    "exclusion_constraint",
];

/// Parse schema source text into the final state of every declared table.
///
/// Empty input yields an empty schema. A table declared twice keeps only its
/// last declaration.
pub fn parse_schema(source: &str) -> Result<Schema, SchemaError> {
    if source.trim().is_empty() {
        return Ok(Schema::default());
    }

    let parsed = parse_ruby(source).map_err(|message| SchemaError::Grammar { message })?;
    let root = parsed.root();

    if let Some(error) = first_error(root) {
        let line = line_of(error);
        return Err(SchemaError::Malformed {
            line,
            table: enclosing_table(&parsed, error).or_else(|| preceding_table(&parsed, line)),
        });
    }

    let mut schema = Schema {
        content_hash: parsed.content_hash(),
        ..Default::default()
    };
    collect_tables(&parsed, root, &mut schema)?;

    tracing::debug!(tables = schema.len(), "parsed schema");
    Ok(schema)
}

fn collect_tables(parsed: &ParsedSource, node: Node, schema: &mut Schema) -> Result<(), SchemaError> {
    match call_method(parsed, node) {
        Some("create_table") => {
            let table = read_table(parsed, node)?;
            tracing::debug!(table = table.name(), columns = table.len(), "read table");
            if let Some(previous) = schema.tables.insert(table.name().to_string(), table) {
                tracing::debug!(table = previous.name(), "table redeclared, keeping the later block");
            }
            return Ok(());
        }
        Some("define") if call_receiver(parsed, node).is_some_and(|r| r.contains("Schema")) => {
            let args = call_arguments(node);
            if let Some(version) = call_options(parsed, &args).get("version") {
                schema.version = Some(version.clone());
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        collect_tables(parsed, child, schema)?;
    }
    Ok(())
}

fn read_table(parsed: &ParsedSource, node: Node) -> Result<Table, SchemaError> {
    let line = line_of(node);
    let args = call_arguments(node);
    let name = args
        .first()
        .and_then(|a| literal_name(parsed, *a))
        .filter(|n| !n.is_empty())
        .ok_or(SchemaError::InvalidTable { line })?;

    let mut table = Table::new(name, call_options(parsed, &args));

    let Some(block) = call_block(node) else {
        return Ok(table);
    };
    let table_var = block_variable(parsed, block);

    for statement in block_statements(block) {
        let Some(method) = call_method(parsed, statement) else {
            continue;
        };
        let receiver = call_receiver(parsed, statement);
        let on_table = match (&table_var, receiver) {
            (Some(var), Some(receiver)) => var == receiver,
            (None, Some(_)) => true,
            (_, None) => false,
        };
        if !on_table || NON_COLUMN_METHODS.contains(&method) {
            continue;
        }
        read_columns(parsed, statement, method, &mut table)?;
    }
    Ok(table)
}

/// `t` in `do |t|`.
fn block_variable(parsed: &ParsedSource, block: Node) -> Option<String> {
    let params = block.child_by_field_name("parameters")?;
    let first = params.named_child(0)?;
    (first.kind() == "identifier").then(|| parsed.text(first).to_string())
}

fn read_columns(
    parsed: &ParsedSource,
    call: Node,
    method: &str,
    table: &mut Table,
) -> Result<(), SchemaError> {
    let args = call_arguments(call);
    if args.first().is_some_and(|first| first.kind() == "array") {
        // t.<constraint> ["a", "b"], ...: names columns, declares none
        tracing::debug!(method, table = table.name(), "skipping non-column table call");
        return Ok(());
    }
    let options = call_options(parsed, &args);
    let names: Vec<String> = args
        .iter()
        .filter(|a| a.kind() != "pair" && a.kind() != "hash")
        .filter_map(|a| literal_name(parsed, *a))
        .collect();

    match method {
        "timestamps" => {
            for name in ["created_at", "updated_at"] {
                table.push(Field::new(name, ColumnType::Datetime, options.clone()));
            }
        }
        "references" | "belongs_to" => {
            if names.is_empty() {
                return Err(malformed(call, table));
            }
            let id_type = options
                .get("type")
                .and_then(OptionValue::as_str)
                .map_or(ColumnType::Integer, ColumnType::from_tag);
            let polymorphic = options.get("polymorphic").and_then(OptionValue::as_bool) == Some(true);
            for name in names {
                table.push(Field::new(format!("{name}_id"), id_type.clone(), options.clone()));
                if polymorphic {
                    table.push(Field::new(format!("{name}_type"), ColumnType::String, options.clone()));
                }
            }
        }
        "column" => {
            // t.column "name", :type, options
            let positional: Vec<Node> = args
                .iter()
                .copied()
                .filter(|a| a.kind() != "pair" && a.kind() != "hash")
                .collect();
            let name = positional.first().and_then(|a| literal_name(parsed, *a));
            let tag = positional.get(1).map(|a| option_value(parsed, *a));
            match (name, tag.as_ref().and_then(OptionValue::as_str)) {
                (Some(name), Some(tag)) => {
                    table.push(Field::new(name, ColumnType::from_tag(tag), options_without(&options, "type")));
                }
                _ => return Err(malformed(call, table)),
            }
        }
        tag => {
            if names.is_empty() {
                return Err(malformed(call, table));
            }
            let column_type = ColumnType::from_tag(tag);
            for name in names {
                table.push(Field::new(name, column_type.clone(), options.clone()));
            }
        }
    }
    Ok(())
}

fn options_without(options: &OptionMap, key: &str) -> OptionMap {
    options
        .iter()
        .filter(|(k, _)| *k != key)
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn malformed(node: Node, table: &Table) -> SchemaError {
    SchemaError::Malformed {
        line: line_of(node),
        table: Some(table.name().to_string()),
    }
}

/// Name of the `create_table` call enclosing `node`, if any.
fn enclosing_table(parsed: &ParsedSource, node: Node) -> Option<String> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if call_method(parsed, parent) == Some("create_table") {
            return call_arguments(parent)
                .first()
                .and_then(|a| literal_name(parsed, *a));
        }
        current = parent.parent();
    }
    None
}

/// Last `create_table "name"` starting at or before `line`, found textually.
///
/// A syntax error usually swallows the enclosing call into an ERROR node, so
/// the tree alone cannot always name the table.
fn preceding_table(parsed: &ParsedSource, line: u32) -> Option<String> {
    parsed
        .source()
        .lines()
        .take(line as usize)
        .filter_map(|l| {
            let rest = l.trim_start().strip_prefix("create_table")?;
            let rest = rest.trim_start().trim_start_matches('(');
            let rest = rest.trim_start_matches(|c| c == '"' || c == '\'' || c == ':');
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            (!name.is_empty()).then_some(name)
        })
        .last()
}
