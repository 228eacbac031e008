//! Tests for the schema parser and SchemaReader.

use std::sync::Arc;

use armock_analysis::schema::{parse_schema, ColumnType, SchemaReader};
use armock_analysis::OptionValue;
use armock_core::config::SchemaSourceConfig;
use armock_core::errors::{ArmockErrorCode, SchemaError};
use armock_core::{MapReader, StringReader};
use proptest::prelude::*;

const PEOPLE_SCHEMA: &str = r#"
ActiveRecord::Schema.define(version: 20140327205359) do

  create_table "people", force: true do |t|
    t.integer  "company_id"
    t.string   "first_name",        limit: 128
    t.string   "middle_name",       limit: 128
    t.string   "last_name",         limit: 128
    t.string   "address_1",         limit: 200
    t.string   "address_2",         limit: 100
    t.string   "city",              limit: 100
    t.integer  "state_id"
    t.integer  "zip_code_id"
  end

end
"#;

#[test]
fn test_people_columns_in_declaration_order() {
    let schema = parse_schema(PEOPLE_SCHEMA).unwrap();
    assert_eq!(schema.version, Some(OptionValue::Integer(20140327205359)));

    let people = schema.table("people").unwrap();
    assert_eq!(
        people.column_names(),
        vec![
            "company_id", "first_name", "middle_name", "last_name", "address_1", "address_2",
            "city", "state_id", "zip_code_id",
        ]
    );
    assert_eq!(people.options().get("force"), Some(&OptionValue::Bool(true)));

    let first_name = people.field("first_name").unwrap();
    assert_eq!(first_name.column_type(), &ColumnType::String);
    assert_eq!(first_name.option("limit"), Some(&OptionValue::Integer(128)));
    assert_eq!(people.field("state_id").unwrap().column_type(), &ColumnType::Integer);
}

#[test]
fn test_empty_source_is_empty_schema() {
    assert!(parse_schema("").unwrap().is_empty());
    assert!(parse_schema("  \n\n").unwrap().is_empty());
    let schema = parse_schema("ActiveRecord::Schema.define(version: 1) do\nend\n").unwrap();
    assert!(schema.is_empty());
}

#[test]
fn test_redeclared_table_keeps_later_block() {
    let source = r#"
create_table "people" do |t|
  t.string "name"
end
create_table "people" do |t|
  t.string "first_name"
  t.string "last_name"
end
"#;
    let schema = parse_schema(source).unwrap();
    assert_eq!(schema.len(), 1);
    assert_eq!(
        schema.table("people").unwrap().column_names(),
        vec!["first_name", "last_name"]
    );
}

#[test]
fn test_symbol_names_and_open_types() {
    let source = r#"
create_table :gadgets, id: :uuid do |t|
  t.citext :handle, null: false
  t.jsonb :payload, default: {}
  t.decimal :price, precision: 10, scale: 2
end
"#;
    let schema = parse_schema(source).unwrap();
    let gadgets = schema.table("gadgets").unwrap();
    assert_eq!(gadgets.column_names(), vec!["handle", "payload", "price"]);
    assert_eq!(
        gadgets.field("handle").unwrap().column_type(),
        &ColumnType::Other("citext".to_string())
    );
    assert!(!gadgets.field("handle").unwrap().is_nullable());
    assert_eq!(gadgets.field("payload").unwrap().column_type(), &ColumnType::Jsonb);
    assert_eq!(
        gadgets.field("price").unwrap().option("scale"),
        Some(&OptionValue::Integer(2))
    );
}

#[test]
fn test_timestamps_references_and_column() {
    let source = r#"
create_table "comments" do |t|
  t.references :post
  t.belongs_to :commentable, polymorphic: true
  t.column "body", :text, null: false
  t.timestamps null: false
  t.index ["post_id"], name: "index_comments_on_post_id"
end
"#;
    let schema = parse_schema(source).unwrap();
    let comments = schema.table("comments").unwrap();
    assert_eq!(
        comments.column_names(),
        vec![
            "post_id",
            "commentable_id",
            "commentable_type",
            "body",
            "created_at",
            "updated_at",
        ]
    );
    let body = comments.field("body").unwrap();
    assert_eq!(body.column_type(), &ColumnType::Text);
    assert!(body.option("type").is_none());
    assert_eq!(
        comments.field("created_at").unwrap().column_type(),
        &ColumnType::Datetime
    );
}

#[test]
fn test_constraints_declare_no_columns() {
    let source = r#"
create_table "people", force: :cascade do |t|
  t.string "email"
  t.unique_constraint ["email"], name: "people_email_unique"
  t.exclusion_constraint "tstzrange(starts_at, ends_at) WITH &&", using: :gist
  t.check_constraint "char_length(email) > 3", name: "email_length"
  t.deferrable_constraint ["email", "id"]
end
"#;
    let schema = parse_schema(source).unwrap();
    assert_eq!(schema.table("people").unwrap().column_names(), vec!["email"]);
}

#[test]
fn test_several_names_share_options() {
    let schema = parse_schema("create_table :points do |t|\n  t.float :x, :y, default: 0.0\nend\n").unwrap();
    let points = schema.table("points").unwrap();
    assert_eq!(points.column_names(), vec!["x", "y"]);
    assert_eq!(points.field("y").unwrap().default_value(), Some(&OptionValue::Float(0.0)));
}

#[test]
fn test_malformed_names_line_and_table() {
    let source = "create_table \"people\" do |t|\n  t.string \"name\",\n  t.integer \"age\" limit: )\nend\n";
    let err = parse_schema(source).unwrap_err();
    match &err {
        SchemaError::Malformed { line, table } => {
            assert!((1..=4).contains(line), "unexpected line {line}");
            assert_eq!(table.as_deref(), Some("people"));
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
    assert_eq!(err.error_code(), "PARSE_ERROR");
}

#[test]
fn test_create_table_without_literal_name() {
    let err = parse_schema("create_table \"#{prefix}_people\" do |t|\n  t.string \"a\"\nend\n").unwrap_err();
    assert!(matches!(err, SchemaError::InvalidTable { line: 1 }));
}

#[test]
fn test_reader_missing_schema_is_empty() {
    let reader = SchemaReader::new(Arc::new(MapReader::new()), SchemaSourceConfig::default());
    assert!(reader.schema().unwrap().is_empty());
    assert!(reader.table("people").unwrap().is_none());
}

#[test]
fn test_reader_resolves_configured_path() {
    let config = SchemaSourceConfig {
        path: Some("db".into()),
        file: None,
    };
    let files = MapReader::new().with("db/schema.rb", PEOPLE_SCHEMA);
    let reader = SchemaReader::new(Arc::new(files), config);
    assert_eq!(reader.path(), std::path::PathBuf::from("db/schema.rb"));
    assert_eq!(reader.table("people").unwrap().unwrap().len(), 9);
}

#[test]
fn test_reader_memoizes_parse() {
    let reader = SchemaReader::new(
        Arc::new(StringReader::new(PEOPLE_SCHEMA)),
        SchemaSourceConfig::default(),
    );
    let first = reader.schema().unwrap();
    let second = reader.schema().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    reader.invalidate();
    let third = reader.schema().unwrap();
    assert_eq!(third.content_hash, first.content_hash);
}

fn column_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn prop_columns_keep_order(names in prop::collection::btree_set(column_name(), 0..24)) {
        let names: Vec<String> = names.into_iter().collect();
        let mut source = String::from("create_table \"things\" do |t|\n");
        for (i, name) in names.iter().enumerate() {
            let tag = if i % 2 == 0 { "string" } else { "integer" };
            source.push_str(&format!("  t.{tag} \"{name}\"\n"));
        }
        source.push_str("end\n");

        let schema = parse_schema(&source).unwrap();
        let things = schema.table("things").unwrap();
        prop_assert_eq!(things.len(), names.len());
        prop_assert_eq!(things.column_names(), names);
    }
}
