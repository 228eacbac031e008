//! Tests for ModelReader: locating, parsing and memoizing model definitions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use armock_analysis::{ModelReader, ParameterKind, RelationshipKind};
use armock_core::config::ModelSourceConfig;
use armock_core::errors::{ArmockErrorCode, ModelError, ReadError};
use armock_core::traits::FileReader;
use armock_core::{FsReader, MapReader, StringReader};

fn reader_for(source: &str) -> ModelReader {
    ModelReader::new(Arc::new(StringReader::new(source)), ModelSourceConfig::default())
}

/// Counts how often the source is actually read.
struct CountingReader {
    inner: StringReader,
    reads: AtomicUsize,
}

impl FileReader for CountingReader {
    fn read(&self, path: &Path) -> Result<String, ReadError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(path)
    }
}

#[test]
fn test_empty_model() {
    let meta = reader_for("class Person < ActiveRecord::Base\nend\n")
        .parse("Person")
        .unwrap();
    assert_eq!(meta.class_name, "Person");
    assert_eq!(meta.superclass.as_deref(), Some("ActiveRecord::Base"));
    assert!(meta.class_methods.is_empty());
    assert!(meta.instance_methods.is_empty());
    assert!(meta.relationships.is_empty());
    assert!(meta.table_name.is_none());
}

#[test]
fn test_private_methods_are_excluded() {
    let meta = reader_for("class Person < ActiveRecord::Base\n  private\n\n  def bar\n  end\nend\n")
        .parse("Person")
        .unwrap();
    assert!(meta.instance_method("bar").is_none());
    assert!(meta.class_method("bar").is_none());
}

#[test]
fn test_instance_method_signature() {
    let meta = reader_for("class Person < ActiveRecord::Base\n  def bar(name, type=nil)\n  end\nend\n")
        .parse("Person")
        .unwrap();
    let bar = meta.instance_method("bar").unwrap();
    assert_eq!(bar.ruby_parameters(), vec![("req", "name"), ("opt", "type")]);
    assert_eq!(bar.parameters[1].kind, ParameterKind::Optional);
    assert_eq!(bar.parameters[1].default.as_deref(), Some("nil"));
}

#[test]
fn test_class_methods_and_scopes() {
    let meta = reader_for(
        "class Person < ActiveRecord::Base\n  scope :named, -> { }\n\n  def self.class_method\n  end\nend\n",
    )
    .parse("Person")
    .unwrap();
    let names: Vec<&str> = meta.class_methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["named", "class_method"]);
    assert!(meta.instance_methods.is_empty());
}

#[test]
fn test_relationship_with_options() {
    let meta = reader_for(
        "class Person < ActiveRecord::Base\n  belongs_to :account\n  has_many :posts, dependent: :destroy\nend\n",
    )
    .parse("Person")
    .unwrap();
    assert_eq!(meta.relationships.len(), 2);
    assert_eq!(meta.relationships[0].kind, RelationshipKind::BelongsTo);
    assert_eq!(meta.relationships[0].name, "account");
    let posts = meta.relationship("posts").unwrap();
    assert!(posts.kind.is_collection());
    assert!(posts.options.contains_key("dependent"));
}

#[test]
fn test_two_classes_is_class_count_error() {
    let err = reader_for(
        "class Person < ActiveRecord::Base\nend\nclass Other < ActiveRecord::Base\nend\n",
    )
    .parse("Person")
    .unwrap_err();
    assert!(matches!(err, ModelError::ClassCount { found: 2, .. }));
    assert_eq!(err.error_code(), "LOAD_ERROR");
}

#[test]
fn test_no_class_is_class_count_error() {
    let err = reader_for("module Helpers\nend\n").parse("Person").unwrap_err();
    assert!(matches!(err, ModelError::ClassCount { found: 0, .. }));
}

#[test]
fn test_non_model_superclass_is_shape_error() {
    let err = reader_for("class Person < Struct\nend\n").parse("Person").unwrap_err();
    match &err {
        ModelError::Shape { class_name, superclass } => {
            assert_eq!(class_name, "Person");
            assert_eq!(superclass.as_deref(), Some("Struct"));
        }
        other => panic!("expected Shape, got {other:?}"),
    }
    assert_eq!(err.error_code(), "SHAPE_ERROR");

    let err = reader_for("class Person\nend\n").parse("Person").unwrap_err();
    assert!(matches!(err, ModelError::Shape { superclass: None, .. }));
}

#[test]
fn test_configured_base_classes() {
    let config = ModelSourceConfig {
        path: None,
        base_classes: vec!["Sequel::Model".to_string()],
    };
    let reader = ModelReader::new(
        Arc::new(StringReader::new("class Person < Sequel::Model\nend\n")),
        config,
    );
    assert!(reader.parse("Person").is_ok());
}

#[test]
fn test_syntax_error_reports_line() {
    let err = reader_for("class Person < ActiveRecord::Base\n  def bar(\nend\n")
        .parse("Person")
        .unwrap_err();
    match err {
        ModelError::Syntax { path, line } => {
            assert_eq!(path, PathBuf::from("person.rb"));
            assert!((1..=4).contains(&line), "unexpected line {line}");
        }
        other => panic!("expected Syntax, got {other:?}"),
    }
}

#[test]
fn test_missing_model_is_not_found() {
    let reader = ModelReader::new(Arc::new(MapReader::new()), ModelSourceConfig::default());
    let err = reader.parse("Person").unwrap_err();
    assert!(matches!(err, ModelError::Read(ReadError::NotFound { .. })));
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[test]
fn test_namespaced_model_path() {
    let config = ModelSourceConfig {
        path: Some("app/models".into()),
        base_classes: Vec::new(),
    };
    let files = MapReader::new().with(
        "app/models/admin/zip_code.rb",
        "module Admin\n  class ZipCode < ApplicationRecord\n    self.table_name = \"zips\"\n  end\nend\n",
    );
    let reader = ModelReader::new(Arc::new(files), config);
    assert_eq!(
        reader.path_for("Admin::ZipCode"),
        PathBuf::from("app/models/admin/zip_code.rb")
    );
    let meta = reader.parse("Admin::ZipCode").unwrap();
    assert_eq!(meta.class_name, "Admin::ZipCode");
    assert_eq!(meta.table_name.as_deref(), Some("zips"));
}

#[test]
fn test_parse_is_idempotent_and_cached() {
    let counting = Arc::new(CountingReader {
        inner: StringReader::new("class Person < ActiveRecord::Base\n  def bar; end\nend\n"),
        reads: AtomicUsize::new(0),
    });
    let reader = ModelReader::new(counting.clone(), ModelSourceConfig::default());

    let first = reader.parse("Person").unwrap();
    let second = reader.parse("Person").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counting.reads.load(Ordering::SeqCst), 1);

    reader.invalidate();
    let third = reader.parse("Person").unwrap();
    assert_eq!(*third, *first);
    assert_eq!(counting.reads.load(Ordering::SeqCst), 2);
}

#[test]
fn test_reads_from_filesystem() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("person.rb"),
        "class Person < ActiveRecord::Base\n  def full_name; end\nend\n",
    )
    .unwrap();
    let config = ModelSourceConfig {
        path: Some(dir.path().to_path_buf()),
        base_classes: Vec::new(),
    };
    let meta = ModelReader::new(Arc::new(FsReader), config).parse("Person").unwrap();
    assert!(meta.instance_method("full_name").is_some());
}
