//! Tests for the armock configuration system.

use std::path::PathBuf;
use std::sync::Mutex;

use armock_core::config::{ConfigOverrides, MockerConfig};
use armock_core::errors::{ArmockErrorCode, ConfigError};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all ARMOCK_ env vars to prevent cross-test contamination.
fn clear_armock_env_vars() {
    for key in [
        "ARMOCK_SCHEMA_PATH",
        "ARMOCK_SCHEMA_FILE",
        "ARMOCK_MODEL_PATH",
        "ARMOCK_MASS_ASSIGNMENT",
        "ARMOCK_MOCK_SUFFIX",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_armock_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("armock.toml"),
        r#"
mass_assignment = false
mock_suffix = "Double"

[schema]
path = "db"

[model]
path = "app/models"

[tables]
Person = "people"
"#,
    )
    .unwrap();

    std::env::set_var("ARMOCK_MODEL_PATH", "lib/models");

    let overrides = ConfigOverrides {
        mass_assignment: Some(true),
        ..Default::default()
    };
    let config = MockerConfig::load(dir.path(), Some(&overrides)).unwrap();

    // Overrides beat the project file.
    assert!(config.effective_mass_assignment());
    // Env beats the project file.
    assert_eq!(config.model.path, Some(PathBuf::from("lib/models")));
    // Project file beats defaults.
    assert_eq!(config.schema.schema_file(), PathBuf::from("db/schema.rb"));
    assert_eq!(config.effective_mock_suffix(), "Double");
    assert_eq!(config.table_override("Person"), Some("people"));

    clear_armock_env_vars();
}

#[test]
fn test_load_without_project_file_uses_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_armock_env_vars();

    let dir = tempdir();
    let config = MockerConfig::load(dir.path(), None).unwrap();
    assert!(config.effective_mass_assignment());
    assert_eq!(config.effective_mock_suffix(), "Mock");
    assert_eq!(config.schema.schema_file(), PathBuf::from("schema.rb"));
    assert_eq!(
        config.model.effective_base_classes(),
        vec!["ActiveRecord::Base".to_string(), "ApplicationRecord".to_string()]
    );
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_armock_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("armock.toml"), "mass_assignment = [").unwrap();
    let err = MockerConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}

#[test]
fn test_env_mass_assignment_ignores_garbage() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_armock_env_vars();

    std::env::set_var("ARMOCK_MASS_ASSIGNMENT", "sometimes");
    let dir = tempdir();
    let config = MockerConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.mass_assignment, None);

    clear_armock_env_vars();
}

#[test]
fn test_validation_rejects_bad_suffix() {
    let err = MockerConfig::from_toml("mock_suffix = \"not valid\"").unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { ref field, .. } if field == "mock_suffix"));
}

#[test]
fn test_toml_round_trip() {
    let config = MockerConfig::from_toml(
        r#"
[model]
base_classes = ["ApplicationRecord"]
"#,
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let back = MockerConfig::from_toml(&text).unwrap();
    assert_eq!(back, config);
}
