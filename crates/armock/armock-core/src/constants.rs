//! Shared constants for armock, including the baseline member sets that are
//! subtracted from a model's declared members.

/// Suffix appended to a model name to name its mock (`Person` → `PersonMock`).
pub const DEFAULT_MOCK_SUFFIX: &str = "Mock";

/// Default schema file name under the configured schema directory.
pub const DEFAULT_SCHEMA_FILE: &str = "schema.rb";

/// Default mass-assignment policy.
pub const DEFAULT_MASS_ASSIGNMENT: bool = true;

/// Superclasses accepted as "an ActiveRecord model" when none are configured.
pub const DEFAULT_BASE_CLASSES: &[&str] = &["ActiveRecord::Base", "ApplicationRecord"];

/// Methods every Ruby object answers to.
pub const OBJECT_INSTANCE_METHODS: &[&str] = &[
    "!", "!=", "!~", "<=>", "==", "===", "=~", "__id__", "__send__", "class", "clone",
    "define_singleton_method", "display", "dup", "enum_for", "eql?", "equal?", "extend",
    "freeze", "frozen?", "hash", "initialize", "inspect", "instance_of?",
    "instance_variable_defined?", "instance_variable_get", "instance_variable_set",
    "instance_variables", "is_a?", "itself", "kind_of?", "method", "methods", "nil?",
    "object_id", "private_methods", "protected_methods", "public_method", "public_methods",
    "public_send", "respond_to?", "send", "singleton_class", "singleton_method",
    "singleton_methods", "tap", "then", "to_enum", "to_s", "yield_self",
];

/// Methods every Ruby class answers to, on top of `OBJECT_INSTANCE_METHODS`.
pub const OBJECT_CLASS_METHODS: &[&str] = &[
    "<", "<=", ">", ">=", "alias_method", "allocate", "ancestors", "attr_accessor",
    "attr_reader", "attr_writer", "class_eval", "class_exec", "class_variable_get",
    "class_variable_set", "class_variables", "const_defined?", "const_get", "const_set",
    "constants", "define_method", "include", "include?", "included_modules",
    "instance_method", "instance_methods", "method_defined?", "module_eval", "module_exec",
    "module_function", "name", "new", "prepend", "private", "private_class_method",
    "private_constant", "private_instance_methods", "protected", "public",
    "public_class_method", "public_instance_method", "public_instance_methods", "superclass",
];

/// Class-level members inherited from `ActiveRecord::Base`.
pub const ACTIVE_RECORD_CLASS_METHODS: &[&str] = &[
    "abstract_class", "abstract_class=", "accepts_nested_attributes_for", "after_commit",
    "after_create", "after_destroy", "after_initialize", "after_save", "after_update",
    "after_validation", "alias_attribute", "all", "any?", "attribute", "attribute_names",
    "average", "before_create", "before_destroy", "before_save", "before_update",
    "before_validation", "belongs_to", "calculate", "column_names", "columns",
    "columns_hash", "connection", "count", "create", "create!", "create_with",
    "default_scope", "delegate", "delete", "delete_all", "destroy", "destroy_all",
    "distinct", "eager_load", "enum", "establish_connection", "exists?", "extending",
    "find", "find_by", "find_by!", "find_each", "find_in_batches", "find_or_create_by",
    "find_or_create_by!", "find_or_initialize_by", "first", "first!", "group",
    "has_and_belongs_to_many", "has_many", "has_one", "has_secure_password", "having",
    "human_attribute_name", "ids", "in_batches", "includes", "inheritance_column",
    "insert_all", "joins", "last", "last!", "left_joins", "left_outer_joins", "limit",
    "lock", "maximum", "minimum", "model_name", "none", "offset", "or", "order", "pluck",
    "preload", "primary_key", "readonly", "reflect_on_all_associations", "reflections",
    "reorder", "reverse_order", "rewhere", "scope", "second", "select", "serialize",
    "store", "store_accessor", "sum", "table_name", "table_name=", "take", "take!",
    "third", "transaction", "unscoped", "update", "update_all", "upsert", "upsert_all",
    "validate", "validates", "validates_associated", "validates_format_of",
    "validates_length_of", "validates_presence_of", "validates_uniqueness_of", "where",
];

/// Instance-level members inherited from `ActiveRecord::Base`.
pub const ACTIVE_RECORD_INSTANCE_METHODS: &[&str] = &[
    "[]", "[]=", "as_json", "assign_attributes", "attribute_names", "attribute_present?",
    "attributes", "attributes=", "becomes", "cache_key", "changed", "changed?", "changes",
    "decrement", "decrement!", "delete", "destroy", "destroy!", "destroyed?", "errors",
    "has_attribute?", "id", "id=", "increment", "increment!", "invalid?", "lock!",
    "marked_for_destruction?", "new_record?", "persisted?", "previous_changes",
    "read_attribute", "readonly?", "reload", "save", "save!", "saved_changes",
    "serializable_hash", "to_json", "to_key", "to_model", "to_param", "toggle", "toggle!",
    "touch", "transaction", "update", "update!", "update_attribute", "update_column",
    "update_columns", "valid?", "with_lock", "write_attribute",
];

/// Methods Ruby makes private wherever they are defined.
pub const IMPLICITLY_PRIVATE_METHODS: &[&str] = &[
    "initialize",
    "initialize_copy",
    "initialize_clone",
    "initialize_dup",
    "respond_to_missing?",
];

pub fn is_implicitly_private(name: &str) -> bool {
    IMPLICITLY_PRIVATE_METHODS.contains(&name)
}

/// True if `name` is inherited by every model class and must not be mocked.
pub fn is_baseline_class_method(name: &str) -> bool {
    ACTIVE_RECORD_CLASS_METHODS.contains(&name)
        || OBJECT_CLASS_METHODS.contains(&name)
        || OBJECT_INSTANCE_METHODS.contains(&name)
}

/// True if `name` is inherited by every model instance and must not be mocked.
pub fn is_baseline_instance_method(name: &str) -> bool {
    ACTIVE_RECORD_INSTANCE_METHODS.contains(&name) || OBJECT_INSTANCE_METHODS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_membership() {
        assert!(is_baseline_class_method("where"));
        assert!(is_baseline_class_method("new"));
        assert!(is_baseline_class_method("object_id"));
        assert!(!is_baseline_class_method("named"));
        assert!(is_baseline_instance_method("save"));
        assert!(is_baseline_instance_method("to_s"));
        assert!(!is_baseline_instance_method("full_name"));
        assert!(is_implicitly_private("respond_to_missing?"));
        assert!(!is_implicitly_private("initialize_later"));
    }
}
