//! Declarative walk over a model's class body.
//!
//! Recognized statements: `def`, `def self.`, `class << self`, visibility
//! modifiers, `private_class_method`, `scope`, `attr_*`, `alias`/`alias_method`,
//! association macros and `self.table_name =`. Anything else is ignored.

use std::path::Path;

use armock_core::constants::{
    is_baseline_class_method, is_baseline_instance_method, is_implicitly_private,
};
use armock_core::errors::ModelError;
use rustc_hash::FxHashSet;
use tree_sitter::Node;

use super::types::{
    MethodScope, MethodSignature, ModelMetadata, Parameter, ParameterKind,
    RelationshipDescriptor, RelationshipKind,
};
use crate::parsers::error_tolerant::first_error;
use crate::parsers::nodes::{
    body_statements, call_arguments, call_block, call_method, call_options, call_receiver,
    line_of, literal_name,
};
use crate::parsers::{parse_ruby, ParsedSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visibility {
    Public,
    Private,
    Protected,
}

impl Visibility {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            _ => None,
        }
    }
}

/// Parse `source` (read from `path`) and extract the single model class it declares.
pub fn extract_model(
    source: &str,
    path: &Path,
    base_classes: &[String],
) -> Result<ModelMetadata, ModelError> {
    let parsed = parse_ruby(source).map_err(|message| ModelError::Grammar { message })?;
    let root = parsed.root();

    if let Some(error) = first_error(root) {
        return Err(ModelError::Syntax {
            path: path.to_path_buf(),
            line: line_of(error),
        });
    }

    let mut classes = Vec::new();
    collect_classes(&parsed, root, "", &mut classes);
    let (class_name, class_node) = match classes.len() {
        1 => classes.remove(0),
        found => {
            return Err(ModelError::ClassCount {
                path: path.to_path_buf(),
                found,
            })
        }
    };

    let superclass = class_node
        .child_by_field_name("superclass")
        .and_then(|s| s.named_child(0))
        .map(|s| parsed.text(s).trim_start_matches("::").to_string());
    let accepted = superclass
        .as_deref()
        .is_some_and(|s| base_classes.iter().any(|b| b.trim_start_matches("::") == s));
    if !accepted {
        return Err(ModelError::Shape {
            class_name,
            superclass,
        });
    }

    let mut walk = ClassWalk::new(&parsed);
    walk.body(class_node, MethodScope::Instance);
    let metadata = walk.finish(class_name, superclass, parsed.content_hash());

    tracing::debug!(
        model = %metadata.class_name,
        class_methods = metadata.class_methods.len(),
        instance_methods = metadata.instance_methods.len(),
        relationships = metadata.relationships.len(),
        "extracted model definition"
    );
    Ok(metadata)
}

/// Top-level classes, looking through enclosing `module`s but not into classes.
fn collect_classes<'t>(
    parsed: &ParsedSource,
    node: Node<'t>,
    prefix: &str,
    out: &mut Vec<(String, Node<'t>)>,
) {
    for stmt in body_statements(node) {
        let Some(name) = stmt.child_by_field_name("name").map(|n| parsed.text(n)) else {
            continue;
        };
        match stmt.kind() {
            "class" => out.push((format!("{prefix}{name}"), stmt)),
            "module" => collect_classes(parsed, stmt, &format!("{prefix}{name}::"), out),
            _ => {}
        }
    }
}

struct ClassWalk<'a> {
    parsed: &'a ParsedSource,
    class_methods: Vec<MethodSignature>,
    instance_methods: Vec<MethodSignature>,
    hidden_class: FxHashSet<String>,
    hidden_instance: FxHashSet<String>,
    relationships: Vec<RelationshipDescriptor>,
    table_name: Option<String>,
}

impl<'a> ClassWalk<'a> {
    fn new(parsed: &'a ParsedSource) -> Self {
        Self {
            parsed,
            class_methods: Vec::new(),
            instance_methods: Vec::new(),
            hidden_class: FxHashSet::default(),
            hidden_instance: FxHashSet::default(),
            relationships: Vec::new(),
            table_name: None,
        }
    }

    /// Walk a class or `class << self` body. `scope` is what a plain `def` declares.
    fn body(&mut self, node: Node, scope: MethodScope) {
        let parsed = self.parsed;
        let mut visibility = Visibility::Public;
        for stmt in body_statements(node) {
            match stmt.kind() {
                "method" => self.define(scope, stmt, visibility),
                "singleton_method" => self.define(MethodScope::Class, stmt, Visibility::Public),
                "singleton_class" => self.body(stmt, MethodScope::Class),
                "identifier" => {
                    if let Some(v) = Visibility::from_keyword(parsed.text(stmt)) {
                        visibility = v;
                    }
                }
                "call" if call_receiver(parsed, stmt).is_none() => {
                    self.macro_call(stmt, scope, visibility)
                }
                "alias" => self.alias(stmt, scope),
                "assignment" if scope == MethodScope::Instance => self.assignment(stmt),
                _ => {}
            }
        }
    }

    fn define(&mut self, scope: MethodScope, node: Node, visibility: Visibility) {
        let parsed = self.parsed;
        let Some(name) = node.child_by_field_name("name").map(|n| parsed.text(n)) else {
            return;
        };
        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| parameter_list(parsed, p))
            .unwrap_or_default();
        let visibility = if is_implicitly_private(name) {
            Visibility::Private
        } else {
            visibility
        };
        self.record(scope, MethodSignature::new(name, parameters), visibility);
    }

    fn record(&mut self, scope: MethodScope, signature: MethodSignature, visibility: Visibility) {
        let name = signature.name.clone();
        let methods = match scope {
            MethodScope::Class => &mut self.class_methods,
            MethodScope::Instance => &mut self.instance_methods,
        };
        match methods.iter_mut().find(|m| m.name == name) {
            Some(existing) => *existing = signature,
            None => methods.push(signature),
        }
        self.set_visibility(scope, name, visibility);
    }

    fn set_visibility(&mut self, scope: MethodScope, name: String, visibility: Visibility) {
        let hidden = match scope {
            MethodScope::Class => &mut self.hidden_class,
            MethodScope::Instance => &mut self.hidden_instance,
        };
        if visibility == Visibility::Public {
            hidden.remove(&name);
        } else {
            hidden.insert(name);
        }
    }

    fn macro_call(&mut self, node: Node, scope: MethodScope, visibility: Visibility) {
        let parsed = self.parsed;
        let Some(method) = call_method(parsed, node) else {
            return;
        };
        let args = call_arguments(node);

        if let Some(v) = Visibility::from_keyword(method) {
            self.visibility_call(scope, &args, v);
            return;
        }

        match method {
            "private_class_method" => self.visibility_call(MethodScope::Class, &args, Visibility::Private),
            "public_class_method" => self.visibility_call(MethodScope::Class, &args, Visibility::Public),
            "attr_reader" | "attr_writer" | "attr_accessor" => {
                for attr in args.iter().filter_map(|a| literal_name(parsed, *a)) {
                    if method != "attr_writer" {
                        self.record(scope, MethodSignature::nullary(attr.clone()), visibility);
                    }
                    if method != "attr_reader" {
                        let writer = MethodSignature::new(
                            format!("{attr}="),
                            [Parameter::new(ParameterKind::Required, "value")],
                        );
                        self.record(scope, writer, visibility);
                    }
                }
            }
            "alias_method" => {
                if let [new, old, ..] = args.as_slice() {
                    if let (Some(new), Some(old)) =
                        (literal_name(parsed, *new), literal_name(parsed, *old))
                    {
                        self.copy_method(scope, &new, &old);
                    }
                }
            }
            "scope" if scope == MethodScope::Instance => self.scope(&args),
            _ => {
                if let Some(kind) = RelationshipKind::from_macro(method) {
                    if scope == MethodScope::Instance {
                        self.relationship(kind, &args);
                    }
                }
            }
        }
    }

    /// `private :a, :b`, `private def a; end`, `private_class_method def self.a; end`.
    fn visibility_call(&mut self, scope: MethodScope, args: &[Node], visibility: Visibility) {
        let parsed = self.parsed;
        for arg in args {
            match arg.kind() {
                "method" | "singleton_method" => {
                    let scope = if arg.kind() == "method" { scope } else { MethodScope::Class };
                    self.define(scope, *arg, visibility);
                    // `public def initialize_copy` is public despite the name
                    if let Some(name) = arg.child_by_field_name("name") {
                        self.set_visibility(scope, parsed.text(name).to_string(), visibility);
                    }
                }
                "array" => {
                    let mut cursor = arg.walk();
                    let items: Vec<Node> = arg.named_children(&mut cursor).collect();
                    self.visibility_call(scope, &items, visibility);
                }
                _ => {
                    if let Some(name) = literal_name(parsed, *arg) {
                        self.set_visibility(scope, name, visibility);
                    }
                }
            }
        }
    }

    /// `scope :name, ->(a) { ... }` or `scope :name, lambda { |a| ... }`.
    fn scope(&mut self, args: &[Node]) {
        let parsed = self.parsed;
        let Some(name) = args.first().and_then(|a| literal_name(parsed, *a)) else {
            return;
        };
        let parameters = args
            .get(1)
            .map(|body| lambda_parameters(parsed, *body))
            .unwrap_or_default();
        self.record(
            MethodScope::Class,
            MethodSignature::new(name, parameters),
            Visibility::Public,
        );
    }

    fn relationship(&mut self, kind: RelationshipKind, args: &[Node]) {
        let parsed = self.parsed;
        let Some(name) = args.first().and_then(|a| literal_name(parsed, *a)) else {
            return;
        };
        let descriptor = RelationshipDescriptor {
            kind,
            name,
            options: call_options(parsed, args),
        };
        match self.relationships.iter_mut().find(|r| r.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => self.relationships.push(descriptor),
        }
    }

    fn alias(&mut self, node: Node, scope: MethodScope) {
        let parsed = self.parsed;
        let name = node.child_by_field_name("name").map(|n| parsed.text(n).to_string());
        let original = node.child_by_field_name("alias").map(|n| parsed.text(n).to_string());
        if let (Some(name), Some(original)) = (name, original) {
            self.copy_method(scope, &name, &original);
        }
    }

    fn copy_method(&mut self, scope: MethodScope, new: &str, old: &str) {
        let (methods, hidden) = match scope {
            MethodScope::Class => (&self.class_methods, &self.hidden_class),
            MethodScope::Instance => (&self.instance_methods, &self.hidden_instance),
        };
        let Some(original) = methods.iter().find(|m| m.name == old) else {
            return;
        };
        let visibility = if hidden.contains(old) {
            Visibility::Private
        } else {
            Visibility::Public
        };
        let signature = MethodSignature {
            name: new.to_string(),
            parameters: original.parameters.clone(),
        };
        self.record(scope, signature, visibility);
    }

    /// `self.table_name = "legacy_people"`.
    fn assignment(&mut self, node: Node) {
        let parsed = self.parsed;
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        if left.kind() == "call"
            && call_receiver(parsed, left) == Some("self")
            && call_method(parsed, left) == Some("table_name")
        {
            if let Some(name) = literal_name(parsed, right) {
                self.table_name = Some(name);
            }
        }
    }

    fn finish(mut self, class_name: String, superclass: Option<String>, content_hash: u64) -> ModelMetadata {
        let hidden_class = self.hidden_class;
        let hidden_instance = self.hidden_instance;
        self.instance_methods
            .retain(|m| !hidden_instance.contains(&m.name) && !is_baseline_instance_method(&m.name));
        // a name shared with a public instance method is not a class method
        let instance_names: FxHashSet<&str> =
            self.instance_methods.iter().map(|m| m.name.as_str()).collect();
        self.class_methods.retain(|m| {
            !hidden_class.contains(&m.name)
                && !is_baseline_class_method(&m.name)
                && !instance_names.contains(m.name.as_str())
        });
        self.relationships.sort_by_key(|r| r.kind);

        ModelMetadata {
            class_name,
            superclass,
            table_name: self.table_name,
            class_methods: self.class_methods,
            instance_methods: self.instance_methods,
            relationships: self.relationships,
            content_hash,
        }
    }
}

/// Parameters of a lambda literal or a `lambda { |..| }` / `proc { |..| }` call.
fn lambda_parameters(parsed: &ParsedSource, node: Node) -> Vec<Parameter> {
    let params = match node.kind() {
        "lambda" => node.child_by_field_name("parameters"),
        "call" if matches!(call_method(parsed, node), Some("lambda" | "proc")) => {
            call_block(node).and_then(|b| b.child_by_field_name("parameters"))
        }
        _ => None,
    };
    params.map(|p| parameter_list(parsed, p)).unwrap_or_default()
}

/// Decode `method_parameters`, `lambda_parameters` or `block_parameters`.
fn parameter_list(parsed: &ParsedSource, params: Node) -> Vec<Parameter> {
    let field_text = |node: Node, field: &str| {
        node.child_by_field_name(field)
            .map(|n| parsed.text(n).to_string())
    };

    let mut out = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => out.push(Parameter::new(ParameterKind::Required, parsed.text(param))),
            "destructured_parameter" => {
                out.push(Parameter::new(ParameterKind::Required, parsed.text(param)))
            }
            "optional_parameter" => {
                let name = field_text(param, "name").unwrap_or_default();
                let default = field_text(param, "value").unwrap_or_default();
                out.push(Parameter::with_default(ParameterKind::Optional, name, default));
            }
            "splat_parameter" => out.push(Parameter::new(
                ParameterKind::Rest,
                field_text(param, "name").unwrap_or_else(|| "*".into()),
            )),
            "hash_splat_parameter" => out.push(Parameter::new(
                ParameterKind::KeywordRest,
                field_text(param, "name").unwrap_or_else(|| "**".into()),
            )),
            "block_parameter" => out.push(Parameter::new(
                ParameterKind::Block,
                field_text(param, "name").unwrap_or_else(|| "&".into()),
            )),
            "keyword_parameter" => {
                let name = field_text(param, "name").unwrap_or_default();
                out.push(match field_text(param, "value") {
                    Some(default) => Parameter::with_default(ParameterKind::Keyword, name, default),
                    None => Parameter::new(ParameterKind::KeywordRequired, name),
                });
            }
            "forward_parameter" => {
                out.push(Parameter::new(ParameterKind::Rest, "*"));
                out.push(Parameter::new(ParameterKind::KeywordRest, "**"));
                out.push(Parameter::new(ParameterKind::Block, "&"));
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bases() -> Vec<String> {
        vec!["ActiveRecord::Base".to_string(), "ApplicationRecord".to_string()]
    }

    fn extract(source: &str) -> Result<ModelMetadata, ModelError> {
        extract_model(source, Path::new("person.rb"), &bases())
    }

    #[test]
    fn test_parameter_kinds() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  def all_kinds(a, b = 2, *c, d:, e: 5, **f, &g); end\nend\n",
        )
        .unwrap();
        let sig = meta.instance_method("all_kinds").unwrap();
        assert_eq!(
            sig.ruby_parameters(),
            vec![
                ("req", "a"),
                ("opt", "b"),
                ("rest", "c"),
                ("keyreq", "d"),
                ("key", "e"),
                ("keyrest", "f"),
                ("block", "g"),
            ]
        );
        assert_eq!(sig.parameters[1].default.as_deref(), Some("2"));
    }

    #[test]
    fn test_singleton_class_and_private_class_method() {
        let meta = extract(
            "class Person < ApplicationRecord\n  class << self\n    def visible; end\n    private\n    def hidden; end\n  end\n  def self.secret; end\n  private_class_method :secret\nend\n",
        )
        .unwrap();
        let names: Vec<&str> = meta.class_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["visible"]);
    }

    #[test]
    fn test_visibility_with_arguments() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  def a; end\n  def b; end\n  private :a\n  protected def c; end\n  private\n  def d; end\n  public\n  def e; end\nend\n",
        )
        .unwrap();
        let names: Vec<&str> = meta.instance_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "e"]);
    }

    #[test]
    fn test_attr_accessors_and_alias() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  attr_accessor :nickname\n  attr_reader :age\n  def greet(name); end\n  alias_method :hello, :greet\nend\n",
        )
        .unwrap();
        let names: Vec<&str> = meta.instance_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["nickname", "nickname=", "age", "greet", "hello"]);
        assert_eq!(meta.instance_method("hello").unwrap().required_count(), 1);
    }

    #[test]
    fn test_scope_with_lambda_parameters() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  scope :named, -> { where(name: 'x') }\n  scope :older_than, ->(age, strict = false) { where(age: age) }\n  scope :legacy, lambda { |n| limit(n) }\nend\n",
        )
        .unwrap();
        assert_eq!(meta.class_method("named").unwrap().parameters.len(), 0);
        assert_eq!(
            meta.class_method("older_than").unwrap().ruby_parameters(),
            vec![("req", "age"), ("opt", "strict")]
        );
        assert_eq!(
            meta.class_method("legacy").unwrap().ruby_parameters(),
            vec![("req", "n")]
        );
    }

    #[test]
    fn test_table_name_assignment() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  self.table_name = \"legacy_people\"\nend\n",
        )
        .unwrap();
        assert_eq!(meta.table_name.as_deref(), Some("legacy_people"));
    }

    #[test]
    fn test_relationships_grouped_by_kind() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  has_many :posts\n  belongs_to :company, class_name: \"Org\"\n  has_one :profile\n  belongs_to :state\nend\n",
        )
        .unwrap();
        let names: Vec<&str> = meta.relationships.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["company", "state", "profile", "posts"]);
        let groups: Vec<(RelationshipKind, usize)> = meta
            .relationships_by_kind()
            .into_iter()
            .map(|(kind, members)| (kind, members.len()))
            .collect();
        assert_eq!(
            groups,
            vec![
                (RelationshipKind::BelongsTo, 2),
                (RelationshipKind::HasOne, 1),
                (RelationshipKind::HasMany, 1),
            ]
        );
        let company = meta.relationship("company").unwrap();
        assert_eq!(
            company.options.get("class_name").and_then(|v| v.as_str()),
            Some("Org")
        );
    }

    #[test]
    fn test_implicitly_private_methods_are_hidden() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  def respond_to_missing?(name, include_private = false); end\n  def initialize_copy(other); end\n  def initialize_dup(other); end\n  def foo; end\nend\n",
        )
        .unwrap();
        let names: Vec<&str> = meta.instance_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["foo"]);
    }

    #[test]
    fn test_explicit_public_overrides_implicit_privacy() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  def initialize_clone(other); end\n  public :initialize_clone\nend\n",
        )
        .unwrap();
        assert!(meta.instance_method("initialize_clone").is_some());
    }

    #[test]
    fn test_class_method_shadowed_by_instance_method() {
        let meta = extract(
            "class Person < ActiveRecord::Base\n  def self.foo; end\n  def foo; end\n  def self.bar; end\n  def self.baz; end\n  private\n  def baz; end\nend\n",
        )
        .unwrap();
        let class_names: Vec<&str> = meta.class_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(class_names, vec!["bar", "baz"]);
        assert!(meta.instance_method("foo").is_some());
    }

    #[test]
    fn test_module_nesting_and_baseline() {
        let meta = extract(
            "module Admin\n  class User < ::ApplicationRecord\n    def to_s; end\n    def save; end\n    def role; end\n  end\nend\n",
        )
        .unwrap();
        assert_eq!(meta.class_name, "Admin::User");
        assert_eq!(meta.superclass.as_deref(), Some("ApplicationRecord"));
        let names: Vec<&str> = meta.instance_methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["role"]);
    }
}
