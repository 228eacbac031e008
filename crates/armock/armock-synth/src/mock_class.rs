//! A synthesized mock class: attribute layout, relationship names and two dispatch tables.

use std::cell::RefCell;
use std::rc::Rc;

use armock_analysis::{Field, MethodScope, MethodSignature, RelationshipDescriptor};
use armock_core::errors::MockError;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::dispatch::{check_arity, CallArgs, ClassOverride, DispatchTable, InstanceOverride};
use crate::instance::MockInstance;

/// Attribute name → value mapping accepted by `MockClass::new`.
pub type Attributes = Map<String, Value>;

/// Class-level members every mock answers to.
const FIXED_CLASS_API: &[&str] = &["column_names", "mock_of"];

pub struct MockClass {
    name: String,
    mock_of: String,
    table_name: Option<String>,
    fields: Vec<Field>,
    field_index: FxHashMap<String, usize>,
    relationships: Vec<RelationshipDescriptor>,
    mass_assignment: bool,
    instance_methods: RefCell<DispatchTable<InstanceOverride>>,
    class_methods: RefCell<DispatchTable<ClassOverride>>,
}

impl std::fmt::Debug for MockClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClass")
            .field("name", &self.name)
            .field("mock_of", &self.mock_of)
            .field("columns", &self.column_names())
            .finish_non_exhaustive()
    }
}

pub(crate) struct MockClassParts {
    pub name: String,
    pub mock_of: String,
    pub table_name: Option<String>,
    pub fields: Vec<Field>,
    pub relationships: Vec<RelationshipDescriptor>,
    pub mass_assignment: bool,
    pub instance_methods: Vec<MethodSignature>,
    pub class_methods: Vec<MethodSignature>,
}

impl MockClass {
    pub(crate) fn from_parts(parts: MockClassParts) -> Self {
        let field_index = parts
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        Self {
            name: parts.name,
            mock_of: parts.mock_of,
            table_name: parts.table_name,
            fields: parts.fields,
            field_index,
            relationships: parts.relationships,
            mass_assignment: parts.mass_assignment,
            instance_methods: RefCell::new(DispatchTable::new(parts.instance_methods)),
            class_methods: RefCell::new(DispatchTable::new(parts.class_methods)),
        }
    }

    /// `PersonMock`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the mocked model, `Person`.
    pub fn mock_of(&self) -> &str {
        &self.mock_of
    }

    /// Table the attribute slots came from, if one matched.
    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    /// Attribute slot names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name().to_string()).collect()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn relationships(&self) -> &[RelationshipDescriptor] {
        &self.relationships
    }

    pub fn mass_assignment(&self) -> bool {
        self.mass_assignment
    }

    pub(crate) fn field_slot(&self, name: &str) -> Option<usize> {
        self.field_index.get(name).copied()
    }

    pub(crate) fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Build an instance, optionally mass-assigning attributes and relationships.
    pub fn new(self: &Rc<Self>, attributes: Option<Attributes>) -> Result<MockInstance, MockError> {
        let instance = MockInstance::blank(Rc::clone(self));
        let Some(attributes) = attributes.filter(|a| !a.is_empty()) else {
            return Ok(instance);
        };
        if !self.mass_assignment {
            return Err(MockError::MassAssignmentDisabled {
                class: self.name.clone(),
            });
        }
        for (name, value) in attributes {
            if self.field_slot(&name).is_none() && self.relationship(&name).is_none() {
                return Err(MockError::UnknownAttribute {
                    name,
                    class: self.name.clone(),
                });
            }
            instance.set(&name, value)?;
        }
        Ok(instance)
    }

    /// Call a class-level member by name.
    pub fn call(&self, name: &str, mut args: CallArgs) -> Result<Value, MockError> {
        match name {
            "column_names" | "mock_of" => {
                check_arity(&MethodSignature::nullary(name), &MethodScope::Class.qualify(name), &mut args)?;
                return Ok(if name == "mock_of" {
                    Value::String(self.mock_of.clone())
                } else {
                    Value::from(self.column_names())
                });
            }
            _ => {}
        }

        let resolved = self.class_methods.borrow().resolve(name);
        let Some(resolved) = resolved else {
            return Err(MockError::NoMethod {
                name: name.to_string(),
                class: self.name.clone(),
            });
        };
        let qualified = MethodScope::Class.qualify(name);
        check_arity(&resolved.signature, &qualified, &mut args)?;
        match resolved.body {
            Some(body) => Ok(body(self, &args)),
            None => Err(MockError::NotImplemented {
                method: qualified,
                class: self.name.clone(),
            }),
        }
    }

    /// Resolve and run an instance method declared on the model.
    /// `None` when `name` is not one of them.
    pub(crate) fn call_instance_method(
        &self,
        instance: &MockInstance,
        name: &str,
        args: &mut CallArgs,
    ) -> Option<Result<Value, MockError>> {
        let resolved = self.instance_methods.borrow().resolve(name)?;
        let qualified = MethodScope::Instance.qualify(name);
        if let Err(e) = check_arity(&resolved.signature, &qualified, args) {
            return Some(Err(e));
        }
        Some(match resolved.body {
            Some(body) => Ok(body(instance, args)),
            None => Err(MockError::NotImplemented {
                method: qualified,
                class: self.name.clone(),
            }),
        })
    }

    /// Implement instance method `name`, keeping its declared signature.
    pub fn mock_instance_method<F>(&self, name: &str, body: F) -> Result<(), MockError>
    where
        F: Fn(&MockInstance, &CallArgs) -> Value + 'static,
    {
        self.install_instance(name, Rc::new(body), None)
    }

    /// Implement instance method `signature.name`, checking calls against `signature` instead.
    pub fn mock_instance_method_with_signature<F>(
        &self,
        signature: MethodSignature,
        body: F,
    ) -> Result<(), MockError>
    where
        F: Fn(&MockInstance, &CallArgs) -> Value + 'static,
    {
        let name = signature.name.clone();
        self.install_instance(&name, Rc::new(body), Some(signature))
    }

    fn install_instance(
        &self,
        name: &str,
        body: Rc<InstanceOverride>,
        signature: Option<MethodSignature>,
    ) -> Result<(), MockError> {
        if !self.instance_methods.borrow_mut().install(name, body, signature) {
            return Err(self.no_method(MethodScope::Instance, name));
        }
        tracing::debug!(class = %self.name, method = name, "instance method overridden");
        Ok(())
    }

    /// Implement class method `name`, keeping its declared signature.
    pub fn mock_class_method<F>(&self, name: &str, body: F) -> Result<(), MockError>
    where
        F: Fn(&MockClass, &CallArgs) -> Value + 'static,
    {
        self.install_class(name, Rc::new(body), None)
    }

    /// Implement class method `signature.name`, checking calls against `signature` instead.
    pub fn mock_class_method_with_signature<F>(
        &self,
        signature: MethodSignature,
        body: F,
    ) -> Result<(), MockError>
    where
        F: Fn(&MockClass, &CallArgs) -> Value + 'static,
    {
        let name = signature.name.clone();
        self.install_class(&name, Rc::new(body), Some(signature))
    }

    fn install_class(
        &self,
        name: &str,
        body: Rc<ClassOverride>,
        signature: Option<MethodSignature>,
    ) -> Result<(), MockError> {
        if !self.class_methods.borrow_mut().install(name, body, signature) {
            return Err(self.no_method(MethodScope::Class, name));
        }
        tracing::debug!(class = %self.name, method = name, "class method overridden");
        Ok(())
    }

    fn no_method(&self, scope: MethodScope, name: &str) -> MockError {
        MockError::NoMethod {
            name: scope.qualify(name),
            class: self.name.clone(),
        }
    }

    /// Put instance method `name` back to its stub.
    pub fn clear_instance_override(&self, name: &str) -> bool {
        self.instance_methods.borrow_mut().clear(name)
    }

    /// Put class method `name` back to its stub.
    pub fn clear_class_override(&self, name: &str) -> bool {
        self.class_methods.borrow_mut().clear(name)
    }

    /// Remove every override on this class.
    pub fn clear_overrides(&self) {
        self.instance_methods.borrow_mut().clear_all();
        self.class_methods.borrow_mut().clear_all();
    }

    /// Effective signature of a declared instance method.
    pub fn instance_method(&self, name: &str) -> Option<MethodSignature> {
        self.instance_methods.borrow().signature(name).cloned()
    }

    /// Effective signature of a declared class method.
    pub fn class_method(&self, name: &str) -> Option<MethodSignature> {
        self.class_methods.borrow().signature(name).cloned()
    }

    pub fn is_overridden(&self, scope: MethodScope, name: &str) -> bool {
        match scope {
            MethodScope::Class => self.class_methods.borrow().is_overridden(name),
            MethodScope::Instance => self.instance_methods.borrow().is_overridden(name),
        }
    }

    /// Every name an instance answers to: `mock_of`, declared methods,
    /// relationship accessors and attribute accessors.
    pub fn instance_method_names(&self) -> Vec<String> {
        let mut names = vec!["mock_of".to_string()];
        names.extend(self.instance_methods.borrow().names().map(str::to_string));
        for accessor in self
            .relationships
            .iter()
            .map(|r| r.name.as_str())
            .chain(self.fields.iter().map(Field::name))
        {
            names.push(accessor.to_string());
            names.push(format!("{accessor}="));
        }
        names
    }

    /// Every name the class answers to: the fixed API plus declared class methods.
    pub fn class_method_names(&self) -> Vec<String> {
        FIXED_CLASS_API
            .iter()
            .map(|s| s.to_string())
            .chain(self.class_methods.borrow().names().map(str::to_string))
            .collect()
    }

    /// Whether the class answers to `name`.
    pub fn respond_to(&self, name: &str) -> bool {
        FIXED_CLASS_API.contains(&name) || self.class_methods.borrow().contains(name)
    }

    pub(crate) fn instance_responds_to(&self, name: &str) -> bool {
        if name == "mock_of" || self.instance_methods.borrow().contains(name) {
            return true;
        }
        let accessor = name.strip_suffix('=').unwrap_or(name);
        self.field_slot(accessor).is_some() || self.relationship(accessor).is_some()
    }
}
