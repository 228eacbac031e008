//! Instances of a mock class: one slot per column plus relationship values.

use std::cell::RefCell;
use std::rc::Rc;

use armock_analysis::{MethodScope, MethodSignature, Parameter, ParameterKind};
use armock_core::errors::MockError;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::dispatch::{check_arity, CallArgs};
use crate::mock_class::{Attributes, MockClass};

pub struct MockInstance {
    class: Rc<MockClass>,
    slots: RefCell<Vec<Value>>,
    associations: RefCell<FxHashMap<String, Value>>,
}

impl std::fmt::Debug for MockInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockInstance")
            .field("class", &self.class.name())
            .field("attributes", &self.attributes())
            .finish()
    }
}

impl MockInstance {
    pub(crate) fn blank(class: Rc<MockClass>) -> Self {
        let slots = vec![Value::Null; class.fields().len()];
        let associations = class
            .relationships()
            .iter()
            .map(|r| {
                let empty = if r.kind.is_collection() {
                    Value::Array(Vec::new())
                } else {
                    Value::Null
                };
                (r.name.clone(), empty)
            })
            .collect();
        Self {
            class,
            slots: RefCell::new(slots),
            associations: RefCell::new(associations),
        }
    }

    pub fn class(&self) -> &Rc<MockClass> {
        &self.class
    }

    /// Name of the mocked model.
    pub fn mock_of(&self) -> &str {
        self.class.mock_of()
    }

    /// Read an attribute or relationship.
    pub fn get(&self, name: &str) -> Result<Value, MockError> {
        if let Some(slot) = self.class.field_slot(name) {
            return Ok(self.slots.borrow()[slot].clone());
        }
        if let Some(value) = self.associations.borrow().get(name) {
            return Ok(value.clone());
        }
        Err(self.no_method(name))
    }

    /// Write an attribute or relationship. Accepts `name` or `name=`.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), MockError> {
        let name = name.strip_suffix('=').unwrap_or(name);
        if let Some(slot) = self.class.field_slot(name) {
            self.slots.borrow_mut()[slot] = value.into();
            return Ok(());
        }
        if self.class.relationship(name).is_some() {
            self.associations
                .borrow_mut()
                .insert(name.to_string(), value.into());
            return Ok(());
        }
        Err(self.no_method(&format!("{name}=")))
    }

    /// Snapshot of the attribute slots in column order.
    pub fn attributes(&self) -> Attributes {
        let slots = self.slots.borrow();
        self.class
            .fields()
            .iter()
            .zip(slots.iter())
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect()
    }

    /// Call `name` on the instance.
    ///
    /// Resolution order: `mock_of`, declared instance methods, relationship
    /// accessors, attribute accessors.
    pub fn call(&self, name: &str, mut args: CallArgs) -> Result<Value, MockError> {
        if name == "mock_of" {
            check_arity(&MethodSignature::nullary(name), &MethodScope::Instance.qualify(name), &mut args)?;
            return Ok(Value::String(self.mock_of().to_string()));
        }

        if let Some(result) = self.class.call_instance_method(self, name, &mut args) {
            return result;
        }

        let (accessor, writer) = match name.strip_suffix('=') {
            Some(accessor) => (accessor, true),
            None => (name, false),
        };
        if self.class.field_slot(accessor).is_none() && self.class.relationship(accessor).is_none() {
            return Err(self.no_method(name));
        }

        let qualified = MethodScope::Instance.qualify(name);
        if writer {
            let setter = MethodSignature::new(name, [Parameter::new(ParameterKind::Required, "value")]);
            check_arity(&setter, &qualified, &mut args)?;
            let value = args.positional.pop().unwrap_or(Value::Null);
            self.set(accessor, value.clone())?;
            Ok(value)
        } else {
            check_arity(&MethodSignature::nullary(name), &qualified, &mut args)?;
            self.get(accessor)
        }
    }

    /// Whether the instance answers to `name`.
    pub fn respond_to(&self, name: &str) -> bool {
        self.class.instance_responds_to(name)
    }

    fn no_method(&self, name: &str) -> MockError {
        MockError::NoMethod {
            name: name.to_string(),
            class: self.class.name().to_string(),
        }
    }
}
