//! Per-class method table: every declared method is either a stub or an override.

use std::rc::Rc;

use armock_analysis::MethodSignature;
use rustc_hash::FxHashMap;

/// State of one method.
pub enum Slot<F: ?Sized> {
    /// Declared but unimplemented; calls fail with NotImplemented.
    Stub,
    /// Test-installed body. `signature` replaces the declared one when set.
    Override {
        signature: Option<MethodSignature>,
        body: Rc<F>,
    },
}

struct Entry<F: ?Sized> {
    declared: MethodSignature,
    slot: Slot<F>,
}

/// What a call should run, cloned out of the table so no borrow is held while it runs.
pub struct Resolved<F: ?Sized> {
    pub signature: MethodSignature,
    pub body: Option<Rc<F>>,
}

pub struct DispatchTable<F: ?Sized> {
    entries: FxHashMap<String, Entry<F>>,
    order: Vec<String>,
}

impl<F: ?Sized> DispatchTable<F> {
    pub fn new(signatures: impl IntoIterator<Item = MethodSignature>) -> Self {
        let mut table = Self {
            entries: FxHashMap::default(),
            order: Vec::new(),
        };
        for declared in signatures {
            let name = declared.name.clone();
            if table
                .entries
                .insert(name.clone(), Entry { declared, slot: Slot::Stub })
                .is_none()
            {
                table.order.push(name);
            }
        }
        table
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Method names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Signature calls are checked against: the override's own if it brought one.
    pub fn signature(&self, name: &str) -> Option<&MethodSignature> {
        let entry = self.entries.get(name)?;
        match &entry.slot {
            Slot::Override {
                signature: Some(signature),
                ..
            } => Some(signature),
            _ => Some(&entry.declared),
        }
    }

    pub fn declared(&self, name: &str) -> Option<&MethodSignature> {
        self.entries.get(name).map(|e| &e.declared)
    }

    pub fn is_overridden(&self, name: &str) -> bool {
        self.entries
            .get(name)
            .is_some_and(|e| matches!(e.slot, Slot::Override { .. }))
    }

    /// Install `body` for `name`. Returns false when `name` is not declared.
    pub fn install(&mut self, name: &str, body: Rc<F>, signature: Option<MethodSignature>) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.slot = Slot::Override { signature, body };
                true
            }
            None => false,
        }
    }

    /// Put `name` back to its stub. Returns whether an override was removed.
    pub fn clear(&mut self, name: &str) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) if matches!(entry.slot, Slot::Override { .. }) => {
                entry.slot = Slot::Stub;
                true
            }
            _ => false,
        }
    }

    pub fn clear_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.slot = Slot::Stub;
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Resolved<F>> {
        let signature = self.signature(name)?.clone();
        let body = match &self.entries.get(name)?.slot {
            Slot::Override { body, .. } => Some(Rc::clone(body)),
            Slot::Stub => None,
        };
        Some(Resolved { signature, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armock_analysis::{Parameter, ParameterKind};

    type Body = dyn Fn() -> u32;

    fn table() -> DispatchTable<Body> {
        DispatchTable::new([
            MethodSignature::new("bar", [Parameter::new(ParameterKind::Required, "name")]),
            MethodSignature::nullary("baz"),
        ])
    }

    #[test]
    fn test_stub_then_override_then_clear() {
        let mut table = table();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["bar", "baz"]);
        assert!(table.resolve("bar").unwrap().body.is_none());

        assert!(table.install("bar", Rc::new(|| 7), None));
        let resolved = table.resolve("bar").unwrap();
        assert_eq!(resolved.body.map(|f| f()), Some(7));
        assert_eq!(resolved.signature.required_count(), 1);

        assert!(table.clear("bar"));
        assert!(!table.clear("bar"));
        assert!(!table.is_overridden("bar"));
    }

    #[test]
    fn test_override_signature_replaces_declared() {
        let mut table = table();
        table.install("bar", Rc::new(|| 1), Some(MethodSignature::nullary("bar")));
        assert_eq!(table.signature("bar").unwrap().required_count(), 0);
        assert_eq!(table.declared("bar").unwrap().required_count(), 1);
        table.clear_all();
        assert_eq!(table.signature("bar").unwrap().required_count(), 1);
    }

    #[test]
    fn test_install_unknown_name_is_rejected() {
        let mut table = table();
        assert!(!table.install("missing", Rc::new(|| 0), None));
        assert!(table.resolve("missing").is_none());
    }
}
