//! Arguments of one call into a mock.

use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Positional arguments, keyword arguments and whether a block was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: SmallVec<[Value; 4]>,
    pub keywords: Map<String, Value>,
    pub block: bool,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keywords.insert(name.into(), value.into());
        self
    }

    pub fn with_block(mut self) -> Self {
        self.block = true;
        self
    }

    /// Positional argument `index`, `Value::Null` when absent (an omitted optional).
    pub fn get(&self, index: usize) -> &Value {
        self.positional.get(index).unwrap_or(&Value::Null)
    }

    pub fn keyword_value(&self, name: &str) -> Option<&Value> {
        self.keywords.get(name)
    }

    /// Keywords passed to a method that takes none arrive as a trailing hash.
    pub(crate) fn fold_keywords(&mut self) {
        if !self.keywords.is_empty() {
            let hash = std::mem::take(&mut self.keywords);
            self.positional.push(Value::Object(hash));
        }
    }
}

impl From<Vec<Value>> for CallArgs {
    fn from(values: Vec<Value>) -> Self {
        Self::positional(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_defaults() {
        let args = CallArgs::new().arg("foo").keyword("limit", 3).with_block();
        assert_eq!(args.get(0), &json!("foo"));
        assert_eq!(args.get(1), &Value::Null);
        assert_eq!(args.keyword_value("limit"), Some(&json!(3)));
        assert!(args.block);
    }

    #[test]
    fn test_fold_keywords_into_trailing_hash() {
        let mut args = CallArgs::positional(["a"]).keyword("b", 1);
        args.fold_keywords();
        assert!(args.keywords.is_empty());
        assert_eq!(args.positional.as_slice(), &[json!("a"), json!({"b": 1})]);
    }
}
