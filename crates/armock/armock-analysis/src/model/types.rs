//! Method signatures, relationship descriptors and the per-model metadata.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::parsers::types::OptionMap;

/// Structural kind of one declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// `a`
    Required,
    /// `a = 1`
    Optional,
    /// `*rest`
    Rest,
    /// `key:`
    KeywordRequired,
    /// `key: 1`
    Keyword,
    /// `**opts`
    KeywordRest,
    /// `&block`
    Block,
}

impl ParameterKind {
    /// Ruby's `Method#parameters` tag.
    pub fn ruby_tag(self) -> &'static str {
        match self {
            Self::Required => "req",
            Self::Optional => "opt",
            Self::Rest => "rest",
            Self::KeywordRequired => "keyreq",
            Self::Keyword => "key",
            Self::KeywordRest => "keyrest",
            Self::Block => "block",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(self, Self::KeywordRequired | Self::Keyword | Self::KeywordRest)
    }
}

/// One parameter: kind, name and the default's source text if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub kind: ParameterKind,
    pub name: String,
    pub default: Option<String>,
}

impl Parameter {
    pub fn new(kind: ParameterKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(kind: ParameterKind, name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            default: Some(default.into()),
        }
    }
}

/// Whether a method is called on the class or on its instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodScope {
    Class,
    Instance,
}

impl MethodScope {
    /// `::name` for class methods, `#name` for instance methods.
    pub fn qualify(self, name: &str) -> String {
        match self {
            Self::Class => format!("::{name}"),
            Self::Instance => format!("#{name}"),
        }
    }
}

/// Name plus ordered parameter list of a declared method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: SmallVec<[Parameter; 4]>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            name: name.into(),
            parameters: parameters.into_iter().collect(),
        }
    }

    /// A method taking no arguments.
    pub fn nullary(name: impl Into<String>) -> Self {
        Self::new(name, [])
    }

    fn count(&self, kind: ParameterKind) -> usize {
        self.parameters.iter().filter(|p| p.kind == kind).count()
    }

    pub fn required_count(&self) -> usize {
        self.count(ParameterKind::Required)
    }

    pub fn optional_count(&self) -> usize {
        self.count(ParameterKind::Optional)
    }

    pub fn has_rest(&self) -> bool {
        self.count(ParameterKind::Rest) > 0
    }

    pub fn has_keyword_rest(&self) -> bool {
        self.count(ParameterKind::KeywordRest) > 0
    }

    /// True when the method declares any keyword parameter.
    pub fn accepts_keywords(&self) -> bool {
        self.parameters.iter().any(|p| p.kind.is_keyword())
    }

    pub fn required_keywords(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.kind == ParameterKind::KeywordRequired)
            .map(|p| p.name.as_str())
    }

    /// Declared keyword names, required or optional.
    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| matches!(p.kind, ParameterKind::KeywordRequired | ParameterKind::Keyword))
            .map(|p| p.name.as_str())
    }

    /// `[(tag, name)]` pairs in Ruby's `Method#parameters` vocabulary.
    pub fn ruby_parameters(&self) -> Vec<(&'static str, &str)> {
        self.parameters
            .iter()
            .map(|p| (p.kind.ruby_tag(), p.name.as_str()))
            .collect()
    }

    /// Ruby's `Method#arity`: required count, negated minus one when the
    /// method also takes optional arguments.
    pub fn arity(&self) -> i32 {
        let required = self.required_count() as i32
            + i32::from(self.required_keywords().next().is_some());
        let optional = self.optional_count() > 0
            || self.has_rest()
            || (self.required_keywords().next().is_none()
                && (self.count(ParameterKind::Keyword) > 0 || self.has_keyword_rest()));
        if optional {
            -required - 1
        } else {
            required
        }
    }
}

/// Association macro kinds, in the order their descriptors are flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    BelongsTo,
    HasOne,
    HasMany,
    HasAndBelongsToMany,
}

impl RelationshipKind {
    pub fn from_macro(name: &str) -> Option<Self> {
        match name {
            "belongs_to" => Some(Self::BelongsTo),
            "has_one" => Some(Self::HasOne),
            "has_many" => Some(Self::HasMany),
            "has_and_belongs_to_many" => Some(Self::HasAndBelongsToMany),
            _ => None,
        }
    }

    /// Collection associations read back as arrays.
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::HasAndBelongsToMany)
    }
}

/// A declared association such as `belongs_to :account`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDescriptor {
    pub kind: RelationshipKind,
    pub name: String,
    pub options: OptionMap,
}

/// Everything the synthesizer needs to know about one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub class_name: String,
    pub superclass: Option<String>,
    /// Explicit `self.table_name = "..."`, if the model sets one.
    pub table_name: Option<String>,
    pub class_methods: Vec<MethodSignature>,
    pub instance_methods: Vec<MethodSignature>,
    pub relationships: Vec<RelationshipDescriptor>,
    pub content_hash: u64,
}

impl ModelMetadata {
    pub fn instance_method(&self, name: &str) -> Option<&MethodSignature> {
        self.instance_methods.iter().find(|m| m.name == name)
    }

    pub fn class_method(&self, name: &str) -> Option<&MethodSignature> {
        self.class_methods.iter().find(|m| m.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Relationships grouped by kind, kinds in flattening order.
    pub fn relationships_by_kind(&self) -> Vec<(RelationshipKind, Vec<&RelationshipDescriptor>)> {
        let mut groups: Vec<(RelationshipKind, Vec<&RelationshipDescriptor>)> = Vec::new();
        for rel in &self.relationships {
            match groups.iter_mut().find(|(kind, _)| *kind == rel.kind) {
                Some((_, members)) => members.push(rel),
                None => groups.push((rel.kind, vec![rel])),
            }
        }
        groups
    }
}
