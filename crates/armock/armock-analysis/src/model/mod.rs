//! Model definitions: a Ruby class body → method signatures and associations.

pub mod extractor;
pub mod reader;
pub mod types;

pub use extractor::extract_model;
pub use reader::ModelReader;
pub use types::{
    MethodScope, MethodSignature, ModelMetadata, Parameter, ParameterKind,
    RelationshipDescriptor, RelationshipKind,
};
