//! Tree-sitter Ruby front-end shared by the schema and model extractors.
//!
//! Sources are parsed, never evaluated: downstream walkers only recognize a
//! declarative subset of Ruby (calls, literals, `def`, `class`, `module`).

pub mod error_tolerant;
pub mod nodes;
pub mod ruby;
pub mod types;

pub use ruby::{parse_ruby, ParsedSource};
pub use types::{OptionMap, OptionValue};
