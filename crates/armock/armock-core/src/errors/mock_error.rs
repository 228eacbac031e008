//! Errors raised by synthesized mock classes and instances.

use super::error_code::{self, ArmockErrorCode};

/// Errors surfaced to test code calling into a mock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("mass assignment is disabled for {class}; set attributes individually")]
    MassAssignmentDisabled { class: String },

    #[error("unknown attribute '{name}' for {class}")]
    UnknownAttribute { name: String, class: String },

    #[error("wrong number of arguments calling {method} (given {given}, expected {expected})")]
    WrongArity {
        method: String,
        given: usize,
        expected: String,
    },

    #[error("missing keyword{} calling {method}: {}", plural(keywords), symbols(keywords))]
    MissingKeywords { method: String, keywords: Vec<String> },

    #[error("unknown keyword{} calling {method}: {}", plural(keywords), symbols(keywords))]
    UnknownKeywords { method: String, keywords: Vec<String> },

    #[error("{method} is not Implemented for Class: {class}")]
    NotImplemented { method: String, class: String },

    #[error("undefined method '{name}' for {class}")]
    NoMethod { name: String, class: String },
}

impl MockError {
    /// True for every variant a Ruby caller would see as `ArgumentError`.
    pub fn is_argument_error(&self) -> bool {
        self.error_code() == error_code::ARGUMENT_ERROR
    }
}

impl ArmockErrorCode for MockError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotImplemented { .. } => error_code::NOT_IMPLEMENTED,
            Self::NoMethod { .. } => error_code::NO_METHOD,
            _ => error_code::ARGUMENT_ERROR,
        }
    }
}

fn plural(items: &[String]) -> &'static str {
    if items.len() == 1 {
        ""
    } else {
        "s"
    }
}

fn symbols(items: &[String]) -> String {
    items
        .iter()
        .map(|k| format!(":{k}"))
        .collect::<Vec<_>>()
        .join(", ")
}
