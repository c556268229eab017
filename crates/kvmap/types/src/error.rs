//! Error types for the accessor protocol and mapping input

use crate::tag::TypeTag;
use thiserror::Error;

/// Why an object rejected an assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("field `{field}` is read-only")]
    ReadOnly { field: String },

    #[error("field `{field}` expects {expected}, got {}", TypeTag::label_of(.found.as_ref()))]
    TypeMismatch {
        field: String,
        expected: TypeTag,
        found: Option<TypeTag>,
    },
}

impl AccessError {
    pub fn field(&self) -> &str {
        match self {
            AccessError::UnknownField { field }
            | AccessError::ReadOnly { field }
            | AccessError::TypeMismatch { field, .. } => field,
        }
    }
}

/// Malformed mapping input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("expected a JSON object, got {found}")]
    NotAnObject { found: &'static str },
}
