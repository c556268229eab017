//! Engine error types
//!
//! [`MapperError`] is surfaced to the caller. [`SkipReason`] never is: it
//! describes a single field that a fill left untouched.

use kvmap_types::{AccessError, DateParseError, MappingError, TypeTag};
use thiserror::Error;

/// Fatal mapping errors
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("type `{type_name}` exposes no reflectable schema")]
    UnmappableType { type_name: String },

    #[error("invalid mapping: {0}")]
    InvalidMapping(#[from] MappingError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mapping operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Why a fill left a field untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("unknown field `{field}`")]
    UnknownField { field: String },

    #[error("field `{field}` expects {expected}, got {}", TypeTag::label_of(.found.as_ref()))]
    TypeMismatch {
        field: String,
        expected: TypeTag,
        found: Option<TypeTag>,
    },

    #[error("field `{field}`: {source}")]
    DateParseFailure {
        field: String,
        source: DateParseError,
    },

    #[error("field `{field}` rejected the assignment: {source}")]
    AccessorRejection { field: String, source: AccessError },
}

impl SkipReason {
    pub fn field(&self) -> &str {
        match self {
            SkipReason::UnknownField { field }
            | SkipReason::TypeMismatch { field, .. }
            | SkipReason::DateParseFailure { field, .. }
            | SkipReason::AccessorRejection { field, .. } => field,
        }
    }
}
