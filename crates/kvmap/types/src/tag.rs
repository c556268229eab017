//! Declared field types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a reflectable field.
///
/// The set is closed: anything that is not a scalar or a reference to
/// another described type is `Unknown` and never accepts a value during a
/// fill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Integer,
    FloatingPoint,
    Boolean,
    String,
    Date,
    /// Reference to another described type, by type name
    Reference(String),
    Unknown,
}

impl TypeTag {
    /// Create a reference tag for the named type
    pub fn reference(type_name: impl Into<String>) -> Self {
        Self::Reference(type_name.into())
    }

    /// Whether this tag names a scalar type
    pub fn is_scalar(&self) -> bool {
        !matches!(self, TypeTag::Reference(_) | TypeTag::Unknown)
    }

    /// Human-readable label for an optional runtime tag (`None` is null)
    pub fn label_of(tag: Option<&TypeTag>) -> String {
        match tag {
            Some(tag) => tag.to_string(),
            None => "null".to_string(),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Integer => write!(f, "Integer"),
            TypeTag::FloatingPoint => write!(f, "FloatingPoint"),
            TypeTag::Boolean => write!(f, "Boolean"),
            TypeTag::String => write!(f, "String"),
            TypeTag::Date => write!(f, "Date"),
            TypeTag::Reference(name) => write!(f, "Reference({})", name),
            TypeTag::Unknown => write!(f, "Unknown"),
        }
    }
}
