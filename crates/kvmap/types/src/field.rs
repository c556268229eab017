//! Field descriptors

use crate::tag::TypeTag;
use serde::{Deserialize, Serialize};

/// Which accessor halves a field exposes.
///
/// Only readable fields are reflectable; write-only fields are declared but
/// never take part in mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldAccess {
    #[default]
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl FieldAccess {
    pub fn is_readable(&self) -> bool {
        !matches!(self, FieldAccess::WriteOnly)
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, FieldAccess::ReadOnly)
    }
}

/// A declared field: name, declared type and access.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeTag,
    #[serde(default)]
    pub access: FieldAccess,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeTag, access: FieldAccess) -> Self {
        Self {
            name: name.into(),
            declared_type,
            access,
        }
    }

    /// Create a read-write field
    pub fn read_write(name: impl Into<String>, declared_type: TypeTag) -> Self {
        Self::new(name, declared_type, FieldAccess::ReadWrite)
    }

    pub fn is_readable(&self) -> bool {
        self.access.is_readable()
    }

    pub fn is_writable(&self) -> bool {
        self.access.is_writable()
    }
}
