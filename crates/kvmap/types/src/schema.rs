//! Type schemas and the reflective accessor protocol

use crate::error::AccessError;
use crate::field::FieldDescriptor;
use crate::tag::TypeTag;
use crate::value::{FieldValue, Value};
use std::any::{Any, TypeId};

/// Identity of a described type, used as the descriptor cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// A compiled Rust type
    Static(TypeId),
    /// A schema built at runtime, see [`crate::DynamicSchema`]
    Dynamic(u64),
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey::Static(TypeId::of::<T>())
    }
}

/// What a type declares about itself: its own fields and its parent.
///
/// Inherited fields are not repeated here; the registry walks `ancestor`
/// to collect them.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    pub name: String,
    pub key: TypeKey,
    /// Own fields, in declaration order
    pub fields: Vec<FieldDescriptor>,
    pub ancestor: Option<fn() -> TypeSchema>,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>, key: TypeKey) -> Self {
        Self {
            name: name.into(),
            key,
            fields: Vec::new(),
            ancestor: None,
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_ancestor(mut self, ancestor: fn() -> TypeSchema) -> Self {
        self.ancestor = Some(ancestor);
        self
    }
}

/// Schema available without an instance.
pub trait StaticSchema {
    const TYPE_NAME: &'static str;

    fn static_schema() -> TypeSchema;
}

/// The reflective accessor protocol.
///
/// `get` returns `None` when the name is unknown or not readable. `set`
/// rejects with an [`AccessError`] instead of panicking; callers decide
/// whether a rejection matters.
pub trait Reflect: Any {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// `None` for opaque types that expose no field list
    fn type_schema(&self) -> Option<TypeSchema>;

    fn get(&self, name: &str) -> Option<Value>;

    fn set(&mut self, name: &str, value: Value) -> Result<(), AccessError>;

    fn as_any(&self) -> &dyn Any;
}

/// Declared type of a struct field, resolved through its projection.
#[doc(hidden)]
pub fn field_tag<S, T: FieldValue>(_project: fn(&S) -> &T) -> TypeTag {
    T::type_tag()
}
