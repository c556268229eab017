//! Runtime values and the Rust-type ↔ value bridge

use crate::schema::StaticSchema;
use crate::tag::TypeTag;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a live object stored in a reference field.
#[derive(Clone)]
pub struct ObjectRef {
    type_name: Arc<str>,
    object: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, object: Arc<T>) -> Self {
        Self {
            type_name: type_name.into(),
            object,
        }
    }

    /// Name of the referenced type, as reported by its schema
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Recover the concrete object, if it is a `T`
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).downcast::<T>().ok()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        // Identity, not structural equality
        self.type_name == other.type_name
            && std::ptr::eq(
                Arc::as_ptr(&self.object) as *const (),
                Arc::as_ptr(&other.object) as *const (),
            )
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", self.type_name)
    }
}

/// A runtime-typed value.
///
/// `Null` is the explicit null marker; a key that is missing from a mapping
/// is a different thing and never produces a `Value` at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Date(DateTime<Utc>),
    Reference(ObjectRef),
    /// Arrays and objects from decoded JSON; never assignable to a field
    Composite(serde_json::Value),
}

impl Value {
    /// Runtime type of this value, `None` for `Null`
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Null => None,
            Value::Integer(_) => Some(TypeTag::Integer),
            Value::Float(_) => Some(TypeTag::FloatingPoint),
            Value::Boolean(_) => Some(TypeTag::Boolean),
            Value::String(_) => Some(TypeTag::String),
            Value::Date(_) => Some(TypeTag::Date),
            Value::Reference(object) => Some(TypeTag::reference(object.type_name())),
            Value::Composite(_) => Some(TypeTag::Unknown),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Convert a decoded JSON value.
    ///
    /// Integral numbers that fit `i64` become `Integer`, every other number
    /// becomes `Float`. Arrays and objects are kept as `Composite`.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            other => Value::Composite(other.clone()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

/// Bridge between a Rust field type and [`Value`].
///
/// `from_value` hands the value back on rejection so the caller can report
/// what it actually received.
pub trait FieldValue: Sized {
    /// Declared type of fields of this Rust type
    fn type_tag() -> TypeTag;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, Value>;
}

impl FieldValue for i64 {
    fn type_tag() -> TypeTag {
        TypeTag::Integer
    }

    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl FieldValue for i32 {
    fn type_tag() -> TypeTag {
        TypeTag::Integer
    }

    fn to_value(&self) -> Value {
        Value::Integer(*self as i64)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(n) => i32::try_from(n).map_err(|_| Value::Integer(n)),
            other => Err(other),
        }
    }
}

impl FieldValue for u32 {
    fn type_tag() -> TypeTag {
        TypeTag::Integer
    }

    fn to_value(&self) -> Value {
        Value::Integer(*self as i64)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Integer(n) => u32::try_from(n).map_err(|_| Value::Integer(n)),
            other => Err(other),
        }
    }
}

impl FieldValue for f64 {
    fn type_tag() -> TypeTag {
        TypeTag::FloatingPoint
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(n) => Ok(n),
            other => Err(other),
        }
    }
}

impl FieldValue for bool {
    fn type_tag() -> TypeTag {
        TypeTag::Boolean
    }

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(other),
        }
    }
}

impl FieldValue for String {
    fn type_tag() -> TypeTag {
        TypeTag::String
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(other),
        }
    }
}

impl FieldValue for DateTime<Utc> {
    fn type_tag() -> TypeTag {
        TypeTag::Date
    }

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Date(d) => Ok(d),
            other => Err(other),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn type_tag() -> TypeTag {
        T::type_tag()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T> FieldValue for Arc<T>
where
    T: StaticSchema + Any + Send + Sync,
{
    fn type_tag() -> TypeTag {
        TypeTag::reference(T::TYPE_NAME)
    }

    fn to_value(&self) -> Value {
        Value::Reference(ObjectRef::new(T::TYPE_NAME, Arc::clone(self)))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Reference(object) => match object.downcast::<T>() {
                Some(inner) => Ok(inner),
                None => Err(Value::Reference(object)),
            },
            other => Err(other),
        }
    }
}
