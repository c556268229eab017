//! Runtime-defined schemas for externally sourced data

use crate::error::AccessError;
use crate::field::{FieldAccess, FieldDescriptor};
use crate::schema::{Reflect, TypeKey, TypeSchema};
use crate::tag::TypeTag;
use crate::value::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// A schema assembled at runtime.
///
/// Every schema gets a fresh [`TypeKey::Dynamic`] on creation, so two
/// schemas with the same name never share a cached descriptor. Share a
/// schema between objects through `Arc`.
#[derive(Debug)]
pub struct DynamicSchema {
    id: u64,
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl DynamicSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a read-write field
    pub fn field(self, name: impl Into<String>, declared_type: TypeTag) -> Self {
        self.field_with_access(name, declared_type, FieldAccess::ReadWrite)
    }

    pub fn field_with_access(
        mut self,
        name: impl Into<String>,
        declared_type: TypeTag,
        access: FieldAccess,
    ) -> Self {
        self.fields
            .push(FieldDescriptor::new(name, declared_type, access));
        self
    }

    pub fn key(&self) -> TypeKey {
        TypeKey::Dynamic(self.id)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_type_schema(&self) -> TypeSchema {
        TypeSchema {
            name: self.name.clone(),
            key: self.key(),
            fields: self.fields.clone(),
            ancestor: None,
        }
    }
}

/// An object whose fields are described by a [`DynamicSchema`].
///
/// Values are checked against the declared type on `set`; a `Unknown`
/// declaration accepts anything, and `Null` clears the field.
#[derive(Debug, Clone)]
pub struct DynamicObject {
    schema: Arc<DynamicSchema>,
    values: HashMap<String, Value>,
}

impl DynamicObject {
    pub fn new(schema: Arc<DynamicSchema>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Arc<DynamicSchema> {
        &self.schema
    }

    /// Current value regardless of access mode
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Store a value without access or type checks, for seeding read-only fields
    pub fn seed(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }
}

impl Reflect for DynamicObject {
    fn type_key(&self) -> TypeKey {
        self.schema.key()
    }

    fn type_name(&self) -> &str {
        self.schema.name()
    }

    fn type_schema(&self) -> Option<TypeSchema> {
        Some(self.schema.to_type_schema())
    }

    fn get(&self, name: &str) -> Option<Value> {
        let field = self.schema.descriptor(name)?;
        if !field.is_readable() {
            return None;
        }
        Some(self.values.get(name).cloned().unwrap_or(Value::Null))
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), AccessError> {
        let field = self
            .schema
            .descriptor(name)
            .ok_or_else(|| AccessError::UnknownField {
                field: name.to_string(),
            })?;

        if !field.is_writable() {
            return Err(AccessError::ReadOnly {
                field: name.to_string(),
            });
        }

        if value.is_null() {
            self.values.remove(name);
            return Ok(());
        }

        let found = value.type_tag();
        if field.declared_type != TypeTag::Unknown && found.as_ref() != Some(&field.declared_type) {
            return Err(AccessError::TypeMismatch {
                field: name.to_string(),
                expected: field.declared_type.clone(),
                found,
            });
        }

        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
