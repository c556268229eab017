//! Type registry
//!
//! Turns a type's [`TypeSchema`] chain into a flattened [`TypeDescriptor`]
//! and caches it for the lifetime of the registry. Schemas are immutable, so
//! entries are never invalidated.

use crate::error::{MapperError, MapperResult};
use dashmap::DashMap;
use kvmap_types::{FieldDescriptor, Reflect, StaticSchema, TypeKey, TypeSchema, TypeTag};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Flattened, reflectable view of a type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: String,
    key: TypeKey,
    /// Own readable fields first, then non-shadowed inherited ones
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    /// Nearest parent first, root last
    ancestors: Vec<Arc<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Merge a schema's own fields over its parent's descriptor
    fn merge(schema: TypeSchema, parent: Option<&Arc<TypeDescriptor>>) -> Self {
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(schema.fields.len());
        let mut index = HashMap::new();

        // Every own declaration shadows the parent's, readable or not
        let shadowed: HashSet<String> = schema.fields.iter().map(|f| f.name.clone()).collect();
        let inherited = parent
            .map(|p| p.fields.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|f| !shadowed.contains(&f.name))
            .cloned();

        for field in schema.fields.into_iter().chain(inherited) {
            if !field.is_readable() || index.contains_key(&field.name) {
                continue;
            }
            index.insert(field.name.clone(), fields.len());
            fields.push(field);
        }

        let ancestors = match parent {
            Some(parent) => std::iter::once(Arc::clone(parent))
                .chain(parent.ancestors.iter().cloned())
                .collect(),
            None => Vec::new(),
        };

        Self {
            name: schema.name,
            key: schema.key,
            fields,
            index,
            ancestors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn ancestors(&self) -> &[Arc<TypeDescriptor>] {
        &self.ancestors
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn field_type(&self, name: &str) -> Option<&TypeTag> {
        self.field(name).map(|f| &f.declared_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read-through descriptor cache keyed by type identity.
///
/// Concurrent lookups are safe; two threads racing on the same type may both
/// build a descriptor, but only the first insert is kept and returned.
///
/// Descriptors of [`TypeKey::Dynamic`] schemas are cached only when dynamic
/// caching is on. Every `DynamicSchema` has its own key, so a long-lived
/// registry that caches them grows with each schema built.
#[derive(Debug)]
pub struct TypeRegistry {
    descriptors: DashMap<TypeKey, Arc<TypeDescriptor>>,
    cache_dynamic: bool,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
            cache_dynamic: true,
        }
    }

    pub fn with_dynamic_caching(mut self, enabled: bool) -> Self {
        self.cache_dynamic = enabled;
        self
    }

    pub fn caches_dynamic(&self) -> bool {
        self.cache_dynamic
    }

    /// Process-wide registry. Dynamic schemas are described but not cached.
    pub fn global() -> Arc<TypeRegistry> {
        Arc::clone(
            GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new().with_dynamic_caching(false))),
        )
    }

    /// Descriptor for the runtime type of `object`
    pub fn describe<T: Reflect + ?Sized>(&self, object: &T) -> MapperResult<Arc<TypeDescriptor>> {
        if let Some(cached) = self.cached(&object.type_key()) {
            return Ok(cached);
        }

        let schema = object
            .type_schema()
            .ok_or_else(|| MapperError::UnmappableType {
                type_name: object.type_name().to_string(),
            })?;
        Ok(self.build(schema))
    }

    /// Descriptor for a statically known type, no instance needed
    pub fn describe_type<T: StaticSchema + 'static>(&self) -> Arc<TypeDescriptor> {
        match self.cached(&TypeKey::of::<T>()) {
            Some(cached) => cached,
            None => self.build(T::static_schema()),
        }
    }

    /// Reflectable fields of `object`'s type, inherited ones included
    pub fn fields<T: Reflect + ?Sized>(&self, object: &T) -> MapperResult<Vec<FieldDescriptor>> {
        Ok(self.describe(object)?.fields().to_vec())
    }

    pub fn fields_of<T: StaticSchema + 'static>(&self) -> Vec<FieldDescriptor> {
        self.describe_type::<T>().fields().to_vec()
    }

    pub fn field_names<T: Reflect + ?Sized>(&self, object: &T) -> MapperResult<Vec<String>> {
        Ok(self
            .describe(object)?
            .field_names()
            .map(str::to_string)
            .collect())
    }

    /// Number of cached descriptors
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&self) {
        self.descriptors.clear();
    }

    pub fn is_cached(&self, key: &TypeKey) -> bool {
        self.descriptors.contains_key(key)
    }

    /// Drop the cached descriptor for `key`, if any
    pub fn forget(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.remove(key).map(|(_, descriptor)| descriptor)
    }

    fn cached(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        self.descriptors.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Build descriptors from the root of the chain down to `schema`
    fn build(&self, schema: TypeSchema) -> Arc<TypeDescriptor> {
        let mut parents: Vec<TypeSchema> = Vec::new();
        let mut seen = HashSet::from([schema.key]);
        let mut next = schema.ancestor;
        let mut cyclic = false;

        while let Some(ancestor) = next {
            let parent = ancestor();
            if !seen.insert(parent.key) {
                warn!(
                    type_name = %schema.name,
                    ancestor = %parent.name,
                    "Cyclic ancestor chain, stopping walk; ancestors left uncached"
                );
                cyclic = true;
                break;
            }
            next = parent.ancestor;
            parents.push(parent);
        }

        // A cut chain is only valid as seen from `schema`
        let mut above: Option<Arc<TypeDescriptor>> = None;
        for parent in parents.into_iter().rev() {
            above = Some(if cyclic {
                Arc::new(TypeDescriptor::merge(parent, above.as_ref()))
            } else {
                self.cached_or_merge(parent, above.as_ref())
            });
        }
        self.cached_or_merge(schema, above.as_ref())
    }

    fn cached_or_merge(
        &self,
        schema: TypeSchema,
        parent: Option<&Arc<TypeDescriptor>>,
    ) -> Arc<TypeDescriptor> {
        match self.cached(&schema.key) {
            Some(cached) => cached,
            None => self.insert(TypeDescriptor::merge(schema, parent)),
        }
    }

    fn insert(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        if !self.cache_dynamic && matches!(descriptor.key, TypeKey::Dynamic(_)) {
            return Arc::new(descriptor);
        }
        debug!(
            type_name = %descriptor.name,
            fields = descriptor.fields.len(),
            ancestors = descriptor.ancestors.len(),
            "Cached type descriptor"
        );
        let entry = self
            .descriptors
            .entry(descriptor.key)
            .or_insert_with(|| Arc::new(descriptor));
        Arc::clone(entry.value())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
