//! Best-effort field access by name

use crate::error::MapperResult;
use crate::registry::TypeRegistry;
use kvmap_types::{AccessError, Reflect, Value, ValueMapping};
use tracing::debug;

/// Result of a single assignment
#[derive(Debug, Clone, PartialEq)]
pub enum SetOutcome {
    Applied,
    Ignored(AccessError),
}

impl SetOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SetOutcome::Applied)
    }
}

/// Current value of a readable field; `None` for unknown, unreadable or null
pub fn get<T: Reflect + ?Sized>(object: &T, field: &str) -> Option<Value> {
    object.get(field).filter(|value| !value.is_null())
}

/// Assign a field, turning a rejection into [`SetOutcome::Ignored`]
pub fn set<T: Reflect + ?Sized>(object: &mut T, field: &str, value: Value) -> SetOutcome {
    match object.set(field, value) {
        Ok(()) => SetOutcome::Applied,
        Err(error) => {
            debug!(
                type_name = object.type_name(),
                field,
                error = %error,
                "Assignment ignored"
            );
            SetOutcome::Ignored(error)
        }
    }
}

/// Dictionary representation of an object.
///
/// One entry per reflectable field, in descriptor order. Absent values are
/// kept as `Value::Null` so the key set always matches the field set.
pub fn snapshot<T: Reflect + ?Sized>(
    registry: &TypeRegistry,
    object: &T,
) -> MapperResult<ValueMapping> {
    let descriptor = registry.describe(object)?;
    let mut mapping = ValueMapping::with_capacity(descriptor.len());
    for field in descriptor.fields() {
        let value = object.get(&field.name).unwrap_or(Value::Null);
        mapping.insert(field.name.clone(), value);
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvmap_types::{reflect_struct, TypeTag};

    #[derive(Debug, Default)]
    struct Profile {
        handle: String,
        bio: Option<String>,
        karma: i64,
        token: String,
    }

    reflect_struct!(Profile {
        handle: readonly,
        bio,
        karma,
        token: writeonly,
    });

    #[test]
    fn get_treats_null_as_absent() {
        let profile = Profile {
            handle: "alice".into(),
            ..Profile::default()
        };
        assert_eq!(get(&profile, "handle"), Some(Value::from("alice")));
        assert_eq!(get(&profile, "bio"), None);
        assert_eq!(get(&profile, "token"), None);
        assert_eq!(get(&profile, "missing"), None);
    }

    #[test]
    fn set_ignores_rejections() {
        let mut profile = Profile::default();
        assert!(set(&mut profile, "karma", Value::from(10)).is_applied());
        assert_eq!(profile.karma, 10);

        let outcome = set(&mut profile, "karma", Value::from("lots"));
        assert_eq!(
            outcome,
            SetOutcome::Ignored(AccessError::TypeMismatch {
                field: "karma".into(),
                expected: TypeTag::Integer,
                found: Some(TypeTag::String),
            })
        );
        assert_eq!(profile.karma, 10);

        assert!(!set(&mut profile, "handle", Value::from("bob")).is_applied());
        assert!(!set(&mut profile, "nope", Value::Null).is_applied());
    }

    #[test]
    fn set_through_trait_object() {
        let mut boxed: Box<dyn Reflect> = Box::new(Profile::default());
        assert!(set(boxed.as_mut(), "token", Value::from("t")).is_applied());
        let profile = boxed
            .as_any()
            .downcast_ref::<Profile>()
            .expect("boxed profile");
        assert_eq!(profile.token, "t");
    }

    #[test]
    fn snapshot_covers_every_readable_field() {
        let registry = TypeRegistry::new();
        let profile = Profile {
            handle: "alice".into(),
            bio: None,
            karma: 3,
            token: "secret".into(),
        };
        let mapping = snapshot(&registry, &profile).unwrap();

        let keys: Vec<&str> = mapping.keys().collect();
        assert_eq!(keys, vec!["handle", "bio", "karma"]);
        assert_eq!(mapping.get("bio"), Some(&Value::Null));
        assert_eq!(mapping.get("karma"), Some(&Value::Integer(3)));
    }
}
