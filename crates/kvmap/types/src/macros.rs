//! Schema generation for plain structs

/// Implement [`StaticSchema`](crate::StaticSchema) and
/// [`Reflect`](crate::Reflect) for a struct.
///
/// Every listed field must implement [`FieldValue`](crate::FieldValue).
/// A field may carry an access mode (`readonly` or `writeonly`). A parent
/// type is embedded as a field and named with `extends`; unknown names are
/// forwarded to it, and the parent's fields appear as inherited fields.
///
/// ```
/// use kvmap_types::{reflect_struct, Reflect, Value};
///
/// #[derive(Default)]
/// struct Entity {
///     id: i64,
/// }
///
/// #[derive(Default)]
/// struct User {
///     base: Entity,
///     name: String,
///     age: i64,
/// }
///
/// reflect_struct!(Entity { id: readonly });
/// reflect_struct!(User extends base: Entity { name, age });
///
/// let mut user = User::default();
/// user.set("name", Value::from("alice")).unwrap();
/// assert_eq!(user.get("id"), Some(Value::Integer(0)));
/// assert!(user.set("id", Value::from(1)).is_err());
/// ```
#[macro_export]
macro_rules! reflect_struct {
    (@access) => { $crate::FieldAccess::ReadWrite };
    (@access readonly) => { $crate::FieldAccess::ReadOnly };
    (@access writeonly) => { $crate::FieldAccess::WriteOnly };

    (@ancestor) => { None };
    (@ancestor $parent:ty) => {
        Some(<$parent as $crate::StaticSchema>::static_schema as fn() -> $crate::TypeSchema)
    };

    (@get $this:ident, $ty:ident, $field:ident) => {
        Some($crate::FieldValue::to_value(&$this.$field))
    };
    (@get $this:ident, $ty:ident, $field:ident, readonly) => {
        Some($crate::FieldValue::to_value(&$this.$field))
    };
    (@get $this:ident, $ty:ident, $field:ident, writeonly) => {
        None
    };

    (@set $this:ident, $ty:ident, $field:ident, $value:ident, readonly) => {
        Err($crate::AccessError::ReadOnly {
            field: stringify!($field).to_string(),
        })
    };
    (@set $this:ident, $ty:ident, $field:ident, $value:ident $(, writeonly)?) => {
        match $crate::FieldValue::from_value($value) {
            Ok(accepted) => {
                $this.$field = accepted;
                Ok(())
            }
            Err(rejected) => Err($crate::AccessError::TypeMismatch {
                field: stringify!($field).to_string(),
                expected: $crate::field_tag::<$ty, _>(|s| &s.$field),
                found: rejected.type_tag(),
            }),
        }
    };

    (@get_rest $this:ident, $name:ident) => { None };
    (@get_rest $this:ident, $name:ident, $base:ident) => {
        $crate::Reflect::get(&$this.$base, $name)
    };

    (@set_rest $this:ident, $name:ident, $value:ident) => {{
        let _ = $value;
        Err($crate::AccessError::UnknownField {
            field: $name.to_string(),
        })
    }};
    (@set_rest $this:ident, $name:ident, $value:ident, $base:ident) => {
        $crate::Reflect::set(&mut $this.$base, $name, $value)
    };

    (
        $ty:ident $(extends $base:ident : $parent:ty)? {
            $( $field:ident $(: $access:ident)? ),* $(,)?
        }
    ) => {
        impl $crate::StaticSchema for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn static_schema() -> $crate::TypeSchema {
                $crate::TypeSchema {
                    name: stringify!($ty).to_string(),
                    key: $crate::TypeKey::of::<$ty>(),
                    fields: vec![
                        $(
                            $crate::FieldDescriptor::new(
                                stringify!($field),
                                $crate::field_tag::<$ty, _>(|s| &s.$field),
                                $crate::reflect_struct!(@access $($access)?),
                            ),
                        )*
                    ],
                    ancestor: $crate::reflect_struct!(@ancestor $($parent)?),
                }
            }
        }

        impl $crate::Reflect for $ty {
            fn type_name(&self) -> &str {
                stringify!($ty)
            }

            fn type_schema(&self) -> Option<$crate::TypeSchema> {
                Some(<$ty as $crate::StaticSchema>::static_schema())
            }

            fn get(&self, name: &str) -> Option<$crate::Value> {
                match name {
                    $(
                        stringify!($field) => {
                            $crate::reflect_struct!(@get self, $ty, $field $(, $access)?)
                        }
                    )*
                    _ => $crate::reflect_struct!(@get_rest self, name $(, $base)?),
                }
            }

            fn set(
                &mut self,
                name: &str,
                value: $crate::Value,
            ) -> Result<(), $crate::AccessError> {
                match name {
                    $(
                        stringify!($field) => {
                            $crate::reflect_struct!(@set self, $ty, $field, value $(, $access)?)
                        }
                    )*
                    _ => $crate::reflect_struct!(@set_rest self, name, value $(, $base)?),
                }
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }
    };
}
