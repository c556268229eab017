//! kvmap Types - Type model for reflective object mapping
//!
//! This crate holds everything a type needs in order to take part in
//! mapping, without pulling in the engine:
//!
//! - **TypeTag**: Closed set of declared field types
//! - **Value**: Runtime-typed values, with an explicit `Null` marker
//! - **FieldDescriptor / TypeSchema**: What a type declares about itself
//! - **Reflect**: The accessor protocol (schema, get, set)
//! - **ValueMapping**: Insertion-ordered string-keyed input to a fill
//! - **DateParser**: String → date parsing for the enumerated formats
//!
//! ## Static and dynamic schemas
//!
//! Compiled types describe themselves through [`reflect_struct!`], which
//! generates a [`StaticSchema`] and a [`Reflect`] impl with a per-field
//! dispatch table. Data whose shape is only known at runtime uses
//! [`DynamicSchema`] and [`DynamicObject`].

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod date;
pub mod dynamic;
pub mod error;
pub mod field;
mod macros;
pub mod mapping;
pub mod schema;
pub mod tag;
pub mod value;

// Re-exports
pub use date::{ChronoDateParser, DateFormat, DateParseError, DateParser};
pub use dynamic::{DynamicObject, DynamicSchema};
pub use error::{AccessError, MappingError};
pub use field::{FieldAccess, FieldDescriptor};
pub use mapping::ValueMapping;
pub use schema::{field_tag, Reflect, StaticSchema, TypeKey, TypeSchema};
pub use tag::TypeTag;
pub use value::{FieldValue, ObjectRef, Value};
