//! kvmap Engine - Reflective object/dictionary mapping
//!
//! This crate drives the [`kvmap_types`] protocol to move values into live
//! objects:
//!
//! - **TypeRegistry**: Collects a type's reflectable fields, inherited ones
//!   included, and caches the result per type
//! - **accessor**: Best-effort get/set by field name, plus snapshots
//! - **Coercer**: Decides whether a value fits a declared type (identity,
//!   or string → date)
//! - **Mapper**: Fills an object from a string-keyed mapping
//! - **PeerCopier**: Copies a model's values into the widgets of a view whose
//!   child names share a prefix with the model's field names
//!
//! ## Best effort
//!
//! Unknown keys, type mismatches, unparsable dates and rejected assignments
//! never abort a fill. They are logged, recorded in the returned report, and
//! the remaining keys are still applied. The only surfaced failure is a type
//! that exposes no schema at all.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod accessor;
pub mod coerce;
pub mod config;
pub mod error;
pub mod filler;
pub mod peer;
pub mod registry;

// Re-exports
pub use accessor::SetOutcome;
pub use coerce::{Coercer, Coercion};
pub use config::MapperConfig;
pub use error::{MapperError, MapperResult, SkipReason};
pub use filler::{fill, FillReport, Mapper};
pub use peer::{
    ChildSlot, PeerCopier, PeerCopyReport, SlotOutcome, ViewContainer, WidgetAttributeTable,
};
pub use registry::{TypeDescriptor, TypeRegistry};

pub use kvmap_types::{
    reflect_struct, AccessError, DateFormat, DateParser, DynamicObject, DynamicSchema,
    FieldAccess, FieldDescriptor, Reflect, StaticSchema, TypeKey, TypeSchema, TypeTag, Value,
    ValueMapping,
};
