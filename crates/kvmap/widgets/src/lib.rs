//! kvmap Widgets - Headless widget models for peer copying
//!
//! Plain data stand-ins for toolkit widgets. Each exposes its value
//! attribute through [`Reflect`](kvmap_types::Reflect) under the name the
//! default [`WidgetAttributeTable`](kvmap_engine::WidgetAttributeTable)
//! expects, and [`WidgetView`] arranges them into named slots that a
//! [`PeerCopier`](kvmap_engine::PeerCopier) can fill.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod view;
pub mod widgets;

// Re-exports
pub use view::{ViewChild, WidgetView};
pub use widgets::{Button, Label, Slider, Switch, TextField};
