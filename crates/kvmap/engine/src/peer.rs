//! Peer copying between a model object and a view's widgets
//!
//! A view names its child widgets after the model fields they display, with
//! a suffix: a `name` field feeds `nameLabel` or `name_field`. For every
//! child slot the copier finds the first source field whose name is a prefix
//! of the slot name and writes its value to the widget's value attribute.
//! The attribute comes from the [`WidgetAttributeTable`], keyed by widget
//! kind.

use crate::accessor;
use crate::config::MapperConfig;
use crate::error::MapperResult;
use crate::registry::TypeRegistry;
use kvmap_types::{AccessError, Reflect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// One named child of a view. `element` is `None` for an empty slot.
pub struct ChildSlot<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub element: Option<&'a mut dyn Reflect>,
}

impl<'a> ChildSlot<'a> {
    pub fn new(name: &'a str, kind: &'a str, element: &'a mut dyn Reflect) -> Self {
        Self {
            name,
            kind,
            element: Some(element),
        }
    }

    pub fn empty(name: &'a str, kind: &'a str) -> Self {
        Self {
            name,
            kind,
            element: None,
        }
    }
}

/// A destination whose named children can be enumerated
pub trait ViewContainer {
    /// Child slots in a stable order
    fn child_slots(&mut self) -> Vec<ChildSlot<'_>>;
}

/// Widget kind → value attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetAttributeTable {
    entries: BTreeMap<String, String>,
}

impl WidgetAttributeTable {
    /// Table with no entries
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, kind: impl Into<String>, attribute: impl Into<String>) -> Option<String> {
        self.entries.insert(kind.into(), attribute.into())
    }

    pub fn attribute_for(&self, kind: &str) -> Option<&str> {
        self.entries.get(kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for WidgetAttributeTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("Button", "title");
        table.insert("Label", "text");
        table.insert("Slider", "value");
        table.insert("Switch", "on");
        table.insert("TextField", "text");
        table
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for WidgetAttributeTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (kind, attribute) in iter {
            self.insert(kind, attribute);
        }
    }
}

/// What happened to one child slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    Assigned { source_key: String, attribute: String },
    EmptySlot,
    SameTypeAsSource,
    NoMatchingKey,
    UnknownKind { source_key: String, kind: String },
    Rejected { source_key: String, error: AccessError },
}

impl SlotOutcome {
    pub fn is_assigned(&self) -> bool {
        matches!(self, SlotOutcome::Assigned { .. })
    }
}

/// Per-slot outcomes, in slot order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeerCopyReport {
    pub slots: Vec<(String, SlotOutcome)>,
}

impl PeerCopyReport {
    pub fn outcome(&self, slot: &str) -> Option<&SlotOutcome> {
        self.slots
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, outcome)| outcome)
    }

    pub fn assigned(&self) -> usize {
        self.slots
            .iter()
            .filter(|(_, outcome)| outcome.is_assigned())
            .count()
    }
}

/// Copies source values into view widgets by name prefix.
#[derive(Debug, Clone)]
pub struct PeerCopier {
    registry: Arc<TypeRegistry>,
    table: WidgetAttributeTable,
}

impl PeerCopier {
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            table: WidgetAttributeTable::default(),
        }
    }

    pub fn from_config(config: &MapperConfig) -> Self {
        Self::new().with_table(config.widget_table())
    }

    pub fn with_table(mut self, table: WidgetAttributeTable) -> Self {
        self.table = table;
        self
    }

    pub fn table(&self) -> &WidgetAttributeTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut WidgetAttributeTable {
        &mut self.table
    }

    /// Copy `source` into the children of `destination`.
    ///
    /// Slots holding an element of the source's own type are skipped. Source
    /// fields are scanned in descriptor order and the first prefix match is
    /// final, even when the slot's kind has no attribute.
    pub fn fill_view<V, S>(&self, destination: &mut V, source: &S) -> MapperResult<PeerCopyReport>
    where
        V: ViewContainer + ?Sized,
        S: Reflect + ?Sized,
    {
        let source_key = source.type_key();
        let values = accessor::snapshot(&self.registry, source)?;
        let mut report = PeerCopyReport::default();

        for slot in destination.child_slots() {
            let outcome = match slot.element {
                None => SlotOutcome::EmptySlot,
                Some(element) if element.type_key() == source_key => SlotOutcome::SameTypeAsSource,
                Some(element) => {
                    let matched = values.iter().find(|(key, _)| slot.name.starts_with(key));
                    match matched {
                        None => SlotOutcome::NoMatchingKey,
                        Some((key, value)) => match self.table.attribute_for(slot.kind) {
                            None => SlotOutcome::UnknownKind {
                                source_key: key.to_string(),
                                kind: slot.kind.to_string(),
                            },
                            Some(attribute) => match element.set(attribute, value.clone()) {
                                Ok(()) => SlotOutcome::Assigned {
                                    source_key: key.to_string(),
                                    attribute: attribute.to_string(),
                                },
                                Err(error) => SlotOutcome::Rejected {
                                    source_key: key.to_string(),
                                    error,
                                },
                            },
                        },
                    }
                }
            };

            if !outcome.is_assigned() {
                debug!(
                    view_slot = slot.name,
                    kind = slot.kind,
                    outcome = ?outcome,
                    "Slot not filled"
                );
            }
            report.slots.push((slot.name.to_string(), outcome));
        }

        Ok(report)
    }
}

impl Default for PeerCopier {
    fn default() -> Self {
        Self::new()
    }
}
