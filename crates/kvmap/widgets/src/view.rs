//! View container
//!
//! A [`WidgetView`] is an ordered list of named slots. A slot may be empty,
//! which models an outlet that was declared but never connected.

use kvmap_engine::{ChildSlot, MapperResult, PeerCopier, PeerCopyReport, ViewContainer};
use kvmap_types::{Reflect, StaticSchema};
use tracing::debug;

/// One named slot of a [`WidgetView`]
pub struct ViewChild {
    name: String,
    kind: String,
    element: Option<Box<dyn Reflect>>,
}

impl ViewChild {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn element(&self) -> Option<&dyn Reflect> {
        self.element.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.element.is_none()
    }
}

impl std::fmt::Debug for ViewChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewChild")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("empty", &self.is_empty())
            .finish()
    }
}

/// Headless view holding widgets by name
#[derive(Debug, Default)]
pub struct WidgetView {
    children: Vec<ViewChild>,
}

impl WidgetView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget whose kind is its type name
    pub fn with_widget<W: Reflect + StaticSchema>(self, name: impl Into<String>, widget: W) -> Self {
        self.with_child(name, W::TYPE_NAME, widget)
    }

    /// Add any reflectable element under an explicit kind
    pub fn with_child<E: Reflect>(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        element: E,
    ) -> Self {
        self.children.push(ViewChild {
            name: name.into(),
            kind: kind.into(),
            element: Some(Box::new(element)),
        });
        self
    }

    /// Add an unconnected slot
    pub fn with_empty(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
        self.children.push(ViewChild {
            name: name.into(),
            kind: kind.into(),
            element: None,
        });
        self
    }

    pub fn children(&self) -> &[ViewChild] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Element in slot `name`, if it is a `T`
    pub fn widget<T: Reflect>(&self, name: &str) -> Option<&T> {
        self.children
            .iter()
            .find(|child| child.name == name)
            .and_then(|child| child.element.as_deref())
            .and_then(|element| element.as_any().downcast_ref::<T>())
    }

    /// Fill this view's widgets from `source`
    pub fn bind<S: Reflect + ?Sized>(
        &mut self,
        copier: &PeerCopier,
        source: &S,
    ) -> MapperResult<PeerCopyReport> {
        let report = copier.fill_view(self, source)?;
        debug!(
            source = source.type_name(),
            slots = report.slots.len(),
            assigned = report.assigned(),
            "View bound"
        );
        Ok(report)
    }
}

impl ViewContainer for WidgetView {
    fn child_slots(&mut self) -> Vec<ChildSlot<'_>> {
        self.children
            .iter_mut()
            .map(|child| ChildSlot {
                name: &child.name,
                kind: &child.kind,
                element: child.element.as_mut().map(|e| &mut **e as &mut dyn Reflect),
            })
            .collect()
    }
}
