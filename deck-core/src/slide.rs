//! Slides: ordered element lists plus a cached canvas snapshot.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId};
pub use crate::id::SlideId;

/// Opaque renderer state for a slide.
///
/// The core never inspects it; it is only carried between the canvas surface
/// and storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanvasSnapshot(serde_json::Value);

impl CanvasSnapshot {
    /// Wrap renderer state.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Borrow the wrapped state.
    #[must_use]
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Unwrap the state.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// A single slide.
///
/// Element order is both insertion order and z-order: later elements draw on
/// top of earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    id: SlideId,
    /// Slide title shown in the slide list.
    pub title: String,
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    canvas_state: Option<CanvasSnapshot>,
}

impl Slide {
    /// Create an empty slide with a fresh id.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(SlideId::new(), title)
    }

    /// Create an empty slide with a caller-chosen id.
    #[must_use]
    pub fn with_id(id: SlideId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            elements: Vec::new(),
            canvas_state: None,
        }
    }

    /// Append an element (builder form).
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Attach a canvas snapshot (builder form).
    #[must_use]
    pub fn with_canvas_state(mut self, snapshot: CanvasSnapshot) -> Self {
        self.canvas_state = Some(snapshot);
        self
    }

    /// The slide id.
    #[must_use]
    pub fn id(&self) -> &SlideId {
        &self.id
    }

    /// Elements in z-order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Find an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Position of an element in z-order.
    #[must_use]
    pub fn element_index(&self, id: &ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// The cached canvas snapshot, if the slide has been edited on a canvas.
    #[must_use]
    pub fn canvas_state(&self) -> Option<&CanvasSnapshot> {
        self.canvas_state.as_ref()
    }

    /// Number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Whether the slide has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn element_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub(crate) fn push_element(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub(crate) fn remove_element(&mut self, id: &ElementId) -> Option<Element> {
        let index = self.element_index(id)?;
        Some(self.elements.remove(index))
    }

    pub(crate) fn set_canvas_state(&mut self, snapshot: Option<CanvasSnapshot>) {
        self.canvas_state = snapshot;
    }
}
