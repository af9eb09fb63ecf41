//! The document store: the single owner of the live presentation.
//!
//! [`DocumentStore`] exposes the editor's command interface. Every command
//! runs synchronously to completion. Stale slide or element ids are absorbed
//! as no-ops and logged at `debug`; the store never panics on them.
//!
//! History capture is explicit. Callers invoke
//! [`DocumentStore::save_to_history`] once per logical user action, before the
//! mutation, and the store never records on its own.
//!
//! # Example
//!
//! ```
//! use deck_core::store::DocumentStore;
//! use deck_core::{Bounds, Element, ElementPatch};
//!
//! let mut store = DocumentStore::new();
//! store.create_presentation();
//!
//! let id = store
//!     .add_element(Element::text("Hello", 16.0, Bounds::new(10.0, 10.0, 200.0, 50.0)))
//!     .unwrap();
//!
//! store.save_to_history();
//! store.update_element(&id, &ElementPatch::position(50.0, 10.0));
//! store.undo();
//!
//! assert_eq!(store.selected_element().map(|e| e.x), Some(10.0));
//! ```

use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::element::{Element, ElementId};
use crate::error::DocumentResult;
use crate::history::History;
use crate::patch::ElementPatch;
use crate::presentation::{slide_title, Presentation};
use crate::slide::{CanvasSnapshot, Slide, SlideId};
use crate::state::{CanvasSize, ToolMode, UiState};

/// Which part of the store changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreChange {
    /// The presentation content or active slide.
    Document,
    /// Tool, selection, panel, zoom or canvas size.
    Ui,
    /// Undo/redo availability.
    History,
}

/// Callback invoked after a change has been applied.
pub type ChangeListener = Box<dyn Fn(StoreChange) + Send + Sync>;

/// Owner of the presentation, UI state and history.
pub struct DocumentStore {
    presentation: Option<Presentation>,
    ui: UiState,
    history: History,
    config: EditorConfig,
    listeners: Vec<ChangeListener>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("presentation", &self.presentation)
            .field("ui", &self.ui)
            .field("history", &self.history)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Create an empty store with the default configuration.
    ///
    /// No presentation is open until [`create_presentation`](Self::create_presentation)
    /// or a load.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create an empty store with a custom configuration.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            presentation: None,
            ui: UiState::new(&config),
            history: History::new(config.history_limit),
            config,
            listeners: Vec::new(),
        }
    }

    /// Register a change listener.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(StoreChange) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // ---------------------------------------------------------------
    // Selectors
    // ---------------------------------------------------------------

    /// The open presentation.
    #[must_use]
    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    /// The active slide of the open presentation.
    #[must_use]
    pub fn active_slide(&self) -> Option<&Slide> {
        self.presentation.as_ref()?.active_slide()
    }

    /// The selected element, if it exists on the active slide.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.ui.selected_element.as_ref()?;
        self.active_slide()?.element(id)
    }

    /// UI selection state.
    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Undo/redo stacks.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots on the undo stack.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.undo_count()
    }

    // ---------------------------------------------------------------
    // Document lifecycle
    // ---------------------------------------------------------------

    /// Replace the current presentation with a fresh one.
    ///
    /// Clears selection and history.
    pub fn create_presentation(&mut self) {
        let presentation = Presentation::new();
        info!(presentation = %presentation.id(), "Created presentation");
        self.replace_document(presentation);
    }

    /// Replace the current presentation with an already validated one.
    ///
    /// Clears selection and history.
    pub fn load_presentation(&mut self, presentation: Presentation) {
        info!(
            presentation = %presentation.id(),
            slides = presentation.slide_count(),
            "Loaded presentation"
        );
        self.replace_document(presentation);
    }

    /// Parse, validate and load a presentation from JSON.
    ///
    /// # Errors
    ///
    /// Returns the validation error; the store is left unchanged.
    pub fn load_json(&mut self, json: &str) -> DocumentResult<()> {
        let presentation = Presentation::from_json(json)?;
        self.load_presentation(presentation);
        Ok(())
    }

    /// Rename the presentation.
    pub fn rename_presentation(&mut self, title: impl Into<String>) {
        let title = title.into();
        let Some(presentation) = self.presentation.as_mut() else {
            debug!("rename_presentation without a presentation");
            return;
        };
        if presentation.title() == title {
            return;
        }
        presentation.set_title(title);
        self.commit();
    }

    // ---------------------------------------------------------------
    // Slides
    // ---------------------------------------------------------------

    /// Append a blank slide titled by its position and make it active.
    ///
    /// Returns the new slide id.
    pub fn add_slide(&mut self) -> Option<SlideId> {
        let presentation = self.presentation.as_mut()?;
        let slide = Slide::new(slide_title(presentation.slide_count() + 1));
        let id = slide.id().clone();
        presentation.push_slide(slide);
        presentation.set_active_slide(&id);
        self.commit();
        self.select(None);
        Some(id)
    }

    /// Remove a slide.
    ///
    /// If it was active, the slide now at the same index (or the new last
    /// slide) becomes active. Removing the only slide leaves a fresh default
    /// slide in its place. Returns `false` if the id is unknown.
    pub fn delete_slide(&mut self, id: &SlideId) -> bool {
        let Some(presentation) = self.presentation.as_mut() else {
            return false;
        };
        let previous_active = presentation.active_slide_id().clone();
        if !presentation.remove_slide(id) {
            debug!(slide = %id, "delete_slide: unknown slide");
            return false;
        }
        let active_changed = *presentation.active_slide_id() != previous_active;
        self.commit();
        if active_changed {
            self.select(None);
        }
        true
    }

    /// Switch the active slide and clear the selection.
    ///
    /// Unknown ids are ignored.
    pub fn set_active_slide(&mut self, id: &SlideId) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        if !presentation.set_active_slide(id) {
            debug!(slide = %id, "set_active_slide: unknown slide");
            return;
        }
        self.emit(StoreChange::Document);
        self.select(None);
    }

    /// Rename a slide. Unknown ids are ignored.
    pub fn rename_slide(&mut self, id: &SlideId, title: impl Into<String>) {
        let title = title.into();
        let Some(slide) = self.presentation.as_mut().and_then(|p| p.slide_mut(id)) else {
            debug!(slide = %id, "rename_slide: unknown slide");
            return;
        };
        if slide.title == title {
            return;
        }
        slide.title = title;
        self.commit();
    }

    /// Store renderer state on a slide.
    ///
    /// This is a cache write, so `updated_at` is left alone.
    pub fn update_canvas_state(&mut self, slide_id: &SlideId, snapshot: CanvasSnapshot) {
        let Some(slide) = self
            .presentation
            .as_mut()
            .and_then(|p| p.slide_mut(slide_id))
        else {
            debug!(slide = %slide_id, "update_canvas_state: unknown slide");
            return;
        };
        if slide.canvas_state() == Some(&snapshot) {
            return;
        }
        slide.set_canvas_state(Some(snapshot));
        self.emit(StoreChange::Document);
    }

    // ---------------------------------------------------------------
    // Elements
    // ---------------------------------------------------------------

    /// Append an element to the active slide and select it.
    ///
    /// Returns `None` without a presentation, when the slide already holds
    /// an element with the same id, or when the element fails
    /// [`Element::validate`].
    pub fn add_element(&mut self, element: Element) -> Option<ElementId> {
        if let Err(e) = element.validate() {
            debug!(error = %e, "add_element: invalid element");
            return None;
        }
        let slide = self.active_slide_mut()?;
        let id = element.id().clone();
        if slide.element(&id).is_some() {
            debug!(element = %id, "add_element: id already present");
            return None;
        }
        slide.push_element(element);
        self.commit();
        self.select(Some(id.clone()));
        Some(id)
    }

    /// Merge a patch into an element of the active slide.
    ///
    /// The element variant never changes. Fields foreign to the variant are
    /// dropped. Returns whether anything changed.
    pub fn update_element(&mut self, id: &ElementId, patch: &ElementPatch) -> bool {
        let Some(element) = self.active_slide_mut().and_then(|s| s.element_mut(id)) else {
            debug!(element = %id, "update_element: unknown element");
            return false;
        };
        let outcome = patch.apply_to(element);
        if !outcome.ignored.is_empty() {
            debug!(element = %id, ignored = ?outcome.ignored, "Dropped patch fields");
        }
        if outcome.changed {
            self.commit();
        }
        outcome.changed
    }

    /// Remove an element from the active slide.
    ///
    /// Clears the selection if it pointed at the removed element.
    pub fn delete_element(&mut self, id: &ElementId) -> bool {
        let Some(slide) = self.active_slide_mut() else {
            return false;
        };
        if slide.remove_element(id).is_none() {
            debug!(element = %id, "delete_element: unknown element");
            return false;
        }
        self.commit();
        if self.ui.selected_element.as_ref() == Some(id) {
            self.select(None);
        }
        true
    }

    /// Copy an element under a new id, offset by the configured distance,
    /// append it and select it.
    pub fn duplicate_element(&mut self, id: &ElementId) -> Option<ElementId> {
        let offset = self.config.duplicate_offset;
        let slide = self.active_slide_mut()?;
        let Some(original) = slide.element(id) else {
            debug!(element = %id, "duplicate_element: unknown element");
            return None;
        };
        let copy = original.duplicate(offset);
        let copy_id = copy.id().clone();
        slide.push_element(copy);
        self.commit();
        self.select(Some(copy_id.clone()));
        Some(copy_id)
    }

    // ---------------------------------------------------------------
    // UI state
    // ---------------------------------------------------------------

    /// Change the active tool.
    pub fn set_tool(&mut self, tool: ToolMode) {
        if self.ui.tool != tool {
            self.ui.tool = tool;
            self.emit(StoreChange::Ui);
        }
    }

    /// Select an element, or clear the selection with `None`.
    ///
    /// The properties panel follows the selection.
    pub fn set_selected_element(&mut self, id: Option<ElementId>) {
        self.select(id);
    }

    /// Show or hide the properties panel.
    pub fn toggle_properties_panel(&mut self) {
        self.ui.show_properties_panel = !self.ui.show_properties_panel;
        self.emit(StoreChange::Ui);
    }

    /// Set the zoom factor, clamped to the configured range.
    ///
    /// Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        let Some(zoom) = self.config.clamp_zoom(zoom) else {
            debug!(zoom, "set_zoom: non-finite zoom");
            return;
        };
        if (zoom - self.ui.zoom).abs() > f64::EPSILON {
            self.ui.zoom = zoom;
            self.emit(StoreChange::Ui);
        }
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.ui.zoom * self.config.zoom_step);
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.ui.zoom / self.config.zoom_step);
    }

    /// Return to 100% zoom.
    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    /// Change the canvas pixel dimensions. Zero sizes are ignored.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!(width, height, "set_canvas_size: empty size");
            return;
        }
        let size = CanvasSize { width, height };
        if self.ui.canvas_size != size {
            self.ui.canvas_size = size;
            self.emit(StoreChange::Ui);
        }
    }

    // ---------------------------------------------------------------
    // History
    // ---------------------------------------------------------------

    /// Capture the current presentation before a logical edit.
    pub fn save_to_history(&mut self) {
        let Some(presentation) = self.presentation.as_ref() else {
            return;
        };
        self.history.record(presentation);
        self.emit(StoreChange::History);
    }

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(current) = self.presentation.as_ref() else {
            return false;
        };
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        true
    }

    /// Step forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(current) = self.presentation.as_ref() else {
            return false;
        };
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        true
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn active_slide_mut(&mut self) -> Option<&mut Slide> {
        self.presentation.as_mut()?.active_slide_mut()
    }

    fn replace_document(&mut self, presentation: Presentation) {
        self.presentation = Some(presentation);
        self.history.clear();
        self.emit(StoreChange::Document);
        self.emit(StoreChange::History);
        self.select(None);
    }

    fn restore(&mut self, presentation: Presentation) {
        self.presentation = Some(presentation);
        self.emit(StoreChange::Document);
        self.emit(StoreChange::History);
        if self.ui.selected_element.is_some() && self.selected_element().is_none() {
            self.select(None);
        }
    }

    /// Refresh `updated_at` and notify.
    fn commit(&mut self) {
        if let Some(presentation) = self.presentation.as_mut() {
            presentation.touch();
        }
        self.emit(StoreChange::Document);
    }

    fn select(&mut self, id: Option<ElementId>) {
        let show = id.is_some();
        if self.ui.selected_element == id && self.ui.show_properties_panel == show {
            return;
        }
        self.ui.selected_element = id;
        self.ui.show_properties_panel = show;
        self.emit(StoreChange::Ui);
    }

    fn emit(&self, change: StoreChange) {
        for listener in &self.listeners {
            listener(change);
        }
    }
}
