//! WebAssembly bindings for deck-core.
//!
//! The browser host drives the editor through [`WasmEditor`]. Structured
//! values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::canvas::commit_object_modified;
use crate::{
    CanvasSnapshot, DocumentStore, Element, ElementId, ElementPatch, SlideId, SurfaceEvent,
    ToolMode,
};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    store: DocumentStore,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with a fresh presentation.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        let mut store = DocumentStore::new();
        store.create_presentation();
        Self { store }
    }

    /// Get the presentation as JSON.
    #[wasm_bindgen(js_name = getPresentationJson)]
    #[must_use]
    pub fn get_presentation_json(&self) -> String {
        self.store
            .presentation()
            .and_then(|p| p.to_json().ok())
            .unwrap_or_default()
    }

    /// Get the UI state as JSON.
    #[wasm_bindgen(js_name = getUiJson)]
    #[must_use]
    pub fn get_ui_json(&self) -> String {
        serde_json::to_string(self.store.ui()).unwrap_or_default()
    }

    /// Replace the presentation from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the document is invalid.
    #[wasm_bindgen(js_name = loadPresentationJson)]
    pub fn load_presentation_json(&mut self, json: &str) -> Result<(), String> {
        self.store.load_json(json).map_err(|e| e.to_string())
    }

    /// Start a new presentation.
    #[wasm_bindgen(js_name = createPresentation)]
    pub fn create_presentation(&mut self) {
        self.store.create_presentation();
    }

    /// Append a slide; returns its id.
    #[wasm_bindgen(js_name = addSlide)]
    pub fn add_slide(&mut self) -> Option<String> {
        self.store.add_slide().map(|id| id.to_string())
    }

    /// Delete a slide.
    #[wasm_bindgen(js_name = deleteSlide)]
    pub fn delete_slide(&mut self, id: &str) -> bool {
        self.store.delete_slide(&SlideId::from(id))
    }

    /// Switch the active slide.
    #[wasm_bindgen(js_name = setActiveSlide)]
    pub fn set_active_slide(&mut self, id: &str) {
        self.store.set_active_slide(&SlideId::from(id));
    }

    /// Add an element given as JSON; returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element JSON is invalid.
    #[wasm_bindgen(js_name = addElementJson)]
    pub fn add_element_json(&mut self, json: &str) -> Result<Option<String>, String> {
        let element: Element = serde_json::from_str(json).map_err(|e| e.to_string())?;
        element.validate().map_err(|e| e.to_string())?;
        Ok(self.store.add_element(element).map(|id| id.to_string()))
    }

    /// Merge a JSON patch into an element.
    ///
    /// # Errors
    ///
    /// Returns an error string if the patch JSON is invalid.
    #[wasm_bindgen(js_name = updateElementJson)]
    pub fn update_element_json(&mut self, id: &str, json: &str) -> Result<bool, String> {
        let patch: ElementPatch = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(self.store.update_element(&ElementId::from(id), &patch))
    }

    /// Delete an element.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, id: &str) -> bool {
        self.store.delete_element(&ElementId::from(id))
    }

    /// Duplicate an element; returns the copy's id.
    #[wasm_bindgen(js_name = duplicateElement)]
    pub fn duplicate_element(&mut self, id: &str) -> Option<String> {
        self.store
            .duplicate_element(&ElementId::from(id))
            .map(|id| id.to_string())
    }

    /// Select the current tool by name (`select`, `text`, `rectangle`, ...).
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown tool name.
    #[wasm_bindgen(js_name = setTool)]
    pub fn set_tool(&mut self, tool: &str) -> Result<(), String> {
        let tool: ToolMode =
            serde_json::from_value(serde_json::Value::String(tool.to_string()))
                .map_err(|e| e.to_string())?;
        self.store.set_tool(tool);
        Ok(())
    }

    /// Set the zoom factor.
    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.store.set_zoom(zoom);
    }

    /// Apply a canvas surface event given as JSON.
    ///
    /// Only selection events are handled here; geometry changes need the
    /// host surface's snapshot and go through `objectModified`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event JSON is invalid.
    #[wasm_bindgen(js_name = applySelectionEvent)]
    pub fn apply_selection_event(&mut self, json: &str) -> Result<(), String> {
        let event: SurfaceEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        match event {
            SurfaceEvent::ObjectModified(_) => {
                return Err("object_modified must go through objectModified".to_string())
            }
            SurfaceEvent::SelectionCleared => self.store.set_selected_element(None),
            _ => self
                .store
                .set_selected_element(event.selected_element().cloned()),
        }
        Ok(())
    }

    /// Record history, apply a surface geometry event and store the host's
    /// canvas snapshot, all as one undoable step.
    ///
    /// # Errors
    ///
    /// Returns an error string if either JSON argument is invalid.
    #[wasm_bindgen(js_name = objectModified)]
    pub fn object_modified(&mut self, event_json: &str, snapshot_json: &str) -> Result<(), String> {
        let event: SurfaceEvent = serde_json::from_str(event_json).map_err(|e| e.to_string())?;
        let snapshot: CanvasSnapshot =
            serde_json::from_str(snapshot_json).map_err(|e| e.to_string())?;
        let SurfaceEvent::ObjectModified(geometry) = event else {
            return Err("expected object_modified".to_string());
        };
        commit_object_modified(&mut self.store, &geometry, || snapshot);
        Ok(())
    }

    /// Capture history before an edit.
    #[wasm_bindgen(js_name = saveToHistory)]
    pub fn save_to_history(&mut self) {
        self.store.save_to_history();
    }

    /// Undo the last recorded edit.
    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    /// Check if undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    /// Check if redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}
