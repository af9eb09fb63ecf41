//! UI selection state.
//!
//! This is editor chrome, not document content: it is never persisted and
//! never captured by history.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::ElementId;

/// The active placement tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Select and manipulate existing elements.
    #[default]
    Select,
    /// Place a text box.
    Text,
    /// Place a rectangle.
    Rectangle,
    /// Place a circle.
    Circle,
    /// Place a line.
    Line,
    /// Pick and place an image.
    Image,
}

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Selection, tool and viewport state of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Current tool.
    pub tool: ToolMode,
    /// Selected element on the active slide.
    pub selected_element: Option<ElementId>,
    /// Whether the properties panel is shown.
    pub show_properties_panel: bool,
    /// Zoom factor, kept within the configured range.
    pub zoom: f64,
    /// Canvas pixel dimensions.
    pub canvas_size: CanvasSize,
}

impl UiState {
    /// Initial UI state for a configuration.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            tool: ToolMode::Select,
            selected_element: None,
            show_properties_panel: false,
            zoom: 1.0,
            canvas_size: CanvasSize {
                width: config.canvas_width,
                height: config.canvas_height,
            },
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}
