//! Editor configuration.

use serde::{Deserialize, Serialize};

/// Tunable editor limits and defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum entries kept on each of the undo and redo stacks.
    pub history_limit: usize,
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Lowest zoom factor.
    pub min_zoom: f64,
    /// Highest zoom factor.
    pub max_zoom: f64,
    /// Multiplier applied by one zoom-in step.
    pub zoom_step: f64,
    /// Offset applied to both axes when duplicating an element.
    pub duplicate_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: 50,
            canvas_width: 1280,
            canvas_height: 720,
            min_zoom: 0.1,
            max_zoom: 5.0,
            zoom_step: 1.2,
            duplicate_offset: 20.0,
        }
    }
}

impl EditorConfig {
    /// Clamp a zoom factor into the configured range.
    ///
    /// Non-finite input yields `None`.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> Option<f64> {
        zoom.is_finite().then(|| zoom.clamp(self.min_zoom, self.max_zoom))
    }
}
