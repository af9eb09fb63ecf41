//! Events reported by the interactive canvas surface.

use serde::{Deserialize, Serialize};

use crate::element::ElementId;
use crate::patch::ElementPatch;

/// Geometry of a surface object after a drag, resize or rotate.
///
/// `width` and `height` are the object's unscaled size; the surface reports
/// scaling separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectGeometry {
    /// Element the object was tagged with, if any.
    pub element_id: Option<ElementId>,
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Unscaled width.
    #[serde(default)]
    pub width: Option<f64>,
    /// Unscaled height.
    #[serde(default)]
    pub height: Option<f64>,
    /// Horizontal scale factor.
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    /// Vertical scale factor.
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl ObjectGeometry {
    /// Width after scaling; zero when the surface reported none.
    #[must_use]
    pub fn effective_width(&self) -> f64 {
        self.width.map_or(0.0, |w| w * self.scale_x)
    }

    /// Height after scaling; zero when the surface reported none.
    #[must_use]
    pub fn effective_height(&self) -> f64 {
        self.height.map_or(0.0, |h| h * self.scale_y)
    }

    /// The element update this geometry implies.
    #[must_use]
    pub fn to_patch(&self) -> ElementPatch {
        ElementPatch::geometry(
            self.left,
            self.top,
            self.effective_width(),
            self.effective_height(),
            self.angle,
        )
    }
}

/// An event raised by the canvas surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// A drag, resize or rotate finished.
    ObjectModified(ObjectGeometry),
    /// A selection was made. Carries the element tag of each selected object.
    SelectionCreated(Vec<Option<ElementId>>),
    /// The selection changed.
    SelectionUpdated(Vec<Option<ElementId>>),
    /// Nothing is selected any more.
    SelectionCleared,
}

impl SurfaceEvent {
    /// The element a selection event resolves to.
    ///
    /// Only a selection of exactly one tagged object resolves; empty or
    /// multiple selections resolve to `None`.
    #[must_use]
    pub fn selected_element(&self) -> Option<&ElementId> {
        match self {
            Self::SelectionCreated(objects) | Self::SelectionUpdated(objects) => {
                match objects.as_slice() {
                    [single] => single.as_ref(),
                    _ => None,
                }
            }
            Self::ObjectModified(_) | Self::SelectionCleared => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> ObjectGeometry {
        ObjectGeometry {
            element_id: Some(ElementId::from("e1")),
            left: 40.0,
            top: 30.0,
            width: Some(100.0),
            height: Some(60.0),
            scale_x: 2.0,
            scale_y: 0.5,
            angle: 45.0,
        }
    }

    #[test]
    fn test_effective_size_applies_scale() {
        let g = geometry();
        assert!((g.effective_width() - 200.0).abs() < f64::EPSILON);
        assert!((g.effective_height() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_size_is_zero() {
        let g = ObjectGeometry {
            width: None,
            ..geometry()
        };
        assert!(g.effective_width().abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_patch_carries_geometry() {
        let patch = geometry().to_patch();
        assert_eq!(patch.x, Some(40.0));
        assert_eq!(patch.width, Some(200.0));
        assert_eq!(patch.angle, Some(45.0));
        assert!(patch.text.is_none());
    }

    #[test]
    fn test_single_selection_resolves() {
        let event = SurfaceEvent::SelectionCreated(vec![Some(ElementId::from("a"))]);
        assert_eq!(event.selected_element(), Some(&ElementId::from("a")));
    }

    #[test]
    fn test_multi_or_empty_selection_is_none() {
        let multi = SurfaceEvent::SelectionUpdated(vec![
            Some(ElementId::from("a")),
            Some(ElementId::from("b")),
        ]);
        assert!(multi.selected_element().is_none());
        assert!(SurfaceEvent::SelectionCreated(Vec::new())
            .selected_element()
            .is_none());
        assert!(SurfaceEvent::SelectionUpdated(vec![None])
            .selected_element()
            .is_none());
    }

    #[test]
    fn test_event_json_shape() {
        let event: SurfaceEvent = serde_json::from_str(
            r#"{"kind": "object_modified", "data": {"elementId": "e1", "left": 1, "top": 2, "width": 3, "height": 4}}"#,
        )
        .expect("event");
        let SurfaceEvent::ObjectModified(g) = event else {
            panic!("expected object_modified");
        };
        assert!((g.scale_x - 1.0).abs() < f64::EPSILON);
        assert!((g.effective_height() - 4.0).abs() < f64::EPSILON);
    }
}
