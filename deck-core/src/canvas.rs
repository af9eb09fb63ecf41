//! Synchronization between the document store and an interactive canvas.
//!
//! The surface itself (hit-testing, dragging, drawing) lives outside the core
//! behind [`CanvasSurface`]. [`CanvasSync`] translates surface events into
//! store commands and rebuilds the surface when the active slide changes.
//!
//! ## Reconstruction
//!
//! ```text
//! active slide ──► has canvas snapshot? ──yes──► surface.load_snapshot()
//!                         │
//!                         no
//!                         ▼
//!          for each element, in order:
//!            text/rect/circle/line ──► surface.add()        (synchronous)
//!            image                 ──► PendingImage queue   (resolved later)
//! ```
//!
//! Pending images carry the generation of the display pass that queued them.
//! A resolution that completes after another slide was shown is discarded.

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::element::{
    Bounds, Element, ElementId, ElementKind, FontWeight, Passthrough, ShapeStyle, TextAlign,
    TextStyle, DEFAULT_TEXT_FILL,
};
use crate::error::ResolveError;
use crate::event::{ObjectGeometry, SurfaceEvent};
use crate::file_io::ImageUpload;
use crate::slide::{CanvasSnapshot, SlideId};
use crate::state::ToolMode;
use crate::store::DocumentStore;

/// Default text placed by the text tool.
pub const NEW_TEXT: &str = "New Text";

/// Where uploaded images land, and their initial size.
pub const UPLOAD_BOUNDS: Bounds = Bounds::new(100.0, 100.0, 200.0, 150.0);

/// Drawable content of a surface object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SurfaceShape {
    /// Wrapping text box.
    Textbox {
        /// Content.
        text: String,
        /// Box width.
        width: f64,
        /// Box height.
        height: f64,
        /// Font size in pixels.
        font_size: f64,
        /// Font family.
        font_family: String,
        /// Font weight.
        font_weight: FontWeight,
        /// Text color.
        fill: String,
        /// Box background.
        background_color: Option<String>,
        /// Alignment.
        text_align: TextAlign,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Width.
        width: f64,
        /// Height.
        height: f64,
        /// Fill color.
        fill: String,
        /// Outline color.
        stroke: Option<String>,
        /// Outline width.
        stroke_width: f64,
    },
    /// Circle anchored at its bounding box's top-left corner.
    Circle {
        /// Radius.
        radius: f64,
        /// Fill color.
        fill: String,
        /// Outline color.
        stroke: Option<String>,
        /// Outline width.
        stroke_width: f64,
    },
    /// Straight segment `[x1, y1, x2, y2]`.
    Line {
        /// Endpoints.
        points: [f64; 4],
        /// Stroke color.
        stroke: String,
        /// Stroke width.
        stroke_width: f64,
    },
    /// Bitmap.
    Image {
        /// Source the bitmap was decoded from.
        src: String,
        /// Displayed width.
        width: f64,
        /// Displayed height.
        height: f64,
        /// Decoded pixel width.
        natural_width: u32,
        /// Decoded pixel height.
        natural_height: u32,
    },
}

/// One visual object on the canvas surface, tagged with its element id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceObject {
    /// The element this object mirrors.
    pub element_id: ElementId,
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Rotation in degrees.
    pub angle: f64,
    /// Opacity in [0, 1].
    pub opacity: f64,
    /// Renderer passthrough properties, applied last.
    pub passthrough: Passthrough,
    /// Drawable content.
    pub shape: SurfaceShape,
}

impl SurfaceObject {
    /// Build the object for a non-image element.
    ///
    /// Images return `None`; they need [`SurfaceObject::from_image`] once the
    /// source has been resolved.
    #[must_use]
    pub fn from_element(element: &Element) -> Option<Self> {
        let shape = match element.kind() {
            ElementKind::Text(style) => text_shape(element, style),
            ElementKind::Rectangle(style) => SurfaceShape::Rect {
                width: element.width,
                height: element.height,
                fill: style.fill.clone(),
                stroke: style.stroke.clone(),
                stroke_width: style.stroke_width,
            },
            ElementKind::Circle(style) => SurfaceShape::Circle {
                radius: element.width.min(element.height) / 2.0,
                fill: style.fill.clone(),
                stroke: style.stroke.clone(),
                stroke_width: style.stroke_width,
            },
            ElementKind::Line(style) => line_shape(element, style),
            ElementKind::Image(_) => return None,
        };
        Some(Self::tagged(element, shape))
    }

    /// Build the object for an image element from its resolved bitmap.
    #[must_use]
    pub fn from_image(element: &Element, resolved: &ResolvedImage) -> Self {
        let shape = SurfaceShape::Image {
            src: resolved.src.clone(),
            width: element.width,
            height: element.height,
            natural_width: resolved.natural_width,
            natural_height: resolved.natural_height,
        };
        Self::tagged(element, shape)
    }

    fn tagged(element: &Element, shape: SurfaceShape) -> Self {
        Self {
            element_id: element.id().clone(),
            left: element.x,
            top: element.y,
            angle: element.angle,
            opacity: element.opacity,
            passthrough: element.passthrough.clone(),
            shape,
        }
    }
}

fn text_shape(element: &Element, style: &TextStyle) -> SurfaceShape {
    SurfaceShape::Textbox {
        text: style.text.clone(),
        width: element.width,
        height: element.height,
        font_size: style.font_size,
        font_family: style.font_family.clone(),
        font_weight: style.font_weight,
        fill: style.fill.clone(),
        background_color: style.background_color.clone(),
        text_align: style.text_align,
    }
}

fn line_shape(element: &Element, style: &ShapeStyle) -> SurfaceShape {
    SurfaceShape::Line {
        points: [
            element.x,
            element.y,
            element.x + element.width,
            element.y + element.height,
        ],
        stroke: style.stroke.clone().unwrap_or_else(|| style.fill.clone()),
        stroke_width: style.stroke_width,
    }
}

/// A decoded image source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    /// The source that was resolved.
    pub src: String,
    /// Decoded pixel width.
    pub natural_width: u32,
    /// Decoded pixel height.
    pub natural_height: u32,
}

/// The interactive canvas the editor mirrors its active slide onto.
pub trait CanvasSurface {
    /// Remove every object.
    fn clear(&mut self);

    /// Restore the surface verbatim from cached renderer state.
    fn load_snapshot(&mut self, snapshot: &CanvasSnapshot);

    /// Add an object on top of the existing ones.
    fn add(&mut self, object: SurfaceObject);

    /// Remove the object tagged with `id`. Returns `false` if none was found.
    fn remove(&mut self, id: &ElementId) -> bool;

    /// Give input focus to an object, or drop focus with `None`.
    fn set_active(&mut self, id: Option<&ElementId>);

    /// Serialize the surface's current renderer state.
    fn snapshot(&self) -> CanvasSnapshot;

    /// Apply a zoom factor.
    fn set_zoom(&mut self, zoom: f64);

    /// Redraw.
    fn render(&mut self);
}

/// Asynchronous image source decoding.
#[async_trait]
pub trait ImageResolver: Send + Sync {
    /// Decode `src` far enough to know its pixel dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the source cannot be read or decoded.
    async fn resolve(&self, src: &str) -> Result<ResolvedImage, ResolveError>;
}

/// An image placement waiting for its source to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    element: Element,
    generation: u64,
    focus: bool,
}

impl PendingImage {
    /// The image element to place.
    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// The display pass that queued this placement.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The source to resolve.
    #[must_use]
    pub fn src(&self) -> &str {
        self.element.image_source().map_or("", |s| s.src.as_str())
    }
}

/// Result of showing a slide on the surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconstruction {
    /// The slide that was shown.
    pub slide_id: Option<SlideId>,
    /// Whether a cached snapshot was restored instead of replaying elements.
    pub from_snapshot: bool,
    /// Objects placed synchronously.
    pub placed: usize,
    /// Images still to be resolved and placed.
    pub pending: Vec<PendingImage>,
}

/// What a click with the current tool did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// An element was created, added to the store and mirrored.
    Placed(ElementId),
    /// The image tool is active; the host should ask the user for a file.
    NeedsImage,
    /// Nothing to do (select tool, or no presentation).
    Ignored,
}

/// Store-to-surface synchronizer.
#[derive(Debug, Clone, Default)]
pub struct CanvasSync {
    generation: u64,
    displayed: Option<SlideId>,
}

impl CanvasSync {
    /// Create a synchronizer that has not shown anything yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The slide currently mirrored on the surface.
    #[must_use]
    pub fn displayed_slide(&self) -> Option<&SlideId> {
        self.displayed.as_ref()
    }

    /// The current display generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a surface event to the store.
    pub fn handle_event<S>(&mut self, store: &mut DocumentStore, surface: &S, event: &SurfaceEvent)
    where
        S: CanvasSurface + ?Sized,
    {
        match event {
            SurfaceEvent::ObjectModified(geometry) => {
                commit_object_modified(store, geometry, || surface.snapshot());
            }
            SurfaceEvent::SelectionCreated(_) | SurfaceEvent::SelectionUpdated(_) => {
                store.set_selected_element(event.selected_element().cloned());
            }
            SurfaceEvent::SelectionCleared => store.set_selected_element(None),
        }
    }

    /// Rebuild the surface from the store's active slide.
    ///
    /// Starts a new generation, so placements queued by earlier passes are
    /// discarded when they complete.
    pub fn show_active_slide<S>(&mut self, store: &DocumentStore, surface: &mut S) -> Reconstruction
    where
        S: CanvasSurface + ?Sized,
    {
        self.generation += 1;
        surface.clear();

        let Some(slide) = store.active_slide() else {
            self.displayed = None;
            surface.render();
            return Reconstruction::default();
        };
        self.displayed = Some(slide.id().clone());

        let mut reconstruction = Reconstruction {
            slide_id: Some(slide.id().clone()),
            ..Reconstruction::default()
        };

        if let Some(snapshot) = slide.canvas_state() {
            surface.load_snapshot(snapshot);
            reconstruction.from_snapshot = true;
        } else {
            for element in slide.elements() {
                match SurfaceObject::from_element(element) {
                    Some(object) => {
                        surface.add(object);
                        reconstruction.placed += 1;
                    }
                    None => reconstruction.pending.push(PendingImage {
                        element: element.clone(),
                        generation: self.generation,
                        focus: false,
                    }),
                }
            }
        }

        surface.set_zoom(store.ui().zoom);
        surface.render();
        debug!(
            slide = %slide.id(),
            from_snapshot = reconstruction.from_snapshot,
            placed = reconstruction.placed,
            pending = reconstruction.pending.len(),
            "Showed slide"
        );
        reconstruction
    }

    /// Rebuild the surface only if the active slide differs from the one
    /// currently shown.
    pub fn refresh_if_needed<S>(
        &mut self,
        store: &DocumentStore,
        surface: &mut S,
    ) -> Option<Reconstruction>
    where
        S: CanvasSurface + ?Sized,
    {
        let active = store.active_slide().map(|s| s.id());
        if active == self.displayed.as_ref() {
            return None;
        }
        Some(self.show_active_slide(store, surface))
    }

    /// Place a new element at `(x, y)` using the store's current tool.
    pub fn place_from_tool<S>(
        &mut self,
        store: &mut DocumentStore,
        surface: &mut S,
        x: f64,
        y: f64,
    ) -> ToolOutcome
    where
        S: CanvasSurface + ?Sized,
    {
        if store.presentation().is_none() {
            return ToolOutcome::Ignored;
        }
        let element = match store.ui().tool {
            ToolMode::Select => return ToolOutcome::Ignored,
            ToolMode::Image => return ToolOutcome::NeedsImage,
            ToolMode::Text => Element::text(NEW_TEXT, 16.0, Bounds::new(x, y, 200.0, 50.0)),
            ToolMode::Rectangle => Element::rectangle(Bounds::new(x, y, 100.0, 60.0)),
            ToolMode::Circle => Element::circle(Bounds::new(x, y, 80.0, 80.0)),
            ToolMode::Line => Element::new(
                ElementKind::Line(ShapeStyle {
                    fill: DEFAULT_TEXT_FILL.to_string(),
                    stroke: None,
                    stroke_width: 2.0,
                }),
                Bounds::new(x, y, 100.0, 0.0),
            ),
        };

        store.save_to_history();
        let Some(id) = store.add_element(element.clone()) else {
            return ToolOutcome::Ignored;
        };
        if let Some(object) = SurfaceObject::from_element(&element) {
            surface.add(object);
            surface.set_active(Some(&id));
            surface.render();
        }
        persist_snapshot(store, surface);
        ToolOutcome::Placed(id)
    }

    /// Commit an uploaded image to the store and queue it for the surface.
    ///
    /// Returns `None` without a presentation.
    pub fn place_image_upload(
        &mut self,
        store: &mut DocumentStore,
        upload: &ImageUpload,
    ) -> Option<PendingImage> {
        if store.presentation().is_none() {
            return None;
        }
        let mut element = Element::image(upload.data_uri(), UPLOAD_BOUNDS);
        if let Some(source) = element.image_source_mut() {
            source.alt = Some(upload.file_name().to_string());
        }

        store.save_to_history();
        store.add_element(element.clone())?;
        Some(PendingImage {
            element,
            generation: self.generation,
            focus: true,
        })
    }

    /// Add a resolved image to the surface.
    ///
    /// Returns `false` when the placement is stale: another slide has been
    /// shown since it was queued, or the element no longer exists.
    pub fn place_resolved<S>(
        &mut self,
        store: &mut DocumentStore,
        surface: &mut S,
        pending: &PendingImage,
        resolved: &ResolvedImage,
    ) -> bool
    where
        S: CanvasSurface + ?Sized,
    {
        if pending.generation != self.generation {
            debug!(
                element = %pending.element.id(),
                queued = pending.generation,
                current = self.generation,
                "Discarded stale image placement"
            );
            return false;
        }
        let id = pending.element.id();
        let Some(element) = store.active_slide().and_then(|s| s.element(id)) else {
            debug!(element = %id, "Resolved image no longer on the active slide");
            return false;
        };

        surface.add(SurfaceObject::from_image(element, resolved));
        if pending.focus {
            surface.set_active(Some(id));
            persist_snapshot(store, surface);
        }
        surface.render();
        true
    }

    /// Remove the selected element from both the store and the surface.
    ///
    /// Returns the removed id.
    pub fn delete_selected<S>(
        &mut self,
        store: &mut DocumentStore,
        surface: &mut S,
    ) -> Option<ElementId>
    where
        S: CanvasSurface + ?Sized,
    {
        let id = store.selected_element()?.id().clone();
        store.save_to_history();
        store.delete_element(&id);
        surface.remove(&id);
        surface.set_active(None);
        surface.render();
        persist_snapshot(store, surface);
        Some(id)
    }

    /// Push the store's zoom factor to the surface.
    pub fn apply_zoom<S>(&self, store: &DocumentStore, surface: &mut S)
    where
        S: CanvasSurface + ?Sized,
    {
        surface.set_zoom(store.ui().zoom);
        surface.render();
    }
}

/// Resolve pending images concurrently.
///
/// Completion order is unspecified. Failures are logged and skipped.
pub async fn resolve_pending<R>(
    pending: Vec<PendingImage>,
    resolver: &R,
) -> Vec<(PendingImage, ResolvedImage)>
where
    R: ImageResolver + ?Sized,
{
    let mut tasks: FuturesUnordered<_> = pending
        .into_iter()
        .map(|p| async move {
            let result = resolver.resolve(p.src()).await;
            (p, result)
        })
        .collect();

    let mut resolved = Vec::new();
    while let Some((pending, result)) = tasks.next().await {
        match result {
            Ok(image) => resolved.push((pending, image)),
            Err(e) => warn!(
                element = %pending.element.id(),
                error = %e,
                "Skipping image that failed to resolve"
            ),
        }
    }
    resolved
}

/// Commit a finished canvas transform as one undoable step.
///
/// History is recorded first, then the geometry is merged into the tagged
/// element and the active slide's snapshot is replaced. `snapshot` is only
/// taken when the object is tagged. Returns `false` for an untagged object.
pub fn commit_object_modified<F>(
    store: &mut DocumentStore,
    geometry: &ObjectGeometry,
    snapshot: F,
) -> bool
where
    F: FnOnce() -> CanvasSnapshot,
{
    let Some(id) = geometry.element_id.as_ref() else {
        debug!("object modified without element tag");
        return false;
    };
    store.save_to_history();
    store.update_element(id, &geometry.to_patch());
    if let Some(slide_id) = store.active_slide().map(|s| s.id().clone()) {
        store.update_canvas_state(&slide_id, snapshot());
    }
    true
}

fn persist_snapshot<S>(store: &mut DocumentStore, surface: &S)
where
    S: CanvasSurface + ?Sized,
{
    let Some(slide_id) = store.active_slide().map(|s| s.id().clone()) else {
        return;
    };
    store.update_canvas_state(&slide_id, surface.snapshot());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::Slide;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingSurface {
        objects: Vec<SurfaceObject>,
        restored: Option<CanvasSnapshot>,
        active: Option<ElementId>,
        zoom: f64,
        renders: usize,
    }

    impl CanvasSurface for RecordingSurface {
        fn clear(&mut self) {
            self.objects.clear();
            self.restored = None;
        }
        fn load_snapshot(&mut self, snapshot: &CanvasSnapshot) {
            self.restored = Some(snapshot.clone());
        }
        fn add(&mut self, object: SurfaceObject) {
            self.objects.push(object);
        }
        fn remove(&mut self, id: &ElementId) -> bool {
            let before = self.objects.len();
            self.objects.retain(|o| &o.element_id != id);
            before != self.objects.len()
        }
        fn set_active(&mut self, id: Option<&ElementId>) {
            self.active = id.cloned();
        }
        fn snapshot(&self) -> CanvasSnapshot {
            let ids: Vec<_> = self.objects.iter().map(|o| o.element_id.to_string()).collect();
            CanvasSnapshot::new(serde_json::json!({ "objects": ids }))
        }
        fn set_zoom(&mut self, zoom: f64) {
            self.zoom = zoom;
        }
        fn render(&mut self) {
            self.renders += 1;
        }
    }

    struct FixedResolver(HashMap<String, (u32, u32)>);

    #[async_trait]
    impl ImageResolver for FixedResolver {
        async fn resolve(&self, src: &str) -> Result<ResolvedImage, ResolveError> {
            let (w, h) = self
                .0
                .get(src)
                .copied()
                .ok_or_else(|| ResolveError::Decode(src.to_string()))?;
            Ok(ResolvedImage {
                src: src.to_string(),
                natural_width: w,
                natural_height: h,
            })
        }
    }

    fn opened() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.create_presentation();
        store
    }

    #[test]
    fn test_circle_radius_uses_smaller_side() {
        let element = Element::circle(Bounds::new(0.0, 0.0, 80.0, 40.0));
        let object = SurfaceObject::from_element(&element).expect("object");
        assert!(matches!(
            object.shape,
            SurfaceShape::Circle { radius, .. } if (radius - 20.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_line_runs_corner_to_corner_and_falls_back_to_fill() {
        let element = Element::new(
            ElementKind::Line(ShapeStyle {
                fill: "#000000".to_string(),
                stroke: None,
                stroke_width: 2.0,
            }),
            Bounds::new(10.0, 20.0, 100.0, 5.0),
        );
        let object = SurfaceObject::from_element(&element).expect("object");
        let SurfaceShape::Line { points, stroke, .. } = object.shape else {
            panic!("expected line");
        };
        assert_eq!(points, [10.0, 20.0, 110.0, 25.0]);
        assert_eq!(stroke, "#000000");
    }

    #[test]
    fn test_objects_carry_tag_and_common_attributes() {
        let element = Element::rectangle(Bounds::new(1.0, 2.0, 3.0, 4.0))
            .with_angle(30.0)
            .with_opacity(0.5)
            .with_passthrough("rx", serde_json::json!(4));
        let object = SurfaceObject::from_element(&element).expect("object");
        assert_eq!(&object.element_id, element.id());
        assert!((object.angle - 30.0).abs() < f64::EPSILON);
        assert!((object.opacity - 0.5).abs() < f64::EPSILON);
        assert_eq!(object.passthrough.get("rx"), Some(&serde_json::json!(4)));
    }

    #[test]
    fn test_object_modified_records_history_then_updates() {
        let mut store = opened();
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        store.set_tool(ToolMode::Rectangle);
        let ToolOutcome::Placed(id) = sync.place_from_tool(&mut store, &mut surface, 5.0, 5.0)
        else {
            panic!("expected placement");
        };
        let undo_before = store.history_len();

        let event = SurfaceEvent::ObjectModified(ObjectGeometry {
            element_id: Some(id.clone()),
            left: 50.0,
            top: 60.0,
            width: Some(100.0),
            height: Some(60.0),
            scale_x: 1.5,
            scale_y: 2.0,
            angle: 10.0,
        });
        sync.handle_event(&mut store, &surface, &event);

        assert_eq!(store.history_len(), undo_before + 1);
        let element = store.selected_element().expect("still selected");
        assert!((element.x - 50.0).abs() < f64::EPSILON);
        assert!((element.width - 150.0).abs() < f64::EPSILON);
        assert!((element.height - 120.0).abs() < f64::EPSILON);
        assert!(store.active_slide().and_then(Slide::canvas_state).is_some());

        store.undo();
        let restored = store.active_slide().and_then(|s| s.element(&id)).expect("element");
        assert!((restored.x - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_untagged_transform_commits_nothing() {
        let mut store = opened();
        store.add_element(Element::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let before = store.presentation().cloned();
        let history_before = store.history_len();

        let geometry = ObjectGeometry {
            element_id: None,
            left: 9.0,
            top: 9.0,
            width: Some(1.0),
            height: Some(1.0),
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
        };
        let committed = commit_object_modified(&mut store, &geometry, || {
            panic!("snapshot taken for an untagged object")
        });

        assert!(!committed);
        assert_eq!(store.history_len(), history_before);
        assert_eq!(store.presentation().cloned(), before);
    }

    #[test]
    fn test_selection_events() {
        let mut store = opened();
        let surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        let a = ElementId::from("a");

        let event = SurfaceEvent::SelectionCreated(vec![Some(a.clone())]);
        sync.handle_event(&mut store, &surface, &event);
        assert_eq!(store.ui().selected_element.as_ref(), Some(&a));

        sync.handle_event(
            &mut store,
            &surface,
            &SurfaceEvent::SelectionUpdated(vec![Some(a.clone()), Some(ElementId::from("b"))]),
        );
        assert!(store.ui().selected_element.is_none());

        sync.handle_event(&mut store, &surface, &SurfaceEvent::SelectionCreated(vec![Some(a)]));
        sync.handle_event(&mut store, &surface, &SurfaceEvent::SelectionCleared);
        assert!(store.ui().selected_element.is_none());
    }

    #[test]
    fn test_snapshot_is_authoritative() {
        let mut store = opened();
        store.add_element(Element::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let slide_id = store.active_slide().map(|s| s.id().clone()).expect("slide");
        let snapshot = CanvasSnapshot::new(serde_json::json!({"objects": ["cached"]}));
        store.update_canvas_state(&slide_id, snapshot.clone());

        let mut surface = RecordingSurface::default();
        let reconstruction = CanvasSync::new().show_active_slide(&store, &mut surface);

        assert!(reconstruction.from_snapshot);
        assert_eq!(surface.restored, Some(snapshot));
        assert!(surface.objects.is_empty());
    }

    #[test]
    fn test_reconstruction_places_sync_and_queues_images() {
        let mut store = opened();
        store.add_element(Element::text("a", 12.0, Bounds::new(0.0, 0.0, 10.0, 10.0)));
        store.add_element(Element::image("img://one", Bounds::new(0.0, 0.0, 10.0, 10.0)));
        store.add_element(Element::circle(Bounds::new(0.0, 0.0, 10.0, 10.0)));

        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        let reconstruction = sync.show_active_slide(&store, &mut surface);

        assert!(!reconstruction.from_snapshot);
        assert_eq!(reconstruction.placed, 2);
        assert_eq!(reconstruction.pending.len(), 1);
        assert_eq!(reconstruction.pending[0].src(), "img://one");
        assert_eq!(surface.objects.len(), 2);
        assert!(matches!(surface.objects[1].shape, SurfaceShape::Circle { .. }));
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut store = opened();
        store.add_element(Element::image("img://one", Bounds::new(0.0, 0.0, 10.0, 10.0)));
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        let first = sync.show_active_slide(&store, &mut surface);
        let pending = first.pending[0].clone();

        store.add_slide();
        sync.refresh_if_needed(&store, &mut surface).expect("slide changed");

        let resolved = ResolvedImage {
            src: "img://one".to_string(),
            natural_width: 1,
            natural_height: 1,
        };
        assert!(!sync.place_resolved(&mut store, &mut surface, &pending, &resolved));
        assert!(surface.objects.is_empty());
    }

    #[test]
    fn test_refresh_skips_same_slide() {
        let store = opened();
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        assert!(sync.refresh_if_needed(&store, &mut surface).is_some());
        assert!(sync.refresh_if_needed(&store, &mut surface).is_none());
    }

    #[test]
    fn test_tool_defaults() {
        let mut store = opened();
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();

        store.set_tool(ToolMode::Text);
        sync.place_from_tool(&mut store, &mut surface, 12.0, 34.0);
        let text = store.selected_element().expect("text").clone();
        assert_eq!(text.bounds(), Bounds::new(12.0, 34.0, 200.0, 50.0));
        assert_eq!(text.text_style().map(|t| t.text.as_str()), Some(NEW_TEXT));

        store.set_tool(ToolMode::Line);
        sync.place_from_tool(&mut store, &mut surface, 0.0, 0.0);
        let line = store.selected_element().expect("line").clone();
        assert!((line.height).abs() < f64::EPSILON);
        assert_eq!(line.shape_style().map(|s| s.fill.as_str()), Some("#212121"));
        assert_eq!(surface.active.as_ref(), Some(line.id()));
        assert_eq!(store.history_len(), 2);

        store.set_tool(ToolMode::Image);
        assert_eq!(
            sync.place_from_tool(&mut store, &mut surface, 0.0, 0.0),
            ToolOutcome::NeedsImage
        );
        store.set_tool(ToolMode::Select);
        assert_eq!(sync.place_from_tool(&mut store, &mut surface, 0.0, 0.0), ToolOutcome::Ignored);
        assert_eq!(store.history_len(), 2);
    }

    #[test]
    fn test_delete_selected_removes_everywhere() {
        let mut store = opened();
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        store.set_tool(ToolMode::Circle);
        let ToolOutcome::Placed(id) = sync.place_from_tool(&mut store, &mut surface, 0.0, 0.0)
        else {
            panic!("expected placement");
        };

        assert_eq!(sync.delete_selected(&mut store, &mut surface), Some(id.clone()));
        assert!(store.active_slide().and_then(|s| s.element(&id)).is_none());
        assert!(surface.objects.is_empty());
        assert!(store.ui().selected_element.is_none());
        assert!(sync.delete_selected(&mut store, &mut surface).is_none());
    }

    #[tokio::test]
    async fn test_upload_resolves_and_focuses() {
        let mut store = opened();
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        sync.show_active_slide(&store, &mut surface);

        let upload = ImageUpload::new("image/png", "data:image/png;base64,AAAA", "logo.png")
            .expect("image upload");
        let pending = sync.place_image_upload(&mut store, &upload).expect("queued");
        let element = store.selected_element().expect("selected").clone();
        assert_eq!(element.bounds(), UPLOAD_BOUNDS);
        assert_eq!(
            element.image_source().and_then(|s| s.alt.as_deref()),
            Some("logo.png")
        );

        let resolver = FixedResolver(HashMap::from([(upload.data_uri().to_string(), (64, 32))]));
        let resolved = resolve_pending(vec![pending], &resolver).await;
        assert_eq!(resolved.len(), 1);
        let (pending, image) = &resolved[0];
        assert!(sync.place_resolved(&mut store, &mut surface, pending, image));
        assert_eq!(surface.active.as_ref(), Some(element.id()));
    }

    #[tokio::test]
    async fn test_failed_resolution_is_skipped() {
        let mut store = opened();
        store.add_element(Element::image("img://good", Bounds::new(0.0, 0.0, 1.0, 1.0)));
        store.add_element(Element::image("img://bad", Bounds::new(0.0, 0.0, 1.0, 1.0)));
        let mut surface = RecordingSurface::default();
        let mut sync = CanvasSync::new();
        let reconstruction = sync.show_active_slide(&store, &mut surface);

        let resolver = FixedResolver(HashMap::from([("img://good".to_string(), (2, 2))]));
        let resolved = resolve_pending(reconstruction.pending, &resolver).await;
        assert_eq!(resolved.len(), 1);
        for (pending, image) in &resolved {
            assert!(sync.place_resolved(&mut store, &mut surface, pending, image));
        }
        assert_eq!(surface.objects.len(), 1);
    }
}
