//! Editor Integration Tests
//!
//! Drives the document store and canvas sync the way a host application
//! does:
//! - Slide list maintenance
//! - Element editing with undo/redo
//! - Canvas surface round trips
//! - Persistence

use deck_core::canvas::UPLOAD_BOUNDS;
use deck_core::file_io::{load_from_path, save_to_path, suggested_file_name};
use deck_core::{
    Bounds, CanvasSnapshot, CanvasSurface, CanvasSync, DocumentStore, Element, ElementId,
    ElementPatch, ImageUpload, ObjectGeometry, Presentation, SlideId, SurfaceEvent,
    SurfaceObject, ToolMode, ToolOutcome,
};

/// Minimal surface that keeps objects in a list.
#[derive(Default)]
struct ListSurface {
    objects: Vec<SurfaceObject>,
    snapshot_loaded: bool,
}

impl CanvasSurface for ListSurface {
    fn clear(&mut self) {
        self.objects.clear();
        self.snapshot_loaded = false;
    }
    fn load_snapshot(&mut self, _snapshot: &CanvasSnapshot) {
        self.snapshot_loaded = true;
    }
    fn add(&mut self, object: SurfaceObject) {
        self.objects.push(object);
    }
    fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|o| &o.element_id != id);
        self.objects.len() != before
    }
    fn set_active(&mut self, _id: Option<&ElementId>) {}
    fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot::new(serde_json::json!({ "count": self.objects.len() }))
    }
    fn set_zoom(&mut self, _zoom: f64) {}
    fn render(&mut self) {}
}

fn slide_ids(store: &DocumentStore) -> Vec<SlideId> {
    store
        .presentation()
        .map(|p| p.slides().iter().map(|s| s.id().clone()).collect())
        .unwrap_or_default()
}

fn x_of(store: &DocumentStore, id: &ElementId) -> f64 {
    store
        .active_slide()
        .and_then(|s| s.element(id))
        .map(|e| e.x)
        .expect("element exists")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn text_edit_undo_redo() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let id = store
        .add_element(Element::text(
            "Title",
            16.0,
            Bounds::new(10.0, 10.0, 200.0, 50.0),
        ))
        .expect("added");

    store.save_to_history();
    store.update_element(
        &id,
        &ElementPatch {
            x: Some(50.0),
            ..ElementPatch::default()
        },
    );

    assert!(store.undo());
    assert!((x_of(&store, &id) - 10.0).abs() < f64::EPSILON);
    assert!(store.redo());
    assert!((x_of(&store, &id) - 50.0).abs() < f64::EPSILON);
}

#[test]
fn delete_active_middle_slide() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    store.add_slide();
    store.add_slide();
    let ids = slide_ids(&store);
    store.set_active_slide(&ids[1]);

    assert!(store.delete_slide(&ids[1]));

    let active = store.presentation().map(|p| p.active_slide_id().clone());
    assert_eq!(active.as_ref(), Some(&ids[2]));
    assert_eq!(slide_ids(&store), vec![ids[0].clone(), ids[2].clone()]);
}

#[test]
fn delete_last_remaining_slide() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let only = slide_ids(&store).remove(0);

    assert!(store.delete_slide(&only));

    let presentation = store.presentation().expect("presentation");
    assert_eq!(presentation.slide_count(), 1);
    assert_ne!(presentation.active_slide_id(), &only);
    assert_eq!(presentation.active_slide().map(|s| s.title.as_str()), Some("Slide 1"));
}

#[test]
fn delete_unknown_slide_is_noop() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let before = store.presentation().cloned();
    assert!(!store.delete_slide(&SlideId::from("missing")));
    assert_eq!(store.presentation().cloned(), before);
}

#[test]
fn zoom_extremes_clamp() {
    let mut store = DocumentStore::new();
    store.set_zoom(999.0);
    assert!((store.ui().zoom - 5.0).abs() < f64::EPSILON);
    store.set_zoom(0.0001);
    assert!((store.ui().zoom - 0.1).abs() < f64::EPSILON);
}

#[test]
fn history_keeps_fifty_entries() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let id = store
        .add_element(Element::rectangle(Bounds::new(0.0, 0.0, 10.0, 10.0)))
        .expect("added");

    for step in 0..51 {
        store.save_to_history();
        store.update_element(&id, &ElementPatch::position(f64::from(step) + 1.0, 0.0));
    }

    assert_eq!(store.history_len(), 50);
    let mut undone = 0;
    while store.undo() {
        undone += 1;
    }
    assert_eq!(undone, 50);
    // The oldest capture (x = 0) was evicted.
    assert!((x_of(&store, &id) - 1.0).abs() < f64::EPSILON);
}

#[test]
fn new_edit_clears_redo() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    store.save_to_history();
    store.add_slide();
    store.undo();
    assert!(store.can_redo());

    store.save_to_history();
    store.rename_presentation("Fresh");
    assert!(!store.can_redo());
}

// ============================================================================
// Canvas flow
// ============================================================================

#[test]
fn drag_resize_through_canvas_is_one_undo_step() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let mut surface = ListSurface::default();
    let mut sync = CanvasSync::new();
    sync.show_active_slide(&store, &mut surface);

    store.set_tool(ToolMode::Rectangle);
    let ToolOutcome::Placed(id) = sync.place_from_tool(&mut store, &mut surface, 20.0, 30.0) else {
        panic!("rectangle tool should place");
    };

    sync.handle_event(
        &mut store,
        &surface,
        &SurfaceEvent::ObjectModified(ObjectGeometry {
            element_id: Some(id.clone()),
            left: 200.0,
            top: 100.0,
            width: Some(100.0),
            height: Some(60.0),
            scale_x: 2.0,
            scale_y: 1.0,
            angle: 0.0,
        }),
    );
    let moved = store.selected_element().expect("selected").clone();
    assert!((moved.width - 200.0).abs() < f64::EPSILON);

    store.undo();
    assert!((x_of(&store, &id) - 20.0).abs() < f64::EPSILON);
    store.undo();
    assert!(store
        .active_slide()
        .is_some_and(|s| s.element(&id).is_none()));
}

#[test]
fn switching_slides_uses_cached_snapshot() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let mut surface = ListSurface::default();
    let mut sync = CanvasSync::new();
    sync.show_active_slide(&store, &mut surface);

    store.set_tool(ToolMode::Circle);
    sync.place_from_tool(&mut store, &mut surface, 0.0, 0.0);
    let first = slide_ids(&store).remove(0);

    store.add_slide();
    let shown = sync.refresh_if_needed(&store, &mut surface).expect("new slide");
    assert!(!shown.from_snapshot);
    assert!(surface.objects.is_empty());

    store.set_active_slide(&first);
    let shown = sync.refresh_if_needed(&store, &mut surface).expect("back");
    assert!(shown.from_snapshot);
    assert!(surface.snapshot_loaded);
}

#[test]
fn uploaded_image_lands_at_default_position() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    let mut sync = CanvasSync::new();

    let upload =
        ImageUpload::new("image/jpeg", "data:image/jpeg;base64,/9j/", "photo.jpg").expect("image");
    let pending = sync.place_image_upload(&mut store, &upload).expect("queued");

    assert_eq!(pending.element().bounds(), UPLOAD_BOUNDS);
    assert_eq!(store.history_len(), 1);
    assert!(ImageUpload::new("application/pdf", "data:,", "doc.pdf").is_err());
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn save_and_load_preserve_everything() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    store.rename_presentation("Launch plan");
    store.add_element(
        Element::text("Agenda", 32.0, Bounds::new(40.0, 40.0, 400.0, 60.0))
            .with_passthrough("lineHeight", serde_json::json!(1.2)),
    );
    store.add_slide();
    store.add_element(Element::image(
        "data:image/png;base64,AAAA",
        Bounds::new(0.0, 0.0, 320.0, 240.0),
    ));

    let presentation = store.presentation().expect("presentation").clone();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(suggested_file_name(&presentation));
    save_to_path(&presentation, &path).expect("save");

    assert!(path.ends_with("Launch plan.json"));
    let loaded: Presentation = load_from_path(&path).expect("load");
    assert_eq!(loaded, presentation);
}

#[test]
fn invalid_load_leaves_store_alone() {
    let mut store = DocumentStore::new();
    store.create_presentation();
    store.save_to_history();
    let before = store.presentation().cloned();

    assert!(store.load_json("not json").is_err());
    assert!(store.load_json(r#"{"id": "p", "slides": {}}"#).is_err());

    assert_eq!(store.presentation().cloned(), before);
    assert!(store.can_undo());
}
