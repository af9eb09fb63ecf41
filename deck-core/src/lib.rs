//! # Deck Core
//!
//! Editor core for slide presentations: the document model, the document
//! store with its command interface, snapshot-based undo/redo and the
//! contract with an interactive canvas surface.
//! Compiles to WASM for the browser host.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               deck-core.wasm                │
//! ├─────────────────────────────────────────────┤
//! │  Document Model  │  Document Store          │
//! │  - Presentation  │  - Commands              │
//! │  - Slides        │  - UI selection state    │
//! │  - Elements      │  - Change listeners      │
//! ├─────────────────────────────────────────────┤
//! │  History         │  Canvas Sync             │
//! │  - Undo / redo   │  - Surface events        │
//! │  - Bounded       │  - Slide reconstruction  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod file_io;
pub mod history;
mod id;
pub mod patch;
pub mod presentation;
pub mod schema;
pub mod slide;
pub mod state;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use canvas::{
    commit_object_modified, resolve_pending, CanvasSurface, CanvasSync, ImageResolver,
    PendingImage, Reconstruction, ResolvedImage, SurfaceObject, SurfaceShape, ToolOutcome,
};
pub use config::EditorConfig;
pub use element::{
    Bounds, Element, ElementId, ElementKind, ElementType, FontWeight, ImageSource, ShapeStyle,
    TextAlign, TextStyle,
};
pub use error::{DocumentError, DocumentResult, FileError, FileResult, ResolveError};
pub use event::{ObjectGeometry, SurfaceEvent};
pub use file_io::{ImageUpload, PickOutcome};
pub use history::History;
pub use patch::{ElementPatch, PatchOutcome};
pub use presentation::{Presentation, PresentationId};
pub use schema::PresentationDocument;
pub use slide::{CanvasSnapshot, Slide, SlideId};
pub use state::{CanvasSize, ToolMode, UiState};
pub use store::{DocumentStore, StoreChange};

/// Deck core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
