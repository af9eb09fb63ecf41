//! # Deck Renderer
//!
//! Image resolution and export for Deck presentations.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ Presentation │──▶│ SlideExporter│──▶│ SVG ─▶ PNG / JPEG │
//! │  (deck-core) │   └──────────────┘   └──────────────────┘
//! │              │   ┌──────────────┐   ┌──────────────────┐
//! │              │──▶│DeckProjection│──▶│ DeckWriter        │
//! └──────────────┘   └──────────────┘   └──────────────────┘
//! ```
//!
//! [`ImageSourceResolver`] decodes `data:` URIs and local files so the canvas
//! layer can place images with their natural size.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod image;
pub mod pptx;

pub use crate::image::{
    encode_data_uri, parse_data_uri, probe_image, DataUri, ImageFormat, ImageInfo,
    ImageSourceResolver,
};
pub use error::{RenderError, RenderResult};
#[cfg(feature = "export")]
pub use export::{ExportConfig, RasterFormat, SlideExporter, EXPORT_SCALE, JPEG_QUALITY};
pub use pptx::{
    DeckProjection, DeckWriter, JsonDeckWriter, ProjectedShape, ProjectedSlide, ShapeContent,
    ShapeKind, PX_PER_INCH,
};

/// Renderer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
