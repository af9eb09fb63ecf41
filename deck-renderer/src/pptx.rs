//! Presentation-file projection.
//!
//! Translates a [`Presentation`] one-to-one into slide and shape primitives in
//! physical units (inches at 72 pixels per inch). The projection is one-way:
//! canvas snapshots, ids and passthrough properties are dropped.
//!
//! Encoding the projection into a concrete file format is the job of a
//! [`DeckWriter`]. [`JsonDeckWriter`] writes the projection itself as JSON.

use std::path::Path;

use deck_core::{Element, ElementKind, FontWeight, Presentation, Slide, TextAlign};
use serde::Serialize;

use crate::error::RenderResult;

/// Pixel units per inch.
pub const PX_PER_INCH: f64 = 72.0;

/// Convert slide pixels to inches.
#[must_use]
pub fn px_to_inches(px: f64) -> f64 {
    px / PX_PER_INCH
}

/// A whole presentation in physical units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckProjection {
    /// Presentation title.
    pub title: String,
    /// Slides in presentation order.
    pub slides: Vec<ProjectedSlide>,
}

/// One projected slide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedSlide {
    /// Slide title.
    pub title: String,
    /// Shapes in z-order.
    pub shapes: Vec<ProjectedShape>,
}

/// One projected element with geometry in inches.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedShape {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Rotation in degrees.
    pub rotate: f64,
    /// Transparency in percent (0 is opaque).
    pub transparency: f64,
    /// Variant content.
    pub content: ShapeContent,
}

/// Geometric primitive for shape elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle.
    Rect,
    /// Ellipse.
    Ellipse,
    /// Straight line.
    Line,
}

/// Variant-specific attributes of a projected shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeContent {
    /// A text box.
    #[serde(rename_all = "camelCase")]
    Text {
        /// Text content.
        text: String,
        /// Font size in points.
        font_size: f64,
        /// Font face.
        font_face: String,
        /// Bold text.
        bold: bool,
        /// Text color.
        color: String,
        /// Horizontal alignment.
        align: TextAlign,
        /// Box fill behind the text.
        #[serde(skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
    },
    /// A geometric shape.
    #[serde(rename_all = "camelCase")]
    Shape {
        /// Primitive kind.
        shape: ShapeKind,
        /// Fill color.
        fill: String,
        /// Outline color.
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<String>,
        /// Outline width in points.
        line_width: f64,
    },
    /// An image.
    Image {
        /// Data URI or URL.
        data: String,
        /// Alternative text.
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl DeckProjection {
    /// Project every slide and element of a presentation.
    #[must_use]
    pub fn from_presentation(presentation: &Presentation) -> Self {
        let slides: Vec<ProjectedSlide> = presentation
            .slides()
            .iter()
            .map(ProjectedSlide::from_slide)
            .collect();
        tracing::debug!(
            slides = slides.len(),
            shapes = slides.iter().map(|s| s.shapes.len()).sum::<usize>(),
            "Projected presentation"
        );
        Self {
            title: presentation.title().to_string(),
            slides,
        }
    }
}

impl ProjectedSlide {
    /// Project a single slide.
    #[must_use]
    pub fn from_slide(slide: &Slide) -> Self {
        Self {
            title: slide.title.clone(),
            shapes: slide.elements().iter().map(ProjectedShape::from_element).collect(),
        }
    }
}

impl ProjectedShape {
    /// Project a single element.
    #[must_use]
    pub fn from_element(element: &Element) -> Self {
        let content = match element.kind() {
            ElementKind::Text(style) => ShapeContent::Text {
                text: style.text.clone(),
                font_size: style.font_size,
                font_face: style.font_family.clone(),
                bold: style.font_weight == FontWeight::Bold,
                color: style.fill.clone(),
                align: style.text_align,
                fill: style.background_color.clone(),
            },
            ElementKind::Rectangle(style) => shape(ShapeKind::Rect, style),
            ElementKind::Circle(style) => shape(ShapeKind::Ellipse, style),
            ElementKind::Line(style) => ShapeContent::Shape {
                shape: ShapeKind::Line,
                fill: style.fill.clone(),
                line: Some(style.stroke.clone().unwrap_or_else(|| style.fill.clone())),
                line_width: style.stroke_width,
            },
            ElementKind::Image(source) => ShapeContent::Image {
                data: source.src.clone(),
                alt: source.alt.clone(),
            },
        };

        Self {
            x: px_to_inches(element.x),
            y: px_to_inches(element.y),
            w: px_to_inches(element.width),
            h: px_to_inches(element.height),
            rotate: element.angle,
            transparency: (1.0 - element.opacity) * 100.0,
            content,
        }
    }
}

fn shape(kind: ShapeKind, style: &deck_core::ShapeStyle) -> ShapeContent {
    ShapeContent::Shape {
        shape: kind,
        fill: style.fill.clone(),
        line: style.stroke.clone(),
        line_width: style.stroke_width,
    }
}

/// Encodes a projection into a presentation file.
pub trait DeckWriter {
    /// File extension of the produced format.
    fn extension(&self) -> &'static str;

    /// Write the projection to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    fn write(&self, deck: &DeckProjection, out: &mut dyn std::io::Write) -> RenderResult<()>;

    /// Write the projection to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    fn write_to_path(&self, deck: &DeckProjection, path: &Path) -> RenderResult<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.write(deck, &mut file)?;
        std::io::Write::flush(&mut file)?;
        tracing::info!(path = %path.display(), slides = deck.slides.len(), "Wrote deck");
        Ok(())
    }
}

/// Writes the projection as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeckWriter;

impl DeckWriter for JsonDeckWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, deck: &DeckProjection, out: &mut dyn std::io::Write) -> RenderResult<()> {
        serde_json::to_writer_pretty(&mut *out, deck)
            .map_err(|e| crate::error::RenderError::Export(format!("deck encoding failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Bounds, DocumentStore};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_geometry_in_inches() {
        let element = Element::rectangle(Bounds::new(72.0, 144.0, 36.0, 720.0)).with_angle(30.0);
        let shape = ProjectedShape::from_element(&element);
        assert!(approx(shape.x, 1.0));
        assert!(approx(shape.y, 2.0));
        assert!(approx(shape.w, 0.5));
        assert!(approx(shape.h, 10.0));
        assert!(approx(shape.rotate, 30.0));
        assert!(approx(shape.transparency, 0.0));
        assert!(matches!(
            shape.content,
            ShapeContent::Shape { shape: ShapeKind::Rect, .. }
        ));
    }

    #[test]
    fn test_text_attributes_carried() {
        let mut element = Element::text("Title", 32.0, Bounds::new(0.0, 0.0, 720.0, 72.0));
        if let Some(style) = element.text_style_mut() {
            style.font_weight = FontWeight::Bold;
            style.text_align = TextAlign::Center;
        }
        let shape = ProjectedShape::from_element(&element);
        match shape.content {
            ShapeContent::Text {
                text,
                font_size,
                bold,
                align,
                ..
            } => {
                assert_eq!(text, "Title");
                assert!(approx(font_size, 32.0));
                assert!(bold);
                assert_eq!(align, TextAlign::Center);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_one_to_one_slides_and_shapes() {
        let mut store = DocumentStore::new();
        store.create_presentation();
        store.add_element(Element::circle(Bounds::new(0.0, 0.0, 72.0, 72.0)));
        store.add_slide();
        store.add_element(Element::image("data:image/png;base64,AA", Bounds::default()));
        store.add_element(Element::line(Bounds::new(0.0, 0.0, 72.0, 0.0)));

        let deck = DeckProjection::from_presentation(store.presentation().expect("presentation"));
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].shapes.len(), 1);
        assert_eq!(deck.slides[1].shapes.len(), 2);
        assert!(matches!(deck.slides[1].shapes[0].content, ShapeContent::Image { .. }));
    }

    #[test]
    fn test_json_writer() {
        let element = Element::circle(Bounds::new(0.0, 0.0, 72.0, 72.0)).with_opacity(0.5);
        let deck = DeckProjection {
            title: "Deck".to_string(),
            slides: vec![ProjectedSlide::from_slide(
                &Slide::new("One").with_element(element),
            )],
        };

        let mut out = Vec::new();
        JsonDeckWriter.write(&deck, &mut out).expect("write");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["title"], "Deck");
        assert_eq!(value["slides"][0]["shapes"][0]["content"]["type"], "shape");
        assert_eq!(value["slides"][0]["shapes"][0]["content"]["shape"], "ellipse");
        assert_eq!(value["slides"][0]["shapes"][0]["transparency"], 50.0);
        assert_eq!(JsonDeckWriter.extension(), "json");
    }
}
