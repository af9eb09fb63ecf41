//! Slide elements - the text, shape and image content placed on a slide.
//!
//! An [`Element`] carries common geometry plus exactly one [`ElementKind`]
//! variant. The id and the variant are fixed at construction; everything else
//! is edited through [`ElementPatch`](crate::ElementPatch).

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
pub use crate::id::ElementId;

/// Default font family for new text.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";

/// Default text color.
pub const DEFAULT_TEXT_FILL: &str = "#212121";

/// Font size used when a requested size is not positive.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Default shape fill color.
pub const DEFAULT_SHAPE_FILL: &str = "#1976D2";

/// Default shape stroke width.
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Renderer-specific passthrough properties, stored and replayed verbatim.
pub type Passthrough = serde_json::Map<String, serde_json::Value>;

/// The tag of an element variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Text box.
    Text,
    /// Rectangle shape.
    Rectangle,
    /// Circle shape.
    Circle,
    /// Straight line.
    Line,
    /// Bitmap image.
    Image,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Line => "line",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// Font weight for text elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Horizontal alignment for text elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center.
    Center,
    /// Align to the right edge.
    Right,
}

/// Attributes of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Text content.
    pub text: String,
    /// Font size in pixels, always positive.
    pub font_size: f64,
    /// Font family name.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Text color.
    #[serde(default = "default_text_fill")]
    pub fill: String,
    /// Optional background color behind the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
}

impl TextStyle {
    /// Create text attributes with default font, color and alignment.
    ///
    /// A font size that is not a positive finite number falls back to
    /// [`DEFAULT_FONT_SIZE`].
    #[must_use]
    pub fn new(text: impl Into<String>, font_size: f64) -> Self {
        let font_size = if font_size.is_finite() && font_size > 0.0 {
            font_size
        } else {
            DEFAULT_FONT_SIZE
        };
        Self {
            text: text.into(),
            font_size,
            font_family: default_font_family(),
            font_weight: FontWeight::Normal,
            fill: default_text_fill(),
            background_color: None,
            text_align: TextAlign::Left,
        }
    }
}

/// Attributes shared by rectangle, circle and line elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Fill color.
    #[serde(default = "default_shape_fill")]
    pub fill: String,
    /// Optional stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    /// Stroke width, never negative.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: default_shape_fill(),
            stroke: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }
}

/// Attributes of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Data URI or URL of the image.
    pub src: String,
    /// Optional alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ImageSource {
    /// Create an image source without alt text.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: None,
        }
    }
}

/// The variant-specific content of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text box.
    Text(TextStyle),
    /// A rectangle.
    Rectangle(ShapeStyle),
    /// A circle inscribed in the element bounds.
    Circle(ShapeStyle),
    /// A line from the top-left to the bottom-right of the bounds.
    Line(ShapeStyle),
    /// A bitmap image.
    Image(ImageSource),
}

impl ElementKind {
    /// The variant tag.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Text(_) => ElementType::Text,
            Self::Rectangle(_) => ElementType::Rectangle,
            Self::Circle(_) => ElementType::Circle,
            Self::Line(_) => ElementType::Line,
            Self::Image(_) => ElementType::Image,
        }
    }
}

/// Position and size of an element in slide pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Bounds {
    /// Create bounds from position and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Replace non-finite components with zero.
    #[must_use]
    pub fn finite(self) -> Self {
        let f = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self::new(f(self.x), f(self.y), f(self.width), f(self.height))
    }
}

/// A piece of content on a slide.
///
/// The derived `PartialEq` compares every attribute, which is what history
/// snapshots and persistence round-trips need. Identity checks compare
/// [`Element::id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    id: ElementId,
    /// Left edge in pixels.
    pub x: f64,
    /// Top edge in pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    /// Opacity in [0, 1].
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Renderer passthrough properties.
    #[serde(rename = "fabricProps", default, skip_serializing_if = "Passthrough::is_empty")]
    pub passthrough: Passthrough,
    #[serde(flatten)]
    kind: ElementKind,
}

impl Element {
    /// Create an element with a fresh id, no rotation and full opacity.
    #[must_use]
    pub fn new(kind: ElementKind, bounds: Bounds) -> Self {
        Self::with_id(ElementId::new(), kind, bounds)
    }

    /// Create an element with a caller-chosen id.
    ///
    /// Non-finite bounds become zero and a negative or non-finite stroke
    /// width becomes zero.
    #[must_use]
    pub fn with_id(id: ElementId, mut kind: ElementKind, bounds: Bounds) -> Self {
        let bounds = bounds.finite();
        if let ElementKind::Rectangle(style)
        | ElementKind::Circle(style)
        | ElementKind::Line(style) = &mut kind
        {
            if !(style.stroke_width.is_finite() && style.stroke_width >= 0.0) {
                style.stroke_width = 0.0;
            }
        }
        if let ElementKind::Text(style) = &mut kind {
            if !(style.font_size.is_finite() && style.font_size > 0.0) {
                style.font_size = DEFAULT_FONT_SIZE;
            }
        }
        Self {
            id,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            angle: 0.0,
            opacity: 1.0,
            passthrough: Passthrough::new(),
            kind,
        }
    }

    /// Create a text element with default styling.
    #[must_use]
    pub fn text(content: impl Into<String>, font_size: f64, bounds: Bounds) -> Self {
        Self::new(ElementKind::Text(TextStyle::new(content, font_size)), bounds)
    }

    /// Create a rectangle with default styling.
    #[must_use]
    pub fn rectangle(bounds: Bounds) -> Self {
        Self::new(ElementKind::Rectangle(ShapeStyle::default()), bounds)
    }

    /// Create a circle with default styling.
    #[must_use]
    pub fn circle(bounds: Bounds) -> Self {
        Self::new(ElementKind::Circle(ShapeStyle::default()), bounds)
    }

    /// Create a line with default styling.
    #[must_use]
    pub fn line(bounds: Bounds) -> Self {
        Self::new(ElementKind::Line(ShapeStyle::default()), bounds)
    }

    /// Create an image element.
    #[must_use]
    pub fn image(src: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(ElementKind::Image(ImageSource::new(src)), bounds)
    }

    /// Set the rotation angle in degrees. A non-finite angle is ignored.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        if angle.is_finite() {
            self.angle = angle;
        }
        self
    }

    /// Set the opacity, clamped to [0, 1]. A NaN opacity is ignored.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        if !opacity.is_nan() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        self
    }

    /// Add a renderer passthrough property.
    #[must_use]
    pub fn with_passthrough(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.passthrough.insert(key.into(), value);
        self
    }

    /// The element id.
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// The variant content.
    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// The variant tag.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Position and size.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    /// Text attributes, if this is a text element.
    #[must_use]
    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::Text(style) => Some(style),
            _ => None,
        }
    }

    /// Mutable text attributes, if this is a text element.
    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            ElementKind::Text(style) => Some(style),
            _ => None,
        }
    }

    /// Shape attributes, if this is a rectangle, circle or line.
    #[must_use]
    pub fn shape_style(&self) -> Option<&ShapeStyle> {
        match &self.kind {
            ElementKind::Rectangle(style)
            | ElementKind::Circle(style)
            | ElementKind::Line(style) => Some(style),
            _ => None,
        }
    }

    /// Mutable shape attributes, if this is a rectangle, circle or line.
    pub fn shape_style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match &mut self.kind {
            ElementKind::Rectangle(style)
            | ElementKind::Circle(style)
            | ElementKind::Line(style) => Some(style),
            _ => None,
        }
    }

    /// Image attributes, if this is an image.
    #[must_use]
    pub fn image_source(&self) -> Option<&ImageSource> {
        match &self.kind {
            ElementKind::Image(source) => Some(source),
            _ => None,
        }
    }

    /// Mutable image attributes, if this is an image.
    pub fn image_source_mut(&mut self) -> Option<&mut ImageSource> {
        match &mut self.kind {
            ElementKind::Image(source) => Some(source),
            _ => None,
        }
    }

    /// Clone this element under a new id, shifted by `(offset, offset)`.
    #[must_use]
    pub fn duplicate(&self, offset: f64) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::new();
        copy.x += offset;
        copy.y += offset;
        copy
    }

    /// Check numeric attribute ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidElement`] for non-finite geometry,
    /// opacity outside [0, 1], a non-positive font size or a negative
    /// stroke width.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let invalid = |reason: &str| DocumentError::InvalidElement {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        if self.id.as_str().is_empty() {
            return Err(invalid("empty id"));
        }
        let geometry = [self.x, self.y, self.width, self.height, self.angle];
        if geometry.iter().any(|v| !v.is_finite()) {
            return Err(invalid("geometry must be finite"));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(invalid("opacity must be within [0, 1]"));
        }
        match &self.kind {
            ElementKind::Text(style) if !(style.font_size.is_finite() && style.font_size > 0.0) => {
                Err(invalid("font size must be positive"))
            }
            ElementKind::Rectangle(style)
            | ElementKind::Circle(style)
            | ElementKind::Line(style)
                if !(style.stroke_width.is_finite() && style.stroke_width >= 0.0) =>
            {
                Err(invalid("stroke width must not be negative"))
            }
            _ => Ok(()),
        }
    }
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_text_fill() -> String {
    DEFAULT_TEXT_FILL.to_string()
}

fn default_shape_fill() -> String {
    DEFAULT_SHAPE_FILL.to_string()
}

const fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

const fn default_opacity() -> f64 {
    1.0
}
