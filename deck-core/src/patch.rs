//! Partial element updates.
//!
//! A patch is a shallow merge: provided fields overwrite, absent fields are
//! kept. The element variant is never part of a patch. Fields that belong to
//! another variant (a font size sent to a rectangle) are dropped and reported
//! back in [`PatchOutcome::ignored`] rather than stored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::element::{Element, ElementKind, FontWeight, Passthrough, TextAlign};

/// A set of optional attribute overrides for an element.
///
/// Nullable attributes use `Option<Option<T>>`: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    /// New left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// New opacity, clamped to [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Replacement passthrough properties.
    #[serde(rename = "fabricProps", default, skip_serializing_if = "Option::is_none")]
    pub passthrough: Option<Passthrough>,

    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Font size, must be positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Font weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// Fill color, for text and shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Text background color.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_color: Option<Option<String>>,
    /// Text alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,

    /// Shape stroke color.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke: Option<Option<String>>,
    /// Shape stroke width, must not be negative.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,

    /// Image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Image alt text.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt: Option<Option<String>>,
}

/// What applying a patch did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Whether any attribute changed value.
    pub changed: bool,
    /// Fields that were dropped: foreign to the variant or out of range.
    pub ignored: Vec<&'static str>,
}

impl ElementPatch {
    /// A patch that moves an element.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A patch carrying full geometry, as reported by a canvas transform.
    #[must_use]
    pub fn geometry(x: f64, y: f64, width: f64, height: f64, angle: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            angle: Some(angle),
            ..Self::default()
        }
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into `element`.
    pub fn apply_to(&self, element: &mut Element) -> PatchOutcome {
        let mut outcome = PatchOutcome::default();

        set_finite(&mut element.x, self.x, "x", &mut outcome);
        set_finite(&mut element.y, self.y, "y", &mut outcome);
        set_finite(&mut element.width, self.width, "width", &mut outcome);
        set_finite(&mut element.height, self.height, "height", &mut outcome);
        set_finite(&mut element.angle, self.angle, "angle", &mut outcome);
        match self.opacity {
            Some(opacity) if opacity.is_finite() => {
                set(&mut element.opacity, opacity.clamp(0.0, 1.0), &mut outcome);
            }
            Some(_) => outcome.ignored.push("opacity"),
            None => {}
        }
        if let Some(passthrough) = &self.passthrough {
            set(&mut element.passthrough, passthrough.clone(), &mut outcome);
        }

        let is_text = matches!(element.kind(), ElementKind::Text(_));
        let is_shape = element.shape_style().is_some();
        let is_image = matches!(element.kind(), ElementKind::Image(_));

        if let Some(style) = element.text_style_mut() {
            if let Some(text) = &self.text {
                set(&mut style.text, text.clone(), &mut outcome);
            }
            match self.font_size {
                Some(size) if size.is_finite() && size > 0.0 => {
                    set(&mut style.font_size, size, &mut outcome);
                }
                Some(_) => outcome.ignored.push("fontSize"),
                None => {}
            }
            if let Some(family) = &self.font_family {
                set(&mut style.font_family, family.clone(), &mut outcome);
            }
            if let Some(weight) = self.font_weight {
                set(&mut style.font_weight, weight, &mut outcome);
            }
            if let Some(fill) = &self.fill {
                set(&mut style.fill, fill.clone(), &mut outcome);
            }
            if let Some(background) = &self.background_color {
                set(&mut style.background_color, background.clone(), &mut outcome);
            }
            if let Some(align) = self.text_align {
                set(&mut style.text_align, align, &mut outcome);
            }
        }

        if let Some(style) = element.shape_style_mut() {
            if let Some(fill) = &self.fill {
                set(&mut style.fill, fill.clone(), &mut outcome);
            }
            if let Some(stroke) = &self.stroke {
                set(&mut style.stroke, stroke.clone(), &mut outcome);
            }
            match self.stroke_width {
                Some(width) if width.is_finite() && width >= 0.0 => {
                    set(&mut style.stroke_width, width, &mut outcome);
                }
                Some(_) => outcome.ignored.push("strokeWidth"),
                None => {}
            }
        }

        if let Some(source) = element.image_source_mut() {
            if let Some(src) = &self.src {
                set(&mut source.src, src.clone(), &mut outcome);
            }
            if let Some(alt) = &self.alt {
                set(&mut source.alt, alt.clone(), &mut outcome);
            }
        }

        let foreign: [(&'static str, bool, bool); 10] = [
            ("text", self.text.is_some(), is_text),
            ("fontSize", self.font_size.is_some(), is_text),
            ("fontFamily", self.font_family.is_some(), is_text),
            ("fontWeight", self.font_weight.is_some(), is_text),
            ("backgroundColor", self.background_color.is_some(), is_text),
            ("textAlign", self.text_align.is_some(), is_text),
            ("fill", self.fill.is_some(), is_text || is_shape),
            ("stroke", self.stroke.is_some() || self.stroke_width.is_some(), is_shape),
            ("src", self.src.is_some(), is_image),
            ("alt", self.alt.is_some(), is_image),
        ];
        outcome.ignored.extend(
            foreign
                .iter()
                .filter(|(_, provided, applies)| *provided && !*applies)
                .map(|(name, _, _)| *name),
        );

        outcome
    }
}

fn set<T: PartialEq>(slot: &mut T, value: T, outcome: &mut PatchOutcome) {
    if *slot != value {
        *slot = value;
        outcome.changed = true;
    }
}

fn set_finite(slot: &mut f64, value: Option<f64>, name: &'static str, outcome: &mut PatchOutcome) {
    match value {
        Some(v) if v.is_finite() => set(slot, v, outcome),
        Some(_) => outcome.ignored.push(name),
        None => {}
    }
}

/// Distinguish an explicit `null` (clear) from an absent key (keep).
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
