//! Persisted document format.
//!
//! The on-disk JSON mirrors [`Presentation`] field for field. Loading goes
//! through [`PresentationDocument`], which accepts anything shaped like a
//! JSON object and then reports exactly which required part is missing.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{DocumentError, DocumentResult};
use crate::presentation::{Presentation, PresentationId, DEFAULT_PRESENTATION_TITLE};
use crate::slide::{Slide, SlideId};

/// Loosely typed presentation document, as read from storage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationDocument {
    /// Presentation identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Presentation title.
    #[serde(default)]
    pub title: Option<String>,
    /// Slides, kept untyped until the array shape is confirmed.
    #[serde(default)]
    pub slides: Option<serde_json::Value>,
    /// Active slide identifier.
    #[serde(default)]
    pub active_slide_id: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp (RFC 3339).
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PresentationDocument {
    /// Validate and convert into a runtime presentation.
    ///
    /// Missing timestamps default to now; a missing title defaults to
    /// [`DEFAULT_PRESENTATION_TITLE`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::MissingField`] when `id`, `slides` or
    /// `activeSlideId` is absent, [`DocumentError::SlidesNotSequence`] when
    /// `slides` is not an array, [`DocumentError::Json`] when a slide or
    /// element does not match its schema, and any invariant violation
    /// reported by [`Presentation::from_parts`].
    pub fn into_presentation(self) -> DocumentResult<Presentation> {
        let id = self
            .id
            .as_deref()
            .and_then(PresentationId::parse)
            .ok_or(DocumentError::MissingField("id"))?;

        let slides = match self.slides {
            None | Some(serde_json::Value::Null) => {
                return Err(DocumentError::MissingField("slides"))
            }
            Some(value @ serde_json::Value::Array(_)) => {
                serde_json::from_value::<Vec<Slide>>(value)?
            }
            Some(_) => return Err(DocumentError::SlidesNotSequence),
        };

        let active_slide_id = self
            .active_slide_id
            .as_deref()
            .and_then(SlideId::parse)
            .ok_or(DocumentError::MissingField("activeSlideId"))?;

        let now = Utc::now();
        let created_at = self.created_at.unwrap_or(now);
        let updated_at = self.updated_at.unwrap_or(created_at);

        Presentation::from_parts(
            id,
            self.title
                .unwrap_or_else(|| DEFAULT_PRESENTATION_TITLE.to_string()),
            slides,
            active_slide_id,
            created_at,
            updated_at,
        )
    }
}
