//! The presentation: an ordered, never-empty list of slides.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, DocumentResult};
pub use crate::id::PresentationId;
use crate::schema::PresentationDocument;
use crate::slide::{Slide, SlideId};

/// Title given to fresh presentations.
pub const DEFAULT_PRESENTATION_TITLE: &str = "Untitled Presentation";

/// Title for the slide at 1-based `position`.
#[must_use]
pub fn slide_title(position: usize) -> String {
    format!("Slide {position}")
}

/// A complete presentation document.
///
/// Invariants, upheld by every constructor and by the store:
/// the slide list is never empty and `active_slide_id` names one of its slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PresentationDocument")]
pub struct Presentation {
    id: PresentationId,
    title: String,
    slides: Vec<Slide>,
    active_slide_id: SlideId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Presentation {
    /// Create a fresh presentation holding one blank slide.
    #[must_use]
    pub fn new() -> Self {
        let slide = Slide::new(slide_title(1));
        let now = Utc::now();
        Self {
            id: PresentationId::new(),
            title: DEFAULT_PRESENTATION_TITLE.to_string(),
            active_slide_id: slide.id().clone(),
            slides: vec![slide],
            created_at: now,
            updated_at: now,
        }
    }

    /// Assemble a presentation from loaded parts, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NoSlides`] for an empty slide list,
    /// [`DocumentError::UnknownActiveSlide`] when the active id does not
    /// resolve, [`DocumentError::DuplicateId`] for repeated slide ids or
    /// repeated element ids within a slide, and
    /// [`DocumentError::InvalidElement`] for out-of-range element attributes.
    pub fn from_parts(
        id: PresentationId,
        title: String,
        slides: Vec<Slide>,
        active_slide_id: SlideId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DocumentResult<Self> {
        if slides.is_empty() {
            return Err(DocumentError::NoSlides);
        }

        let mut slide_ids = std::collections::HashSet::new();
        for slide in &slides {
            if !slide_ids.insert(slide.id()) {
                return Err(DocumentError::DuplicateId(slide.id().to_string()));
            }
            let mut element_ids = std::collections::HashSet::new();
            for element in slide.elements() {
                if !element_ids.insert(element.id()) {
                    return Err(DocumentError::DuplicateId(element.id().to_string()));
                }
                element.validate()?;
            }
        }

        if !slide_ids.contains(&active_slide_id) {
            return Err(DocumentError::UnknownActiveSlide(active_slide_id.to_string()));
        }

        Ok(Self {
            id,
            title,
            slides,
            active_slide_id,
            created_at,
            updated_at,
        })
    }

    /// Parse and validate a presentation from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] for malformed input and the
    /// validation errors of [`PresentationDocument::into_presentation`].
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        let document: PresentationDocument = serde_json::from_str(json)?;
        document.into_presentation()
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The presentation id.
    #[must_use]
    pub fn id(&self) -> &PresentationId {
        &self.id
    }

    /// The presentation title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Slides in order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides, always at least one.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Find a slide by id.
    #[must_use]
    pub fn slide(&self, id: &SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id() == id)
    }

    /// Position of a slide.
    #[must_use]
    pub fn slide_index(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id() == id)
    }

    /// The active slide id.
    #[must_use]
    pub fn active_slide_id(&self) -> &SlideId {
        &self.active_slide_id
    }

    /// The active slide.
    #[must_use]
    pub fn active_slide(&self) -> Option<&Slide> {
        self.slide(&self.active_slide_id)
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last content change.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub(crate) fn slide_mut(&mut self, id: &SlideId) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id() == id)
    }

    pub(crate) fn active_slide_mut(&mut self) -> Option<&mut Slide> {
        let id = self.active_slide_id.clone();
        self.slide_mut(&id)
    }

    pub(crate) fn push_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Remove a slide, keeping the list non-empty and the active id valid.
    ///
    /// Returns `false` if the id is unknown.
    pub(crate) fn remove_slide(&mut self, id: &SlideId) -> bool {
        let Some(index) = self.slide_index(id) else {
            return false;
        };
        self.slides.remove(index);

        if self.slides.is_empty() {
            let replacement = Slide::new(slide_title(1));
            self.active_slide_id = replacement.id().clone();
            self.slides.push(replacement);
        } else if self.active_slide_id == *id {
            let next = index.min(self.slides.len() - 1);
            self.active_slide_id = self.slides[next].id().clone();
        }
        true
    }

    /// Switch the active slide; `false` if the id is unknown.
    pub(crate) fn set_active_slide(&mut self, id: &SlideId) -> bool {
        if self.slide(id).is_none() {
            return false;
        }
        self.active_slide_id = id.clone();
        true
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<PresentationDocument> for Presentation {
    type Error = DocumentError;

    fn try_from(document: PresentationDocument) -> Result<Self, Self::Error> {
        document.into_presentation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_slides() -> Presentation {
        let mut p = Presentation::new();
        p.push_slide(Slide::new(slide_title(2)));
        p.push_slide(Slide::new(slide_title(3)));
        p
    }

    #[test]
    fn test_new_has_one_active_slide() {
        let p = Presentation::new();
        assert_eq!(p.slide_count(), 1);
        assert_eq!(p.title(), DEFAULT_PRESENTATION_TITLE);
        assert_eq!(p.active_slide().map(|s| s.title.as_str()), Some("Slide 1"));
        assert_eq!(p.created_at(), p.updated_at());
    }

    #[test]
    fn test_remove_active_middle_slide_selects_same_index() {
        let mut p = three_slides();
        let middle = p.slides()[1].id().clone();
        let last = p.slides()[2].id().clone();
        assert!(p.set_active_slide(&middle));

        assert!(p.remove_slide(&middle));
        assert_eq!(p.active_slide_id(), &last);
    }

    #[test]
    fn test_remove_active_last_slide_selects_new_last() {
        let mut p = three_slides();
        let middle = p.slides()[1].id().clone();
        let last = p.slides()[2].id().clone();
        assert!(p.set_active_slide(&last));

        assert!(p.remove_slide(&last));
        assert_eq!(p.active_slide_id(), &middle);
    }

    #[test]
    fn test_remove_inactive_slide_keeps_active() {
        let mut p = three_slides();
        let first = p.slides()[0].id().clone();
        let last = p.slides()[2].id().clone();

        assert!(p.remove_slide(&last));
        assert_eq!(p.active_slide_id(), &first);
    }

    #[test]
    fn test_remove_only_slide_synthesizes_replacement() {
        let mut p = Presentation::new();
        let only = p.slides()[0].id().clone();

        assert!(p.remove_slide(&only));
        assert_eq!(p.slide_count(), 1);
        assert_ne!(p.active_slide_id(), &only);
        assert!(p.active_slide().is_some());
    }

    #[test]
    fn test_remove_unknown_slide_is_noop() {
        let mut p = three_slides();
        let before = p.clone();
        assert!(!p.remove_slide(&SlideId::from("missing")));
        assert_eq!(p, before);
    }

    #[test]
    fn test_from_parts_rejects_dangling_active_id() {
        let now = Utc::now();
        let result = Presentation::from_parts(
            PresentationId::new(),
            "t".to_string(),
            vec![Slide::new("a")],
            SlideId::from("nope"),
            now,
            now,
        );
        assert!(matches!(result, Err(DocumentError::UnknownActiveSlide(_))));
    }

    #[test]
    fn test_json_round_trip_is_equal() {
        let p = three_slides();
        let json = p.to_json().expect("serialize");
        let restored = Presentation::from_json(&json).expect("parse");
        assert_eq!(restored, p);
    }
}
