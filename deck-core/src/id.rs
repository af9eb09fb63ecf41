//! Opaque string identifiers for presentations, slides and elements.
//!
//! Freshly created ids are UUID v4 strings. Loaded documents may carry any
//! non-empty string, so parsing only rejects the empty id.

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new unique id.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Wrap an existing id verbatim, rejecting blank strings.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                (!raw.trim().is_empty()).then(|| Self(raw.to_string()))
            }

            /// Borrow the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

opaque_id!(
    /// Unique identifier for an element.
    ElementId
);

opaque_id!(
    /// Unique identifier for a slide.
    SlideId
);

opaque_id!(
    /// Unique identifier for a presentation.
    PresentationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(SlideId::parse("").is_none());
        assert!(SlideId::parse("   ").is_none());
        assert_eq!(
            SlideId::parse("V1StGXR8_Z5jdHi6B-myT").map(|id| id.to_string()),
            Some("V1StGXR8_Z5jdHi6B-myT".to_string())
        );
    }

    #[test]
    fn test_parse_keeps_surrounding_whitespace() {
        let id = SlideId::parse(" s1 ").expect("non-blank");
        assert_eq!(id.as_str(), " s1 ");
        assert_eq!(id, SlideId::from(" s1 "));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = PresentationId::from("abc");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"abc\"");
    }
}
