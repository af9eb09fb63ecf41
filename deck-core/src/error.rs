//! Error types for document, file and image-resolution operations.
//!
//! Stale slide or element ids are not errors: the store absorbs them as
//! no-ops. Only malformed input and failed I/O surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for document validation.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

/// A loaded presentation document failed validation.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The input was not well-formed JSON or did not match the element schema.
    #[error("Malformed presentation document: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field was absent or empty.
    #[error("Invalid presentation format: missing `{0}`")]
    MissingField(&'static str),

    /// `slides` was present but not an array.
    #[error("Invalid presentation format: `slides` must be an array")]
    SlidesNotSequence,

    /// The slide list was empty.
    #[error("Invalid presentation format: a presentation needs at least one slide")]
    NoSlides,

    /// `activeSlideId` does not name a slide in the document.
    #[error("Active slide not found: {0}")]
    UnknownActiveSlide(String),

    /// Two slides, or two elements on one slide, share an id.
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// An element carried an out-of-range attribute.
    #[error("Invalid element {id}: {reason}")]
    InvalidElement {
        /// Offending element id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// A file read, write or pick failed.
#[derive(Debug, Error)]
pub enum FileError {
    /// Reading or writing the file failed.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// Path that was being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents were not a valid presentation.
    #[error("Invalid presentation file format: {0}")]
    Format(#[from] DocumentError),

    /// The picked file was not of the expected type.
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),
}

/// An image source could not be turned into a bitmap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The source scheme is not supported by the resolver.
    #[error("Unsupported image source: {0}")]
    Unsupported(String),

    /// Reading the source failed.
    #[error("Failed to read image source: {0}")]
    Io(String),

    /// The bytes could not be decoded as an image.
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_wraps_document_error() {
        let err = FileError::from(DocumentError::MissingField("id"));
        assert!(err.to_string().contains("missing `id`"));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = FileError::Io {
            path: PathBuf::from("/tmp/deck.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/deck.json"));
    }
}
