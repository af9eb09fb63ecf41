//! Loading and saving presentation files, and validating picked images.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{FileError, FileResult};
use crate::presentation::Presentation;
use crate::store::DocumentStore;

/// Fallback file stem for untitled presentations.
const DEFAULT_FILE_STEM: &str = "presentation";

/// Outcome of a user-driven file pick.
///
/// Cancelling is not a failure; it resolves to "no change".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome<T> {
    /// The user picked something.
    Picked(T),
    /// The user dismissed the picker.
    Cancelled,
}

impl<T> PickOutcome<T> {
    /// Transform the picked value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PickOutcome<U> {
        match self {
            Self::Picked(value) => PickOutcome::Picked(f(value)),
            Self::Cancelled => PickOutcome::Cancelled,
        }
    }

    /// The picked value, if any.
    #[must_use]
    pub fn picked(self) -> Option<T> {
        match self {
            Self::Picked(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

impl<T> From<Option<T>> for PickOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Cancelled, Self::Picked)
    }
}

/// File name offered when saving: the title, or `presentation`, plus `.json`.
#[must_use]
pub fn suggested_file_name(presentation: &Presentation) -> String {
    let title = presentation.title().trim();
    let stem = if title.is_empty() {
        DEFAULT_FILE_STEM
    } else {
        title
    };
    format!("{stem}.json")
}

/// Write a presentation as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`FileError::Io`] if the file cannot be written.
pub fn save_to_path(presentation: &Presentation, path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    let json = presentation.to_json()?;
    std::fs::write(path, json).map_err(|source| {
        warn!(path = %path.display(), error = %source, "Failed to save presentation");
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(path = %path.display(), presentation = %presentation.id(), "Saved presentation");
    Ok(())
}

/// Read and validate a presentation file.
///
/// # Errors
///
/// Returns [`FileError::Io`] if the file cannot be read and
/// [`FileError::Format`] if it is not a valid presentation.
pub fn load_from_path(path: impl AsRef<Path>) -> FileResult<Presentation> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let presentation = Presentation::from_json(&json)?;
    info!(path = %path.display(), presentation = %presentation.id(), "Read presentation");
    Ok(presentation)
}

/// Load a picked file into the store.
///
/// A cancelled pick leaves the store untouched and returns `Ok(false)`.
///
/// # Errors
///
/// Returns the [`load_from_path`] error; the store is left unchanged.
pub fn open_picked(store: &mut DocumentStore, pick: PickOutcome<PathBuf>) -> FileResult<bool> {
    let PickOutcome::Picked(path) = pick else {
        return Ok(false);
    };
    let presentation = load_from_path(&path)?;
    store.load_presentation(presentation);
    Ok(true)
}

/// Save the store's presentation to a picked path.
///
/// Returns `Ok(false)` for a cancelled pick or when no presentation is open.
///
/// # Errors
///
/// Returns the [`save_to_path`] error.
pub fn save_picked(store: &DocumentStore, pick: PickOutcome<PathBuf>) -> FileResult<bool> {
    let (PickOutcome::Picked(path), Some(presentation)) = (pick, store.presentation()) else {
        return Ok(false);
    };
    save_to_path(presentation, path)?;
    Ok(true)
}

/// A user-picked image, already read into a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    data_uri: String,
    file_name: String,
}

impl ImageUpload {
    /// Accept a picked file if its MIME type is an image type.
    ///
    /// # Errors
    ///
    /// Returns [`FileError::InvalidFileType`] when `mime_type` does not start
    /// with `image/`.
    pub fn new(
        mime_type: &str,
        data_uri: impl Into<String>,
        file_name: impl Into<String>,
    ) -> FileResult<Self> {
        if !mime_type.starts_with("image/") {
            return Err(FileError::InvalidFileType(mime_type.to_string()));
        }
        Ok(Self {
            data_uri: data_uri.into(),
            file_name: file_name.into(),
        })
    }

    /// The encoded image.
    #[must_use]
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    /// The original file name, used as alt text.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}
