//! Image source resolution.
//!
//! Element image sources are `data:` URIs (uploads) or local file paths
//! (files written by other tools). Remote URLs are not fetched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine;
use deck_core::{ImageResolver, ResolveError, ResolvedImage};
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// GIF.
    Gif,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// The MIME type, if known.
    #[must_use]
    pub fn mime(self) -> Option<&'static str> {
        match self {
            Self::Png => Some("image/png"),
            Self::Jpeg => Some("image/jpeg"),
            Self::Gif => Some("image/gif"),
            Self::WebP => Some("image/webp"),
            Self::Unknown => None,
        }
    }
}

/// Dimensions and format of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Detected format.
    pub format: ImageFormat,
}

/// Decode image bytes far enough to validate them and read their size.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn probe_image(data: &[u8]) -> RenderResult<ImageInfo> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
    })
}

/// A parsed `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared MIME type, if any.
    pub mime: Option<String>,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Parse a `data:` URI (base64 or percent-encoded).
///
/// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
///
/// # Errors
///
/// Returns an error if the URI is malformed.
pub fn parse_data_uri(uri: &str) -> RenderResult<DataUri> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Err(RenderError::Resource("Not a data URI".to_string()));
    };

    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let mut parts = metadata.split(';');
    let mime = parts
        .next()
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    let is_base64 = parts.any(|p| p == "base64");

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?
    } else {
        percent_decode(payload)?
    };

    Ok(DataUri { mime, bytes })
}

/// Build a base64 `data:` URI.
#[must_use]
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Load an image from a data URI.
///
/// # Errors
///
/// Returns an error if the data URI is malformed or the image cannot be decoded.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<ImageInfo> {
    probe_image(&parse_data_uri(uri)?.bytes)
}

/// Percent-decoding.
fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = bytes
                .get(i + 1..i + 3)
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}

/// Whether `src` names a remote resource.
fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Resolves element image sources from data URIs and the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct ImageSourceResolver {
    base_dir: Option<PathBuf>,
}

impl ImageSourceResolver {
    /// Create a resolver that reads relative paths from the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver that reads relative paths from `base_dir`.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Where a relative source path is looked up.
    #[must_use]
    pub fn path_for(&self, src: &str) -> PathBuf {
        let path = Path::new(src.strip_prefix("file://").unwrap_or(src));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Read the raw bytes behind a source.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unsupported`] for remote URLs, and a resource or
    /// I/O error when the source cannot be read.
    pub async fn read_source(&self, src: &str) -> RenderResult<Vec<u8>> {
        if src.starts_with("data:") {
            return Ok(parse_data_uri(src)?.bytes);
        }
        if is_remote(src) {
            return Err(RenderError::Unsupported(src.to_string()));
        }
        let path = self.path_for(src);
        debug!(path = %path.display(), "Reading image source");
        Ok(tokio::fs::read(&path).await?)
    }

    /// Read a source and return it as an embeddable `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns the [`read_source`](Self::read_source) error, or a resource
    /// error when the format cannot be determined.
    pub async fn to_data_uri(&self, src: &str) -> RenderResult<String> {
        if src.starts_with("data:") {
            return Ok(src.to_string());
        }
        let bytes = self.read_source(src).await?;
        let format = ImageFormat::from_magic_bytes(&bytes);
        let mime = format
            .mime()
            .or_else(|| {
                let ext = self.path_for(src);
                ImageFormat::from_extension(ext.extension()?.to_str()?).mime()
            })
            .ok_or_else(|| RenderError::Resource(format!("Unknown image format: {src}")))?;
        Ok(encode_data_uri(mime, &bytes))
    }
}

#[async_trait]
impl ImageResolver for ImageSourceResolver {
    async fn resolve(&self, src: &str) -> Result<ResolvedImage, ResolveError> {
        let bytes = self.read_source(src).await?;
        let info = probe_image(&bytes)?;
        Ok(ResolvedImage {
            src: src.to_string(),
            natural_width: info.width,
            natural_height: info.height,
        })
    }
}
