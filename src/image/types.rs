//! Image formats and the data-URL encoded image passed between components.

use crate::error::{Result, SelfieError};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File extensions offered by the upload picker.
pub const UPLOAD_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy).
    #[default]
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }

    /// Subtype as it may appear in a data-URL prefix (`jpg` is accepted for JPEG).
    fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

/// An image held in memory as a self-describing data URL
/// (`data:image/png;base64,...`).
///
/// The payload is never validated: whatever the user picked is carried
/// through to the service as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_url: String,
}

impl EncodedImage {
    /// Wraps an existing encoded string. A missing or unrecognised prefix is allowed.
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self {
            data_url: data_url.into(),
        }
    }

    /// Builds a data URL from an already base64-encoded payload.
    pub fn from_base64(format: ImageFormat, payload: &str) -> Self {
        Self {
            data_url: format!("data:{};base64,{}", format.mime_type(), payload),
        }
    }

    /// Encodes raw bytes under the given format's media type.
    pub fn from_bytes(data: &[u8], format: ImageFormat) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(data);
        Self::from_base64(format, &payload)
    }

    /// Reads an uploaded file. The media type comes from the extension, then
    /// the magic bytes, then falls back to JPEG.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .or_else(|| ImageFormat::from_magic_bytes(&data))
            .unwrap_or_default();
        tracing::debug!(path = %path.display(), ?format, bytes = data.len(), "loaded upload");
        Ok(Self::from_bytes(&data, format))
    }

    /// The full data-URL string.
    pub fn as_str(&self) -> &str {
        &self.data_url
    }

    /// Format named by the prefix, if the prefix is present and recognised.
    pub fn format(&self) -> Option<ImageFormat> {
        self.split_prefix().0
    }

    /// Media type to send upstream; JPEG when the prefix is absent or unknown.
    pub fn media_type(&self) -> &'static str {
        self.format().unwrap_or(ImageFormat::Jpeg).mime_type()
    }

    /// Raw base64 payload with any recognised prefix removed.
    pub fn payload(&self) -> &str {
        self.split_prefix().1
    }

    /// Decodes the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64_lenient(self.payload()).map_err(|e| SelfieError::Decode(e.to_string()))
    }

    fn split_prefix(&self) -> (Option<ImageFormat>, &str) {
        let Some(rest) = self.data_url.strip_prefix("data:image/") else {
            return (None, &self.data_url);
        };
        let Some((subtype, payload)) = rest.split_once(";base64,") else {
            return (None, &self.data_url);
        };
        match ImageFormat::from_subtype(subtype) {
            Some(format) => (Some(format), payload),
            None => (None, &self.data_url),
        }
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads run to megabytes; keep logs readable.
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

/// Decodes base64 that may carry whitespace or lack padding.
fn decode_base64_lenient(input: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if let Ok(data) = base64::engine::general_purpose::STANDARD.decode(&cleaned) {
        return Ok(data);
    }

    base64::engine::general_purpose::STANDARD_NO_PAD.decode(&cleaned)
}
