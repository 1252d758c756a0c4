//! Core image types: formats and encoded image payloads.

use crate::error::{ResumePhotoError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media type assumed when a payload does not declare one.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
    /// GIF format.
    Gif,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Gif => "image/gif",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Maps a MIME type to a known format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            "image/gif" => Some(Self::Gif),
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

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        None
    }
}

/// Image bytes plus their declared media type.
///
/// This is what gets uploaded, sent to the model, and handed back as the
/// result. Data URIs are only a transport form; see [`EncodedImage::from_data_uri`]
/// and [`EncodedImage::to_data_uri`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    media_type: String,
    #[serde(with = "base64_bytes")]
    data: Vec<u8>,
}

impl EncodedImage {
    /// Creates an image from raw bytes and a media type.
    pub fn new(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    /// Creates an image from raw bytes, detecting the media type from magic
    /// bytes and falling back to `image/jpeg`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let media_type = ImageFormat::from_magic_bytes(&data)
            .map(|f| f.mime_type())
            .unwrap_or(DEFAULT_MEDIA_TYPE);
        Self::new(media_type, data)
    }

    /// Parses a `data:<mediatype>;base64,<payload>` URI or a bare base64 string.
    ///
    /// The media type comes from the prefix when one is present and
    /// well-formed, otherwise it defaults to `image/jpeg`.
    pub fn from_data_uri(input: &str) -> Result<Self> {
        let input = input.trim();
        let (media_type, payload) = split_data_uri(input)?;

        let data = decode_base64_lenient(payload)
            .map_err(|e| ResumePhotoError::InvalidImage(e.to_string()))?;
        if data.is_empty() {
            return Err(ResumePhotoError::InvalidImage("image payload is empty".into()));
        }

        Ok(Self::new(media_type, data))
    }

    /// Reads an image file. The media type is detected from magic bytes,
    /// then from the file extension, then defaults to `image/jpeg`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        if data.is_empty() {
            return Err(ResumePhotoError::InvalidImage(format!(
                "{} is empty",
                path.display()
            )));
        }

        let media_type = ImageFormat::from_magic_bytes(&data)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .map(|f| f.mime_type())
            .unwrap_or(DEFAULT_MEDIA_TYPE);

        Ok(Self::new(media_type, data))
    }

    /// Returns the declared media type.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Returns the raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the known format for the declared media type, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.media_type)
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Encodes the image data as standard base64.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the image as a data URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.to_base64())
    }

    /// Saves the image bytes to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

// Payloads can be megabytes; keep Debug output readable.
impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Splits a data URI into its media type and base64 payload.
fn split_data_uri(input: &str) -> Result<(&str, &str)> {
    let Some(rest) = input.strip_prefix("data:") else {
        return Ok((DEFAULT_MEDIA_TYPE, input));
    };

    let Some(pos) = rest.find(";base64,") else {
        return Err(ResumePhotoError::InvalidImage(
            "data URI is not base64-encoded".into(),
        ));
    };

    let declared = &rest[..pos];
    let media_type = if is_media_type(declared) {
        declared
    } else {
        DEFAULT_MEDIA_TYPE
    };

    Ok((media_type, &rest[pos + 8..]))
}

fn is_media_type(s: &str) -> bool {
    match s.split_once('/') {
        Some((kind, sub)) => {
            !kind.is_empty()
                && !sub.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Decodes base64 that may contain whitespace or lack padding.
pub(crate) fn decode_base64_lenient(input: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if let Ok(data) = base64::engine::general_purpose::STANDARD.decode(&cleaned) {
        return Ok(data);
    }

    base64::engine::general_purpose::STANDARD_NO_PAD.decode(cleaned.trim_end_matches('='))
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}
