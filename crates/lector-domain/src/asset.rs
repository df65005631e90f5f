//! Image asset module - the single image offered for extraction

use std::fmt;
use std::sync::Arc;

/// Image formats accepted by file intake
///
/// Only these extensions are offered to the backend; anything else is a
/// validation failure before any state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Portable Network Graphics (`.png`)
    Png,
    /// JPEG (`.jpg`, `.jpeg`)
    Jpeg,
    /// Graphics Interchange Format (`.gif`)
    Gif,
    /// Windows bitmap (`.bmp`)
    Bmp,
    /// WebP (`.webp`)
    Webp,
}

impl ImageFormat {
    /// All accepted formats
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Webp,
    ];

    /// Accepted file extensions, lowercase and without the dot
    pub const EXTENSIONS: [&'static str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Resolve a format from a file extension (case-insensitive, with or without a leading dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    /// Resolve a format from a file name by its final extension
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// The MIME type sent to the backend for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Check a declared MIME type against this format's family (`image/*`)
    pub fn accepts_mime(mime: &str) -> bool {
        mime.trim().to_lowercase().starts_with("image/")
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// The single image currently held by the session
///
/// Bytes are shared so an [`ExtractionRequest`](crate::ExtractionRequest) can
/// snapshot them without copying. The preview is a `data:` URI derived from the
/// bytes by file intake.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAsset {
    file_name: String,
    format: ImageFormat,
    bytes: Arc<[u8]>,
    preview: String,
}

impl ImageAsset {
    /// Create an asset from validated parts
    pub fn new(
        file_name: impl Into<String>,
        format: ImageFormat,
        bytes: impl Into<Arc<[u8]>>,
        preview: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            bytes: bytes.into(),
            preview: preview.into(),
        }
    }

    /// Original file name, as offered by the user
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Accepted image format
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type of the payload
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Raw payload
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the payload
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Displayable preview (`data:<mime>;base64,...`)
    pub fn preview(&self) -> &str {
        &self.preview
    }
}

// Bytes and preview are elided; they can be megabytes long.
impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
