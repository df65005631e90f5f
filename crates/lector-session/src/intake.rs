//! File intake: validation, loading and preview generation for the single image

use crate::error::SessionError;
use base64::{engine::general_purpose::STANDARD, Engine};
use lector_domain::{ImageAsset, ImageFormat};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Notice shown when a non-image file is offered
pub const VALIDATION_NOTICE: &str = "Please select an image file";

/// Holds at most one image asset
///
/// A new selection replaces the previous one in a single assignment; nothing
/// is touched until the new file has been validated and read.
#[derive(Debug, Default)]
pub struct FileIntake {
    current: Option<Arc<ImageAsset>>,
}

impl FileIntake {
    /// Create an empty intake
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a file name (and declared MIME type, when known) against the accepted set
    pub fn validate(file_name: &str, declared_mime: Option<&str>) -> Result<ImageFormat, SessionError> {
        let format = ImageFormat::from_file_name(file_name).ok_or_else(|| {
            SessionError::Validation(format!(
                "Unsupported file '{}': expected one of {}",
                file_name,
                ImageFormat::EXTENSIONS.join(", ")
            ))
        })?;

        if let Some(mime) = declared_mime {
            if !ImageFormat::accepts_mime(mime) {
                return Err(SessionError::Validation(format!(
                    "Unsupported media type '{}' for '{}'",
                    mime, file_name
                )));
            }
        }

        Ok(format)
    }

    /// Build an asset from in-memory bytes
    pub fn build(file_name: &str, declared_mime: Option<&str>, bytes: Vec<u8>) -> Result<ImageAsset, SessionError> {
        let format = Self::validate(file_name, declared_mime)?;
        if bytes.is_empty() {
            return Err(SessionError::Validation(format!("'{}' is empty", file_name)));
        }

        let preview = preview_data_uri(format, &bytes);
        Ok(ImageAsset::new(file_name, format, bytes, preview))
    }

    /// Read and validate a file from disk
    ///
    /// The extension is checked before any I/O. Preview encoding runs on the
    /// blocking pool so large images do not stall the event loop.
    pub async fn read(path: &Path) -> Result<ImageAsset, SessionError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SessionError::Validation(format!("Not a file: {}", path.display())))?
            .to_string();

        let format = Self::validate(&file_name, None)?;

        debug!("Reading image: {:?}", path);
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(SessionError::Validation(format!("'{}' is empty", file_name)));
        }

        let (bytes, preview) = tokio::task::spawn_blocking(move || {
            let preview = preview_data_uri(format, &bytes);
            (bytes, preview)
        })
        .await?;

        Ok(ImageAsset::new(file_name, format, bytes, preview))
    }

    /// Install `asset`, replacing any previous one
    pub fn install(&mut self, asset: ImageAsset) -> Arc<ImageAsset> {
        let asset = Arc::new(asset);
        if let Some(previous) = self.current.replace(Arc::clone(&asset)) {
            debug!("Replaced image {} with {}", previous.file_name(), asset.file_name());
        }
        asset
    }

    /// Drop the current asset
    pub fn remove(&mut self) -> Option<Arc<ImageAsset>> {
        self.current.take()
    }

    /// Current asset, if any
    pub fn current(&self) -> Option<&Arc<ImageAsset>> {
        self.current.as_ref()
    }
}

/// Encode `bytes` as a `data:` URI for display
pub fn preview_data_uri(format: ImageFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_rejects_other_types() {
        assert!(matches!(
            FileIntake::validate("report.pdf", None),
            Err(SessionError::Validation(_))
        ));
        assert!(matches!(
            FileIntake::validate("photo.png", Some("text/plain")),
            Err(SessionError::Validation(_))
        ));
        assert_eq!(FileIntake::validate("photo.JPEG", Some("image/jpeg")).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_build_generates_preview() {
        let asset = FileIntake::build("dot.gif", None, b"GIF89a".to_vec()).unwrap();
        assert_eq!(asset.preview(), "data:image/gif;base64,R0lGODlh");
        assert_eq!(asset.mime_type(), "image/gif");
    }

    #[test]
    fn test_build_rejects_empty() {
        assert!(FileIntake::build("empty.png", None, Vec::new()).is_err());
    }

    #[test]
    fn test_install_replaces_atomically() {
        let mut intake = FileIntake::new();
        intake.install(FileIntake::build("a.png", None, vec![1]).unwrap());
        intake.install(FileIntake::build("b.png", None, vec![2]).unwrap());

        let current = intake.current().unwrap();
        assert_eq!(current.file_name(), "b.png");
        assert_eq!(current.preview(), preview_data_uri(ImageFormat::Png, &[2]));

        assert!(intake.remove().is_some());
        assert!(intake.current().is_none());
    }

    #[tokio::test]
    async fn test_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.webp");
        std::fs::File::create(&path).unwrap().write_all(b"RIFF").unwrap();

        let asset = FileIntake::read(&path).await.unwrap();
        assert_eq!(asset.file_name(), "scan.webp");
        assert_eq!(asset.bytes(), b"RIFF");
        assert!(asset.preview().starts_with("data:image/webp;base64,"));
    }

    #[tokio::test]
    async fn test_read_rejects_before_io() {
        // The file does not exist; validation must fail first
        let err = FileIntake::read(Path::new("/nonexistent/notes.txt")).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
    }
}
