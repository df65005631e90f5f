//! Trait definitions for external interactions
//!
//! These traits define the boundaries between session logic and the host
//! environment. Implementations live in the session and CLI crates.

use std::path::PathBuf;

/// Trait for writing text to a clipboard
///
/// Implemented by the front end (system clipboard, test doubles)
pub trait Clipboard {
    /// Error type for clipboard operations
    type Error: std::fmt::Display;

    /// Replace the clipboard contents with `text`
    fn set_text(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Trait for delivering a client-side download
///
/// Implemented by the session layer (directory sink) and test doubles
pub trait DownloadSink {
    /// Error type for save operations
    type Error: std::fmt::Display;

    /// Persist `contents` under `file_name`, returning where it landed
    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, Self::Error>;
}
