//! System clipboard adapter.

use lector_domain::Clipboard;

/// Writes to the desktop clipboard
///
/// The platform handle is opened on first use, so headless sessions only fail
/// when a copy is actually attempted.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Create an adapter; no platform handle is opened yet.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    type Error = arboard::Error;

    fn set_text(&mut self, text: &str) -> Result<(), arboard::Error> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard.set_text(text.to_string())?;
        }
        Ok(())
    }
}
