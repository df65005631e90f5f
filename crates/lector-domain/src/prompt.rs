//! Prompt module - instruction text and active-preset tracking

use crate::preset::PresetId;

/// The prompt composer's state
///
/// Invariant: `active` is `Some(p)` only while `text == p.canonical_text()`.
/// Text equality is the sole test; identical text reached by any path yields
/// identical active-preset state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    active: Option<PresetId>,
}

impl Prompt {
    /// Empty prompt with no active preset
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the text with the preset's canonical string and mark it active
    pub fn select_preset(&mut self, preset: PresetId) {
        self.text = preset.canonical_text().to_string();
        self.active = Some(preset);
    }

    /// Replace the text, re-deriving the active preset by exact equality
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.active = PresetId::matching(&self.text);
    }

    /// Clear the text (and therefore the active preset)
    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    /// Current text, possibly empty
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Preset the text currently equals, if it was selected or typed exactly
    pub fn active_preset(&self) -> Option<PresetId> {
        self.active
    }

    /// Whether `preset` is the active one
    pub fn is_active(&self, preset: PresetId) -> bool {
        self.active == Some(preset)
    }

    /// Text to send to the backend
    ///
    /// `None` for blank text, which asks the backend to pick its own prompt.
    /// Non-blank text is sent exactly as typed.
    pub fn outbound(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            None
        } else {
            Some(self.text.clone())
        }
    }
}
