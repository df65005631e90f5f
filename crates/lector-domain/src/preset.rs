//! Preset module - the fixed set of named prompt presets

/// Identifier of a preset prompt
///
/// Each preset has one canonical instruction string. Selecting a preset
/// overwrites the prompt text with that string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PresetId {
    /// Identity documents
    IdCard,
    /// Shop receipts
    Receipt,
    /// Business cards
    BusinessCard,
    /// Tabular data
    Table,
    /// Forms with fields and values
    Form,
}

impl PresetId {
    /// All presets in display order
    pub const ALL: [PresetId; 5] = [
        PresetId::IdCard,
        PresetId::Receipt,
        PresetId::BusinessCard,
        PresetId::Table,
        PresetId::Form,
    ];

    /// Stable identifier (`id-card`, `receipt`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            PresetId::IdCard => "id-card",
            PresetId::Receipt => "receipt",
            PresetId::BusinessCard => "business-card",
            PresetId::Table => "table",
            PresetId::Form => "form",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            PresetId::IdCard => "ID Card",
            PresetId::Receipt => "Receipt",
            PresetId::BusinessCard => "Business Card",
            PresetId::Table => "Table",
            PresetId::Form => "Form",
        }
    }

    /// The canonical instruction string for this preset
    pub fn canonical_text(&self) -> &'static str {
        match self {
            PresetId::IdCard => ID_CARD,
            PresetId::Receipt => RECEIPT,
            PresetId::BusinessCard => BUSINESS_CARD,
            PresetId::Table => TABLE,
            PresetId::Form => FORM,
        }
    }

    /// Find the preset whose canonical string equals `text` exactly
    pub fn matching(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.canonical_text() == text)
    }

    /// Parse an identifier; accepts `id-card`, `id_card` and `idcard` spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "id-card" | "idcard" => Some(PresetId::IdCard),
            "receipt" => Some(PresetId::Receipt),
            "business-card" | "businesscard" => Some(PresetId::BusinessCard),
            "table" => Some(PresetId::Table),
            "form" => Some(PresetId::Form),
            _ => None,
        }
    }
}

impl std::fmt::Display for PresetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown preset: {}", s))
    }
}

const ID_CARD: &str = "Extract all information from this ID card including document title, ID number, full name, date of birth, place of birth, gender, nationality, and any other fields present. For non-English text, include translations if possible.";

const RECEIPT: &str = "Extract all details from this receipt including store name, date, all items with prices, subtotal, tax, and total amount.";

const BUSINESS_CARD: &str = "Extract all information from this business card including name, title, company, address, phone number, email, and website.";

const TABLE: &str = "Extract this table data preserving its structure and alignment. Include all headers and values.";

const FORM: &str = "Extract all fields and their values from this form document. Preserve the form structure.";
