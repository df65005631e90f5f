//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use lector_domain::{PresetId, Prompt};
use lector_session::{Notice, NoticeKind, ViewModel};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn output_format(&self) -> OutputFormat {
        self.format
    }

    /// Format the extraction result (or error) of a view.
    pub fn format_result(&self, view: &ViewModel) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
            OutputFormat::Quiet => Ok(view
                .result
                .as_ref()
                .map(|r| r.plain_text().to_string())
                .unwrap_or_default()),
            OutputFormat::Table => {
                if let Some(result) = &view.result {
                    Ok(result.plain_text().to_string())
                } else if let Some(error) = &view.error {
                    Ok(self.error(&error.message))
                } else if view.submitting {
                    Ok(self.info("Extraction in progress"))
                } else {
                    Ok(self.colorize("No result yet.", "yellow"))
                }
            }
        }
    }

    /// Format the full workbench status.
    pub fn format_view(&self, view: &ViewModel) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
            OutputFormat::Quiet => Ok(view.phase.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);

                builder.push_record(["Phase".to_string(), view.phase.to_string()]);
                let image = match &view.image {
                    Some(image) => format!("{} ({}, {} bytes)", image.file_name, image.mime_type, image.size_bytes),
                    None => "-".to_string(),
                };
                builder.push_record(["Image".to_string(), image]);

                let prompt = if view.prompt.text.trim().is_empty() {
                    "(backend default)".to_string()
                } else {
                    truncate(&view.prompt.text, 60)
                };
                builder.push_record(["Prompt".to_string(), prompt]);
                builder.push_record([
                    "Preset".to_string(),
                    view.prompt.active_preset.unwrap_or("custom").to_string(),
                ]);
                builder.push_record(["Can submit".to_string(), yes_no(view.can_submit)]);
                builder.push_record(["Clearing cache".to_string(), yes_no(view.clearing_cache)]);
                if let Some(error) = &view.error {
                    builder.push_record(["Error".to_string(), format!("{} ({})", error.message, error.kind)]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format the preset list, marking the active one.
    pub fn format_presets(&self, prompt: &Prompt) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let presets: Vec<serde_json::Value> = PresetId::ALL
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "id": p.as_str(),
                            "label": p.label(),
                            "prompt": p.canonical_text(),
                            "active": prompt.is_active(*p),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&presets)?)
            }
            OutputFormat::Quiet => Ok(PresetId::ALL
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["", "ID", "Label", "Prompt"]);
                for preset in PresetId::ALL.iter() {
                    let marker = if prompt.is_active(*preset) { "*" } else { "" };
                    builder.push_record([
                        marker,
                        preset.as_str(),
                        preset.label(),
                        preset.canonical_text(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format one notice by its kind.
    pub fn notice(&self, notice: &Notice) -> String {
        match notice.kind {
            NoticeKind::Success => self.success(&notice.message),
            NoticeKind::Error => self.error(&notice.message),
            NoticeKind::Info => self.info(&notice.message),
        }
    }

    /// Print notices to stderr (JSON output carries them in the document instead).
    pub fn print_notices(&self, notices: &[Notice]) {
        if self.format == OutputFormat::Json {
            return;
        }
        for notice in notices {
            eprintln!("{}", self.notice(notice));
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn yes_no(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}
