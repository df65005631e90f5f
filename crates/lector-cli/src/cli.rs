//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use lector_domain::PresetId;
use std::path::PathBuf;

/// Lector CLI - Extract text from images with a vision-language backend.
#[derive(Debug, Parser)]
#[command(name = "lector")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Backend URL for this invocation (overrides the profile)
    #[arg(short, long, global = true, env = "LECTOR_SERVER")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (text only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract text from one image
    Extract(ExtractArgs),

    /// Ask the backend to release GPU memory
    ClearCache,

    /// Download the last raw result as JSON
    Export(ExportArgs),

    /// List the preset prompts
    Presets,

    /// Manage configuration profiles
    Profile(ProfileArgs),

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Image file (png, jpg, jpeg, gif, bmp, webp)
    pub image: PathBuf,

    /// Custom prompt text
    #[arg(short = 't', long, conflicts_with = "preset")]
    pub prompt: Option<String>,

    /// Preset prompt
    #[arg(short = 'P', long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Copy the extracted text to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Also download the raw result as JSON
    #[arg(long)]
    pub export: bool,

    /// Directory for the JSON download
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Target directory (defaults to the configured download directory)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Backend URL
        #[arg(short, long)]
        url: String,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Preset argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Identity card fields
    IdCard,
    /// Receipt line items and totals
    Receipt,
    /// Business card contact details
    BusinessCard,
    /// Table structure
    Table,
    /// Form fields and values
    Form,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<PresetArg> for PresetId {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::IdCard => PresetId::IdCard,
            PresetArg::Receipt => PresetId::Receipt,
            PresetArg::BusinessCard => PresetId::BusinessCard,
            PresetArg::Table => PresetId::Table,
            PresetArg::Form => PresetId::Form,
        }
    }
}
