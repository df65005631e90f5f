//! Presets command implementation.

use crate::error::Result;
use crate::output::Formatter;
use lector_domain::Prompt;

/// Execute the presets command.
pub fn execute_presets(prompt: &Prompt, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_presets(prompt)?);
    Ok(())
}
