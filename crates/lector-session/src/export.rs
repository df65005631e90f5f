//! Export of the server-held raw result

use lector_domain::DownloadSink;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Export saved
pub const EXPORT_DONE_NOTICE: &str = "JSON file downloaded";

/// Server answered the export fetch with an error status
pub const EXPORT_REJECTED_NOTICE: &str = "Failed to download JSON";

/// Characters of `prompt_used` echoed back in the info notice
pub const PROMPT_ECHO_CHARS: usize = 50;

/// Info notice naming the prompt the backend used
pub fn prompt_echo(prompt: &str) -> String {
    let head: String = prompt.chars().take(PROMPT_ECHO_CHARS).collect();
    format!("Using prompt: {}...", head)
}

/// Saves downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Save into `dir`, creating it on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    type Error = io::Error;

    fn save(&self, file_name: &str, contents: &[u8]) -> Result<PathBuf, io::Error> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        debug!("Wrote {} bytes to {:?}", contents.len(), path);
        Ok(path)
    }
}
