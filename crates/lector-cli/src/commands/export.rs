//! Export command implementation.

use crate::cli::ExportArgs;
use crate::error::Result;
use crate::output::Formatter;
use lector_sdk::ExtractionBackend;
use lector_session::{DirectorySink, Workbench};
use std::path::Path;

/// Execute the export command.
pub async fn execute_export<B: ExtractionBackend + 'static>(
    args: ExportArgs,
    workbench: &mut Workbench<B>,
    download_dir: &Path,
    formatter: &Formatter,
) -> Result<()> {
    let dir = args.dir.as_deref().unwrap_or(download_dir);
    let saved = workbench.export(&DirectorySink::new(dir)).await;

    formatter.print_notices(&workbench.take_notices());
    if let Some(path) = saved {
        println!("{}", path.display());
    }
    Ok(())
}
