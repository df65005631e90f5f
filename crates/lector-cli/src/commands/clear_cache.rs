//! Clear-cache command implementation.

use crate::error::Result;
use crate::output::Formatter;
use lector_sdk::ExtractionBackend;
use lector_session::{NoticeKind, Workbench, WorkbenchEvent};

/// Execute the clear-cache command.
pub async fn execute_clear_cache<B: ExtractionBackend + 'static>(
    workbench: &mut Workbench<B>,
    formatter: &Formatter,
) -> Result<()> {
    if !workbench.clear_cache() {
        println!("{}", formatter.warning("A clear request is already in progress"));
        return Ok(());
    }

    for event in workbench.settle().await {
        if let WorkbenchEvent::CacheCleared { kind, message } = event {
            match kind {
                NoticeKind::Success => println!("{}", formatter.success(&message)),
                NoticeKind::Error => eprintln!("{}", formatter.error(&message)),
                NoticeKind::Info => println!("{}", formatter.info(&message)),
            }
        }
    }

    // Already reported above
    workbench.take_notices();
    Ok(())
}
