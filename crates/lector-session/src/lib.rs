//! Lector Session
//!
//! Orchestrates one image-to-text extraction workbench: file intake, prompt
//! composition, the extraction state machine, the accelerator memory
//! reclaim trigger, result rendering, export and user notices.
//!
//! # Architecture
//!
//! ```text
//! select ─▶ FileIntake ─▶ ExtractionController ─submit─▶ spawned task ─▶ ExtractionBackend
//!                               ▲                              │
//!                               └──────── report channel ◀─────┘
//! ```
//!
//! The [`Workbench`] owns every piece of state. Backend calls never mutate it
//! directly; their reports are applied on the owner in arrival order, and a
//! report for a superseded request is dropped.
//!
//! # Example Usage
//!
//! ```no_run
//! use lector_domain::PresetId;
//! use lector_sdk::LectorClient;
//! use lector_session::{SessionConfig, Workbench};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(LectorClient::new("http://localhost:8000")?);
//! let mut workbench = Workbench::new(client, SessionConfig::default());
//!
//! workbench.select_file(Path::new("receipt.jpg")).await?;
//! workbench.select_preset(PresetId::Receipt);
//! workbench.submit();
//! workbench.settle().await;
//!
//! if let Some(result) = workbench.view().result {
//!     println!("{}", result.plain_text());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod export;
mod intake;
mod notify;
mod reclaim;
mod render;
mod view;
mod workbench;


pub use config::{SessionConfig, DEFAULT_EXPORT_FILE_NAME};
pub use controller::{
    Completion, ExtractionController, ExtractionOutcome, GENERIC_FAILURE, NO_TEXT_FALLBACK,
    SERVER_ERROR_FALLBACK, TIMEOUT_MESSAGE, TRANSPORT_MESSAGE,
};
pub use error::SessionError;
pub use export::{prompt_echo, DirectorySink, EXPORT_DONE_NOTICE, EXPORT_REJECTED_NOTICE};
pub use intake::{preview_data_uri, FileIntake, VALIDATION_NOTICE};
pub use notify::{Notice, NoticeKind, NotificationQueue};
pub use reclaim::{ReclaimController, CLEARED_NOTICE, CLEAR_TRANSPORT_NOTICE};
pub use render::{plain_text, RenderedResult, ResultRenderer};
pub use view::{ErrorView, ImageView, PresetView, PromptView, ViewModel};
pub use workbench::{
    Workbench, WorkbenchEvent, COPIED_NOTICE, COPY_FAILED_NOTICE, EXTRACTED_NOTICE,
    EXTRACT_FAILED_NOTICE, NOTHING_TO_COPY_NOTICE, OOM_NOTICE,
};
