//! Lector Domain Layer
//!
//! Core model for the image-to-text extraction client. This crate has ZERO
//! external dependencies and defines the value objects, state machines and
//! trait interfaces that the SDK, session and CLI layers build on.
//!
//! ## Key Concepts
//!
//! - **Image Asset**: the single image offered for extraction, with its preview
//! - **Prompt**: instruction text plus the preset it currently matches, if any
//! - **Session State**: tagged union `Idle | Ready | Submitting | Succeeded | Failed`
//! - **Extraction Request**: immutable snapshot tagged with a sequence number
//! - **Reclaim State**: the independent `Idle | Clearing` maintenance toggle
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure transitions only; no I/O
//! - Infrastructure boundaries (clipboard, downloads) are traits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod asset;
pub mod preset;
pub mod prompt;
pub mod reclaim;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use asset::{ImageAsset, ImageFormat};
pub use preset::PresetId;
pub use prompt::Prompt;
pub use reclaim::ReclaimState;
pub use session::{
    ExtractionRequest, ExtractionResult, FailureKind, RequestSeq, SessionPhase, SessionState,
};
pub use traits::{Clipboard, DownloadSink};
