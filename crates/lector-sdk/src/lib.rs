//! Lector Rust SDK
//!
//! Client library for the image-to-text extraction backend.
//!
//! # Endpoints
//!
//! - `POST /extract`: multipart `image` (+ optional `prompt`), answers `{"result": ...}` or `{"error": ...}`
//! - `POST /clear_cache`: asks the backend to release accelerator memory
//! - `GET /download_json`: the last raw result held by the server
//!
//! # Example
//!
//! ```no_run
//! use lector_domain::{ExtractionRequest, RequestSeq};
//! use lector_sdk::{ExtractReply, LectorClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), lector_sdk::SdkError> {
//! let client = LectorClient::new("http://localhost:8000")?;
//!
//! let request = ExtractionRequest {
//!     seq: RequestSeq::FIRST,
//!     file_name: "receipt.png".to_string(),
//!     mime_type: "image/png",
//!     image: Arc::from(std::fs::read("receipt.png").unwrap_or_default()),
//!     prompt: None,
//! };
//!
//! match client.extract(&request).await? {
//!     ExtractReply::Extracted(text) => println!("{}", text),
//!     ExtractReply::Rejected { message, .. } => eprintln!("{:?}", message),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod backend;
mod client;
mod error;
mod wire;

pub use backend::ExtractionBackend;
pub use client::{
    LectorClient, CLEAR_CACHE_PATH, DEFAULT_SERVER_URL, DOWNLOAD_JSON_PATH, EXTRACT_PATH,
};
pub use error::SdkError;
pub use wire::{ClearCacheReply, ClearCacheResponse, ExportDocument, ExtractReply, ExtractResponse};
