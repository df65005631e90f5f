//! The backend seam consumed by the session layer.

use crate::client::LectorClient;
use crate::error::SdkError;
use crate::wire::{ClearCacheReply, ExportDocument, ExtractReply};
use async_trait::async_trait;
use lector_domain::ExtractionRequest;

/// Trait for the remote extraction service
///
/// Implemented by [`LectorClient`] and by scripted doubles in tests.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Run extraction for a request snapshot
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractReply, SdkError>;

    /// Ask the backend to reclaim accelerator memory
    async fn clear_cache(&self) -> Result<ClearCacheReply, SdkError>;

    /// Fetch the last raw result for export
    async fn fetch_export(&self) -> Result<ExportDocument, SdkError>;
}

#[async_trait]
impl ExtractionBackend for LectorClient {
    async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractReply, SdkError> {
        LectorClient::extract(self, request).await
    }

    async fn clear_cache(&self) -> Result<ClearCacheReply, SdkError> {
        LectorClient::clear_cache(self).await
    }

    async fn fetch_export(&self) -> Result<ExportDocument, SdkError> {
        self.download_json().await
    }
}
