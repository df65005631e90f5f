//! Lector client implementation.

use crate::error::SdkError;
use crate::wire::{ClearCacheReply, ExportDocument, ExtractReply};
use lector_domain::ExtractionRequest;
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// Backend URL used when no profile overrides it
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Extraction endpoint
pub const EXTRACT_PATH: &str = "/extract";

/// Memory reclaim endpoint
pub const CLEAR_CACHE_PATH: &str = "/clear_cache";

/// Last raw result endpoint
pub const DOWNLOAD_JSON_PATH: &str = "/download_json";

/// Lector SDK client
///
/// Holds no per-session state; every call is independent. Timeouts are left
/// to the caller so the success path never changes shape.
#[derive(Debug, Clone)]
pub struct LectorClient {
    base_url: String,
    http: reqwest::Client,
}

impl LectorClient {
    /// Create a new client for `base_url`
    ///
    /// The URL must be absolute `http` or `https`.
    pub fn new(base_url: &str) -> Result<Self, SdkError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| SdkError::InvalidRequest(format!("Invalid server URL '{}': {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SdkError::InvalidRequest(format!(
                "Unsupported scheme '{}' in server URL",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("lector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SdkError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(base_url, http))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Submit an image (and optional prompt) for extraction
    ///
    /// `Ok` whenever the backend answered, even with an error status; `Err`
    /// only when no usable response came back.
    pub async fn extract(&self, request: &ExtractionRequest) -> Result<ExtractReply, SdkError> {
        let url = self.endpoint(EXTRACT_PATH);

        let image = Part::bytes(request.image.to_vec())
            .file_name(request.file_name.clone())
            .mime_str(request.mime_type)?;

        let mut form = Form::new().part("image", image);
        if let Some(prompt) = &request.prompt {
            form = form.text("prompt", prompt.clone());
        }

        debug!(
            "POST {} ({} bytes, prompt: {})",
            url,
            request.image.len(),
            request.prompt.is_some()
        );

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!("{} answered HTTP {} ({} bytes)", url, status, body.len());

        ExtractReply::interpret(status, &body)
    }

    /// Ask the backend to release accelerator memory
    pub async fn clear_cache(&self) -> Result<ClearCacheReply, SdkError> {
        let url = self.endpoint(CLEAR_CACHE_PATH);
        debug!("POST {}", url);

        let response = self.http.post(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // A failed exchange is not a backend verdict
        if !status.is_success() {
            return Err(SdkError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(ClearCacheReply::interpret(status.as_u16(), &body))
    }

    /// Fetch the server-held record of the last extraction
    pub async fn download_json(&self) -> Result<ExportDocument, SdkError> {
        let url = self.endpoint(DOWNLOAD_JSON_PATH);
        debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(SdkError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        ExportDocument::from_slice(&body)
    }
}

/// `error` (or `message`) string from a JSON failure body
fn error_message(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
