//! Wire types for the backend endpoints and their interpretation.

use crate::error::SdkError;
use serde::{Deserialize, Serialize};

/// Body of `POST /extract`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Extracted text (may carry markup)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Failure description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Interpreted outcome of a completed `POST /extract` exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractReply {
    /// 2xx with a non-empty `result`
    Extracted(String),
    /// Anything else that still produced an HTTP response
    Rejected {
        /// Status code of the response
        status: u16,
        /// Server-supplied `error`, when present and non-empty
        message: Option<String>,
    },
}

impl ExtractReply {
    /// Interpret a status code and raw body
    ///
    /// A non-success status is a rejection regardless of body shape. A success
    /// status with an unparsable body is a malformed response.
    pub fn interpret(status: u16, body: &[u8]) -> Result<Self, SdkError> {
        let parsed = serde_json::from_slice::<ExtractResponse>(body);

        if !(200..300).contains(&status) {
            let message = parsed.ok().and_then(|r| non_empty(r.error));
            return Ok(ExtractReply::Rejected { status, message });
        }

        let response = parsed?;
        match non_empty(response.result) {
            Some(text) => Ok(ExtractReply::Extracted(text)),
            None => Ok(ExtractReply::Rejected {
                status,
                message: non_empty(response.error),
            }),
        }
    }
}

/// Body of `POST /clear_cache`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    /// Whether the backend reports success (older backends omit it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Human-readable outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description, on error statuses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Interpreted outcome of `POST /clear_cache`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearCacheReply {
    /// Whether memory was reclaimed
    pub success: bool,
    /// Best available message
    pub message: Option<String>,
}

impl ClearCacheReply {
    /// Interpret a status code and raw body
    ///
    /// A 2xx response counts as success unless the body says `"success": false`.
    /// The client only interprets 2xx exchanges; anything else is an
    /// [`SdkError::Http`].
    pub fn interpret(status: u16, body: &[u8]) -> Self {
        let parsed = serde_json::from_slice::<ClearCacheResponse>(body).unwrap_or_default();
        let ok_status = (200..300).contains(&status);

        Self {
            success: ok_status && parsed.success.unwrap_or(true),
            message: non_empty(parsed.message).or_else(|| non_empty(parsed.error)),
        }
    }
}

/// Document served by `GET /download_json`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument(serde_json::Value);

impl ExportDocument {
    /// Wrap a parsed document
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse a raw body
    pub fn from_slice(body: &[u8]) -> Result<Self, SdkError> {
        Ok(Self(serde_json::from_slice(body)?))
    }

    /// The prompt the backend used, when reported and non-empty
    pub fn prompt_used(&self) -> Option<&str> {
        self.0
            .get("prompt_used")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Underlying JSON value
    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Pretty-printed bytes (two-space indentation)
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, SdkError> {
        Ok(serde_json::to_vec_pretty(&self.0)?)
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_success() {
        let reply = ExtractReply::interpret(200, br#"{"result": "<p>Hello</p>"}"#).unwrap();
        assert_eq!(reply, ExtractReply::Extracted("<p>Hello</p>".into()));
    }

    #[test]
    fn test_extract_error_with_ok_status() {
        let reply = ExtractReply::interpret(200, br#"{"error": "no text found"}"#).unwrap();
        assert_eq!(
            reply,
            ExtractReply::Rejected {
                status: 200,
                message: Some("no text found".into())
            }
        );
    }

    #[test]
    fn test_extract_empty_result_is_rejected() {
        let reply = ExtractReply::interpret(200, br#"{"result": ""}"#).unwrap();
        assert_eq!(reply, ExtractReply::Rejected { status: 200, message: None });
    }

    #[test]
    fn test_extract_error_status_ignores_result() {
        let reply = ExtractReply::interpret(500, br#"{"result": "partial", "error": "CUDA out of memory"}"#).unwrap();
        assert_eq!(
            reply,
            ExtractReply::Rejected {
                status: 500,
                message: Some("CUDA out of memory".into())
            }
        );
    }

    #[test]
    fn test_extract_error_status_unparsable_body() {
        let reply = ExtractReply::interpret(502, b"<html>Bad Gateway</html>").unwrap();
        assert_eq!(reply, ExtractReply::Rejected { status: 502, message: None });
    }

    #[test]
    fn test_extract_ok_status_unparsable_body_is_malformed() {
        let err = ExtractReply::interpret(200, b"not json").unwrap_err();
        assert!(matches!(err, SdkError::MalformedResponse(_)));
    }

    #[test]
    fn test_clear_cache_without_success_field() {
        let reply = ClearCacheReply::interpret(200, br#"{"message": "Cache cleared successfully"}"#);
        assert!(reply.success);
        assert_eq!(reply.message.as_deref(), Some("Cache cleared successfully"));
    }

    #[test]
    fn test_clear_cache_reported_failure() {
        let reply = ClearCacheReply::interpret(200, br#"{"success": false, "message": "busy"}"#);
        assert!(!reply.success);

        let reply = ClearCacheReply::interpret(500, br#"{"error": "driver gone"}"#);
        assert!(!reply.success);
        assert_eq!(reply.message.as_deref(), Some("driver gone"));
    }

    #[test]
    fn test_export_prompt_used() {
        let doc = ExportDocument::from_slice(br#"{"full_text": "hi", "prompt_used": "Extract"}"#).unwrap();
        assert_eq!(doc.prompt_used(), Some("Extract"));

        let doc = ExportDocument::from_slice(br#"{"prompt_used": ""}"#).unwrap();
        assert_eq!(doc.prompt_used(), None);

        let doc = ExportDocument::from_slice(b"{}").unwrap();
        assert_eq!(doc.prompt_used(), None);
    }

    #[test]
    fn test_export_pretty_printing() {
        let doc = ExportDocument::new(serde_json::json!({"full_text": "hi"}));
        let text = String::from_utf8(doc.to_pretty_json().unwrap()).unwrap();
        assert_eq!(text, "{\n  \"full_text\": \"hi\"\n}");
    }
}
