//! Extraction session controller
//!
//! Owns the [`SessionState`] and the request sequence counter. Requests leave
//! through [`ExtractionController::submit`]; their outcomes come back through
//! [`ExtractionController::complete`], which discards anything that no longer
//! matches the outstanding request.

use lector_domain::{
    ExtractionRequest, ExtractionResult, FailureKind, ImageAsset, RequestSeq, SessionPhase,
    SessionState,
};
use lector_sdk::{ExtractReply, SdkError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backend answered 2xx without text or an error string
pub const NO_TEXT_FALLBACK: &str = "No text was extracted from the image.";

/// Backend answered with an error status and no error string
pub const SERVER_ERROR_FALLBACK: &str = "An error occurred while processing the image.";

/// The call itself failed
pub const TRANSPORT_MESSAGE: &str = "An error occurred. Please try again later.";

/// Last-resort message when a failure carries no text at all
pub const GENERIC_FAILURE: &str =
    "No text could be extracted from the image. Please try another image or adjust your prompt.";

/// The configured bound elapsed
pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";

/// What came back for a request
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// The backend produced an HTTP response
    Reply(ExtractReply),
    /// No usable response
    Transport(SdkError),
    /// The session's own bound elapsed first
    TimedOut,
}

impl ExtractionOutcome {
    /// Classify the result of a backend call
    pub fn from_call(result: Result<ExtractReply, SdkError>) -> Self {
        match result {
            Ok(reply) => ExtractionOutcome::Reply(reply),
            Err(SdkError::Timeout) => ExtractionOutcome::TimedOut,
            Err(e) => ExtractionOutcome::Transport(e),
        }
    }

    /// Map onto the user-facing result
    ///
    /// Transport details are logged, never shown.
    pub fn into_result(self) -> ExtractionResult {
        match self {
            ExtractionOutcome::Reply(ExtractReply::Extracted(text)) => ExtractionResult::Success { text },
            ExtractionOutcome::Reply(ExtractReply::Rejected { status, message }) => {
                let fallback = if (200..300).contains(&status) {
                    NO_TEXT_FALLBACK
                } else {
                    SERVER_ERROR_FALLBACK
                };
                failure(message.unwrap_or_else(|| fallback.to_string()), FailureKind::Backend)
            }
            ExtractionOutcome::Transport(e) => {
                warn!("Extraction call failed: {}", e);
                failure(TRANSPORT_MESSAGE.to_string(), FailureKind::Transport)
            }
            ExtractionOutcome::TimedOut => {
                warn!("Extraction call timed out");
                failure(TIMEOUT_MESSAGE.to_string(), FailureKind::TimedOut)
            }
        }
    }
}

fn failure(message: String, kind: FailureKind) -> ExtractionResult {
    let message = if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    };
    ExtractionResult::Failure { message, kind }
}

/// Result of feeding an outcome to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The outcome was applied; the session is now in this phase
    Applied(SessionPhase),
    /// The outcome belonged to a superseded request and was dropped
    Stale,
}

/// The extraction session state machine
#[derive(Debug)]
pub struct ExtractionController {
    state: SessionState,
    next_seq: RequestSeq,
    latest_submitted: Option<RequestSeq>,
}

impl Default for ExtractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionController {
    /// Start in Idle
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            next_seq: RequestSeq::FIRST,
            latest_submitted: None,
        }
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Sequence number of the most recent submission
    pub fn latest_submitted(&self) -> Option<RequestSeq> {
        self.latest_submitted
    }

    /// Outstanding request, if any
    pub fn pending(&self) -> Option<RequestSeq> {
        self.state.pending()
    }

    /// An image was selected; any result, error or outstanding request is dropped
    pub fn select_image(&mut self, image: Arc<ImageAsset>) {
        if let Some(seq) = self.state.pending() {
            debug!("Request {} superseded by new image", seq);
        }
        let state = std::mem::take(&mut self.state);
        self.state = state.with_image(image);
        debug!("Session -> {}", self.state.phase());
    }

    /// The image was removed; back to Idle
    pub fn remove_image(&mut self) {
        if let Some(seq) = self.state.pending() {
            debug!("Request {} abandoned by image removal", seq);
        }
        let state = std::mem::take(&mut self.state);
        self.state = state.without_image();
        debug!("Session -> {}", self.state.phase());
    }

    /// Start a request if the state allows it
    ///
    /// Returns `None` (and changes nothing) when there is no image or a
    /// request is already outstanding.
    pub fn submit(&mut self, prompt: Option<String>) -> Option<ExtractionRequest> {
        let seq = self.next_seq;
        let next = self.state.begin(seq)?;
        let image = next.image()?;
        let request = ExtractionRequest::snapshot(seq, image, prompt);

        self.state = next;
        self.next_seq = seq.next();
        self.latest_submitted = Some(seq);

        info!(
            "Submitting request {} for {} ({} bytes)",
            seq,
            request.file_name,
            request.image.len()
        );
        Some(request)
    }

    /// Whether an outcome for `seq` would be discarded
    pub fn is_stale(&self, seq: RequestSeq) -> bool {
        let superseded = self.latest_submitted.is_some_and(|latest| seq < latest);
        superseded || self.state.pending() != Some(seq)
    }

    /// Apply the outcome of request `seq`
    pub fn complete(&mut self, seq: RequestSeq, outcome: ExtractionOutcome) -> Completion {
        if self.is_stale(seq) {
            warn!(
                "Discarding stale response for request {} (latest: {:?}, phase: {})",
                seq,
                self.latest_submitted,
                self.state.phase()
            );
            return Completion::Stale;
        }

        let result = outcome.into_result();
        let state = std::mem::take(&mut self.state);
        match state.resolve(seq, result) {
            Ok(next) => {
                self.state = next;
                info!("Request {} finished: {}", seq, self.state.phase());
                Completion::Applied(self.state.phase())
            }
            Err(unchanged) => {
                self.state = unchanged;
                Completion::Stale
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lector_domain::ImageFormat;

    fn image(name: &str) -> Arc<ImageAsset> {
        Arc::new(ImageAsset::new(name, ImageFormat::Png, vec![7u8; 3], "data:image/png;base64,BwcH"))
    }

    fn extracted(text: &str) -> ExtractionOutcome {
        ExtractionOutcome::Reply(ExtractReply::Extracted(text.to_string()))
    }

    #[test]
    fn test_submit_requires_image() {
        let mut controller = ExtractionController::new();
        assert!(controller.submit(None).is_none());
        assert_eq!(controller.latest_submitted(), None);
        assert_eq!(controller.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_submit_while_submitting_is_noop() {
        let mut controller = ExtractionController::new();
        controller.select_image(image("a.png"));

        let first = controller.submit(Some("hi".into())).unwrap();
        assert_eq!(first.prompt.as_deref(), Some("hi"));
        assert_eq!(first.file_name, "a.png");

        assert!(controller.submit(None).is_none());
        assert_eq!(controller.phase(), SessionPhase::Submitting);
        assert_eq!(controller.pending(), Some(first.seq));
        assert_eq!(controller.latest_submitted(), Some(first.seq));
    }

    #[test]
    fn test_success_and_resubmit() {
        let mut controller = ExtractionController::new();
        controller.select_image(image("a.png"));

        let req = controller.submit(None).unwrap();
        assert_eq!(controller.complete(req.seq, extracted("text")), Completion::Applied(SessionPhase::Succeeded));

        let again = controller.submit(None).unwrap();
        assert!(again.seq > req.seq);
        assert_eq!(controller.state().result_text(), Some("text"));
    }

    #[test]
    fn test_backend_error_message_is_verbatim() {
        let mut controller = ExtractionController::new();
        controller.select_image(image("a.png"));
        let req = controller.submit(None).unwrap();

        let outcome = ExtractionOutcome::Reply(ExtractReply::Rejected {
            status: 200,
            message: Some("no text found".into()),
        });
        assert_eq!(controller.complete(req.seq, outcome), Completion::Applied(SessionPhase::Failed));
        assert_eq!(controller.state().error(), Some(("no text found", FailureKind::Backend)));
    }

    #[test]
    fn test_fallback_messages() {
        let ok_without_text = ExtractionOutcome::Reply(ExtractReply::Rejected { status: 200, message: None });
        assert_eq!(
            ok_without_text.into_result(),
            ExtractionResult::Failure {
                message: NO_TEXT_FALLBACK.into(),
                kind: FailureKind::Backend
            }
        );

        let server_error = ExtractionOutcome::Reply(ExtractReply::Rejected { status: 503, message: None });
        assert_eq!(
            server_error.into_result(),
            ExtractionResult::Failure {
                message: SERVER_ERROR_FALLBACK.into(),
                kind: FailureKind::Backend
            }
        );

        let transport = ExtractionOutcome::from_call(Err(SdkError::ConnectionError("refused".into())));
        assert_eq!(
            transport.into_result(),
            ExtractionResult::Failure {
                message: TRANSPORT_MESSAGE.into(),
                kind: FailureKind::Transport
            }
        );

        let timeout = ExtractionOutcome::from_call(Err(SdkError::Timeout));
        assert!(matches!(
            timeout.into_result(),
            ExtractionResult::Failure { kind: FailureKind::TimedOut, .. }
        ));
    }

    #[test]
    fn test_stale_after_reselect_and_resubmit() {
        let mut controller = ExtractionController::new();
        controller.select_image(image("a.png"));
        let old = controller.submit(None).unwrap();

        controller.select_image(image("b.png"));
        let new = controller.submit(None).unwrap();

        assert_eq!(controller.complete(new.seq, extracted("B")), Completion::Applied(SessionPhase::Succeeded));
        let before = controller.state().clone();

        assert_eq!(controller.complete(old.seq, extracted("A")), Completion::Stale);
        assert_eq!(controller.state(), &before);
        assert_eq!(controller.state().result_text(), Some("B"));
    }

    #[test]
    fn test_stale_after_removal() {
        let mut controller = ExtractionController::new();
        controller.select_image(image("a.png"));
        let req = controller.submit(None).unwrap();
        controller.remove_image();

        assert_eq!(controller.complete(req.seq, extracted("late")), Completion::Stale);
        assert_eq!(controller.phase(), SessionPhase::Idle);
        assert!(controller.state().result().is_none());
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut controller = ExtractionController::new();
        controller.select_image(image("a.png"));
        let req = controller.submit(None).unwrap();

        controller.complete(req.seq, extracted("once"));
        assert_eq!(controller.complete(req.seq, extracted("twice")), Completion::Stale);
        assert_eq!(controller.state().result_text(), Some("once"));
    }
}
