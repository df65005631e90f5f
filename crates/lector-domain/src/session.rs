//! Session module - the extraction session state machine
//!
//! ```text
//!            select                submit
//!   Idle ───────────▶ Ready ─────────────▶ Submitting ──┬──▶ Succeeded
//!    ▲                  ▲                      ▲        └──▶ Failed
//!    │ remove           │ select               │ submit        │
//!    └──────────────────┴──────────────────────┴───────────────┘
//! ```
//!
//! Every transition is a pure function from one state to the next. States that
//! need an image carry it, so "Submitting without an image" cannot be built.

use crate::asset::ImageAsset;
use std::fmt;
use std::sync::Arc;

/// Monotonic sequence number of a submitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// The first sequence number handed out
    pub const FIRST: RequestSeq = RequestSeq(1);

    /// Wrap a raw value
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The following sequence number
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable snapshot of what was submitted
#[derive(Clone)]
pub struct ExtractionRequest {
    /// Sequence number used for stale-response detection
    pub seq: RequestSeq,
    /// File name sent with the multipart `image` part
    pub file_name: String,
    /// MIME type of `image`
    pub mime_type: &'static str,
    /// Image payload as it was at submission time
    pub image: Arc<[u8]>,
    /// Prompt text, `None` when blank
    pub prompt: Option<String>,
}

impl ExtractionRequest {
    /// Snapshot `asset` and `prompt` under `seq`
    pub fn snapshot(seq: RequestSeq, asset: &ImageAsset, prompt: Option<String>) -> Self {
        Self {
            seq,
            file_name: asset.file_name().to_string(),
            mime_type: asset.mime_type(),
            image: asset.shared_bytes(),
            prompt,
        }
    }
}

impl fmt::Debug for ExtractionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionRequest")
            .field("seq", &self.seq)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("image_len", &self.image.len())
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Why an extraction failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The backend answered but produced no text or reported an error
    Backend,
    /// The call could not complete or the response was unreadable
    Transport,
    /// No answer within the configured bound
    TimedOut,
}

impl FailureKind {
    /// Short identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Backend => "backend",
            FailureKind::Transport => "transport",
            FailureKind::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// Non-empty text, possibly carrying markup
    Success {
        /// Result text as returned by the backend
        text: String,
    },
    /// Anything else
    Failure {
        /// User-facing message
        message: String,
        /// Failure category
        kind: FailureKind,
    },
}

/// Discriminant of [`SessionState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No image
    Idle,
    /// Image present, nothing in flight
    Ready,
    /// A request is outstanding
    Submitting,
    /// Last request produced text
    Succeeded,
    /// Last request failed
    Failed,
}

impl SessionPhase {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Ready => "ready",
            SessionPhase::Submitting => "submitting",
            SessionPhase::Succeeded => "succeeded",
            SessionPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of the extraction session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No image selected
    #[default]
    Idle,
    /// Image present, no request in flight
    Ready {
        /// Current image
        image: Arc<ImageAsset>,
    },
    /// Request `seq` is outstanding
    Submitting {
        /// Image that was submitted
        image: Arc<ImageAsset>,
        /// Sequence number of the outstanding request
        seq: RequestSeq,
        /// Text of the previous success, shown until the new result lands
        retained: Option<String>,
    },
    /// Last request produced text
    Succeeded {
        /// Current image
        image: Arc<ImageAsset>,
        /// Extracted text
        text: String,
    },
    /// Last request failed
    Failed {
        /// Current image
        image: Arc<ImageAsset>,
        /// User-facing message
        message: String,
        /// Failure category
        kind: FailureKind,
    },
}

impl SessionState {
    /// Discriminant
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Ready { .. } => SessionPhase::Ready,
            SessionState::Submitting { .. } => SessionPhase::Submitting,
            SessionState::Succeeded { .. } => SessionPhase::Succeeded,
            SessionState::Failed { .. } => SessionPhase::Failed,
        }
    }

    /// Current image, if any
    pub fn image(&self) -> Option<&Arc<ImageAsset>> {
        match self {
            SessionState::Idle => None,
            SessionState::Ready { image }
            | SessionState::Submitting { image, .. }
            | SessionState::Succeeded { image, .. }
            | SessionState::Failed { image, .. } => Some(image),
        }
    }

    /// Sequence number of the outstanding request, if any
    pub fn pending(&self) -> Option<RequestSeq> {
        match self {
            SessionState::Submitting { seq, .. } => Some(*seq),
            _ => None,
        }
    }

    /// Whether `submit` would start a request from this state
    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            SessionState::Ready { .. } | SessionState::Succeeded { .. } | SessionState::Failed { .. }
        )
    }

    /// Text to display as the current result
    ///
    /// While submitting after a success, this is the retained previous text.
    pub fn result_text(&self) -> Option<&str> {
        match self {
            SessionState::Succeeded { text, .. } => Some(text),
            SessionState::Submitting { retained, .. } => retained.as_deref(),
            _ => None,
        }
    }

    /// Current error message and kind, if the last request failed
    pub fn error(&self) -> Option<(&str, FailureKind)> {
        match self {
            SessionState::Failed { message, kind, .. } => Some((message, *kind)),
            _ => None,
        }
    }

    /// Current terminal result, if any
    pub fn result(&self) -> Option<ExtractionResult> {
        match self {
            SessionState::Succeeded { text, .. } => Some(ExtractionResult::Success { text: text.clone() }),
            SessionState::Failed { message, kind, .. } => Some(ExtractionResult::Failure {
                message: message.clone(),
                kind: *kind,
            }),
            _ => None,
        }
    }

    /// Any state → Ready with `image`; result and error are dropped
    pub fn with_image(self, image: Arc<ImageAsset>) -> Self {
        SessionState::Ready { image }
    }

    /// Any state → Idle; image, result and error are dropped
    pub fn without_image(self) -> Self {
        SessionState::Idle
    }

    /// Ready/Succeeded/Failed → Submitting under `seq`
    ///
    /// Returns `None` (no transition) from Idle or Submitting.
    pub fn begin(&self, seq: RequestSeq) -> Option<Self> {
        match self {
            SessionState::Ready { image } | SessionState::Failed { image, .. } => {
                Some(SessionState::Submitting {
                    image: Arc::clone(image),
                    seq,
                    retained: None,
                })
            }
            SessionState::Succeeded { image, text } => Some(SessionState::Submitting {
                image: Arc::clone(image),
                seq,
                retained: Some(text.clone()),
            }),
            SessionState::Idle | SessionState::Submitting { .. } => None,
        }
    }

    /// Submitting(`seq`) → Succeeded/Failed
    ///
    /// A result for any other sequence number is stale: the state is handed
    /// back unchanged in `Err`.
    pub fn resolve(self, seq: RequestSeq, result: ExtractionResult) -> Result<Self, Self> {
        match self {
            SessionState::Submitting { image, seq: pending, .. } if pending == seq => Ok(match result {
                ExtractionResult::Success { text } => SessionState::Succeeded { image, text },
                ExtractionResult::Failure { message, kind } => SessionState::Failed { image, message, kind },
            }),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::ImageFormat;
    use proptest::prelude::*;

    fn asset(name: &str) -> Arc<ImageAsset> {
        Arc::new(ImageAsset::new(name, ImageFormat::Png, vec![0u8; 4], format!("data:{}", name)))
    }

    fn success(text: &str) -> ExtractionResult {
        ExtractionResult::Success { text: text.to_string() }
    }

    #[test]
    fn test_happy_path() {
        let state = SessionState::Idle.with_image(asset("a.png"));
        assert_eq!(state.phase(), SessionPhase::Ready);

        let seq = RequestSeq::FIRST;
        let state = state.begin(seq).unwrap();
        assert_eq!(state.phase(), SessionPhase::Submitting);
        assert_eq!(state.pending(), Some(seq));

        let state = state.resolve(seq, success("hello")).unwrap();
        assert_eq!(state.phase(), SessionPhase::Succeeded);
        assert_eq!(state.result_text(), Some("hello"));
    }

    #[test]
    fn test_cannot_begin_from_idle_or_submitting() {
        assert!(SessionState::Idle.begin(RequestSeq::FIRST).is_none());

        let submitting = SessionState::Idle
            .with_image(asset("a.png"))
            .begin(RequestSeq::FIRST)
            .unwrap();
        assert!(submitting.begin(RequestSeq::FIRST.next()).is_none());
    }

    #[test]
    fn test_resubmit_retains_previous_text_and_clears_error() {
        let seq = RequestSeq::FIRST;
        let succeeded = SessionState::Idle
            .with_image(asset("a.png"))
            .begin(seq)
            .unwrap()
            .resolve(seq, success("first"))
            .unwrap();

        let again = succeeded.begin(seq.next()).unwrap();
        assert_eq!(again.result_text(), Some("first"));
        assert!(again.error().is_none());

        let failed = again
            .resolve(
                seq.next(),
                ExtractionResult::Failure {
                    message: "boom".into(),
                    kind: FailureKind::Backend,
                },
            )
            .unwrap();
        assert_eq!(failed.result_text(), None);
        assert_eq!(failed.error(), Some(("boom", FailureKind::Backend)));

        let retry = failed.begin(seq.next().next()).unwrap();
        assert!(retry.error().is_none());
        assert_eq!(retry.result_text(), None);
    }

    #[test]
    fn test_stale_resolution_returns_state_unchanged() {
        let state = SessionState::Idle
            .with_image(asset("a.png"))
            .begin(RequestSeq::from_value(2))
            .unwrap();
        let before = state.clone();

        let stale = state.resolve(RequestSeq::from_value(1), success("old"));
        assert_eq!(stale.unwrap_err(), before);
    }

    #[test]
    fn test_resolution_after_removal_is_stale() {
        let state = SessionState::Idle
            .with_image(asset("a.png"))
            .begin(RequestSeq::FIRST)
            .unwrap()
            .without_image();

        let stale = state.resolve(RequestSeq::FIRST, success("late"));
        assert_eq!(stale.unwrap_err(), SessionState::Idle);
    }

    #[test]
    fn test_reselect_drops_result() {
        let seq = RequestSeq::FIRST;
        let state = SessionState::Idle
            .with_image(asset("a.png"))
            .begin(seq)
            .unwrap()
            .resolve(seq, success("text"))
            .unwrap()
            .with_image(asset("b.png"));

        assert_eq!(state.phase(), SessionPhase::Ready);
        assert_eq!(state.image().unwrap().file_name(), "b.png");
        assert!(state.result().is_none());
        assert!(state.error().is_none());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Select(u8),
        Remove,
        Begin,
        ResolvePending,
    }

    fn any_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u8>().prop_map(Op::Select),
            Just(Op::Remove),
            Just(Op::Begin),
            Just(Op::ResolvePending),
        ]
    }

    proptest! {
        #[test]
        fn prop_remove_always_ends_idle(ops in prop::collection::vec(any_op(), 0..32)) {
            let mut state = SessionState::Idle;
            let mut seq = RequestSeq::FIRST;
            for op in ops {
                state = match op {
                    Op::Select(n) => state.with_image(asset(&format!("{}.png", n))),
                    Op::Remove => state.without_image(),
                    Op::Begin => match state.begin(seq) {
                        Some(next) => { seq = seq.next(); next }
                        None => state,
                    },
                    Op::ResolvePending => match state.pending() {
                        Some(p) => state.resolve(p, success("x")).unwrap_or_else(|s| s),
                        None => state,
                    },
                };
                // Submitting always carries an image
                if state.phase() == SessionPhase::Submitting {
                    prop_assert!(state.image().is_some());
                }
            }

            let end = state.without_image();
            prop_assert_eq!(end.phase(), SessionPhase::Idle);
            prop_assert!(end.result().is_none());
            prop_assert!(end.error().is_none());
            prop_assert!(end.result_text().is_none());
        }
    }
}
