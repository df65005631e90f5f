//! Cache / accelerator memory reclaim controller

use crate::notify::NoticeKind;
use lector_domain::ReclaimState;
use lector_sdk::{ClearCacheReply, SdkError};
use tracing::{debug, info, warn};

/// Reclaim reported success
pub const CLEARED_NOTICE: &str = "GPU memory cleared successfully";

/// Reclaim call could not complete
pub const CLEAR_TRANSPORT_NOTICE: &str = "Failed to clear cache. Please try again.";

/// Guards the reclaim trigger with its own busy flag
#[derive(Debug, Default)]
pub struct ReclaimController {
    state: ReclaimState,
}

impl ReclaimController {
    /// Start idle
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> ReclaimState {
        self.state
    }

    /// Whether a request is outstanding
    pub fn is_clearing(&self) -> bool {
        self.state.is_clearing()
    }

    /// Enter Clearing; `false` if a request is already outstanding
    pub fn begin(&mut self) -> bool {
        match self.state.begin() {
            Some(next) => {
                self.state = next;
                debug!("Reclaim -> clearing");
                true
            }
            None => {
                debug!("Reclaim already in progress; ignoring trigger");
                false
            }
        }
    }

    /// Return to Idle and describe the outcome
    pub fn finish(&mut self, result: Result<ClearCacheReply, SdkError>) -> (NoticeKind, String) {
        self.state = self.state.finish();
        match result {
            Ok(reply) if reply.success => {
                info!("Accelerator memory cleared");
                (NoticeKind::Success, CLEARED_NOTICE.to_string())
            }
            Ok(ClearCacheReply {
                message: Some(message), ..
            }) => {
                warn!("Backend refused to clear memory: {}", message);
                (NoticeKind::Error, format!("Failed to clear memory: {}", message))
            }
            Ok(_) => {
                warn!("Backend refused to clear memory without a reason");
                (NoticeKind::Error, CLEAR_TRANSPORT_NOTICE.to_string())
            }
            Err(e) => {
                warn!("Clear cache call failed: {}", e);
                (NoticeKind::Error, CLEAR_TRANSPORT_NOTICE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_trigger_is_noop() {
        let mut reclaim = ReclaimController::new();
        assert!(reclaim.begin());
        assert!(!reclaim.begin());
        assert!(reclaim.is_clearing());

        reclaim.finish(Ok(ClearCacheReply {
            success: true,
            message: None,
        }));
        assert!(!reclaim.is_clearing());
        assert!(reclaim.begin());
    }

    #[test]
    fn test_outcome_notices() {
        let mut reclaim = ReclaimController::new();

        reclaim.begin();
        let ok = reclaim.finish(Ok(ClearCacheReply {
            success: true,
            message: Some("Cache cleared".into()),
        }));
        assert_eq!(ok, (NoticeKind::Success, CLEARED_NOTICE.to_string()));

        reclaim.begin();
        let refused = reclaim.finish(Ok(ClearCacheReply {
            success: false,
            message: Some("busy".into()),
        }));
        assert_eq!(refused, (NoticeKind::Error, "Failed to clear memory: busy".to_string()));

        reclaim.begin();
        let failed = reclaim.finish(Err(SdkError::ConnectionError("refused".into())));
        assert_eq!(failed, (NoticeKind::Error, CLEAR_TRANSPORT_NOTICE.to_string()));
        assert_eq!(reclaim.state(), ReclaimState::Idle);
    }

    #[test]
    fn test_no_empty_refusal_reason() {
        let mut reclaim = ReclaimController::new();

        reclaim.begin();
        let unavailable = reclaim.finish(Err(SdkError::Http {
            status: 503,
            message: None,
        }));
        assert_eq!(unavailable, (NoticeKind::Error, CLEAR_TRANSPORT_NOTICE.to_string()));

        reclaim.begin();
        let silent = reclaim.finish(Ok(ClearCacheReply::interpret(200, br#"{"success": false}"#)));
        assert_eq!(silent, (NoticeKind::Error, CLEAR_TRANSPORT_NOTICE.to_string()));
        assert!(!reclaim.is_clearing());
    }
}
