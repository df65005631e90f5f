//! Reclaim module - the accelerator memory reclaim toggle

/// State of the cache/memory reclaim trigger
///
/// Independent of [`SessionState`](crate::SessionState): neither blocks the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReclaimState {
    /// No reclaim request outstanding
    #[default]
    Idle,
    /// A reclaim request is outstanding
    Clearing,
}

impl ReclaimState {
    /// Idle → Clearing
    ///
    /// Returns `None` while already clearing, which makes a second trigger a no-op.
    pub fn begin(self) -> Option<Self> {
        match self {
            ReclaimState::Idle => Some(ReclaimState::Clearing),
            ReclaimState::Clearing => None,
        }
    }

    /// Any → Idle
    pub fn finish(self) -> Self {
        ReclaimState::Idle
    }

    /// Whether a request is outstanding
    pub fn is_clearing(&self) -> bool {
        matches!(self, ReclaimState::Clearing)
    }
}
