//! Transient user notices
//!
//! A notice is a message, a kind and a display duration. The queue never
//! renders anything; front ends ask it which notices are live at a given
//! instant and draw them however they like.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Neutral information
    Info,
    /// An operation succeeded
    Success,
    /// An operation failed
    Error,
}

impl NoticeKind {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Error => "error",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queued notice
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// Monotonically increasing identifier
    pub id: u64,
    /// Text shown to the user
    pub message: String,
    /// Severity
    pub kind: NoticeKind,
    /// How long the notice stays visible
    pub duration_ms: u64,
    #[serde(skip)]
    posted_at: Instant,
}

impl Notice {
    /// When the notice was posted
    pub fn posted_at(&self) -> Instant {
        self.posted_at
    }

    /// Whether the notice is still visible at `now`
    pub fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) < Duration::from_millis(self.duration_ms)
    }
}

/// FIFO of notices with expiry
#[derive(Debug)]
pub struct NotificationQueue {
    notices: VecDeque<Notice>,
    next_id: u64,
    default_duration: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(3000))
    }
}

impl NotificationQueue {
    /// Create a queue whose notices last `default_duration` unless told otherwise
    pub fn new(default_duration: Duration) -> Self {
        Self {
            notices: VecDeque::new(),
            next_id: 1,
            default_duration,
        }
    }

    /// Post a notice with the default duration
    pub fn push(&mut self, message: impl Into<String>, kind: NoticeKind) -> u64 {
        self.push_for(message, kind, self.default_duration)
    }

    /// Post a notice with an explicit duration
    pub fn push_for(&mut self, message: impl Into<String>, kind: NoticeKind, duration: Duration) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.notices.push_back(Notice {
            id,
            message: message.into(),
            kind,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            posted_at: Instant::now(),
        });
        id
    }

    /// Post an info notice
    pub fn info(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Info)
    }

    /// Post a success notice
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Success)
    }

    /// Post an error notice
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(message, NoticeKind::Error)
    }

    /// Notices still visible at `now`, oldest first
    pub fn active(&self, now: Instant) -> Vec<&Notice> {
        self.notices.iter().filter(|n| n.is_live(now)).collect()
    }

    /// Remove and return everything queued, expired or not
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Number of queued notices
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase() {
        let mut queue = NotificationQueue::default();
        let a = queue.info("one");
        let b = queue.error("two");
        assert!(b > a);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "one");
        assert_eq!(drained[1].kind, NoticeKind::Error);
        assert!(queue.is_empty());

        let c = queue.success("three");
        assert!(c > b);
    }

    #[test]
    fn test_expiry() {
        let mut queue = NotificationQueue::new(Duration::from_millis(100));
        queue.info("short");
        queue.push_for("long", NoticeKind::Error, Duration::from_secs(6));
        assert_eq!(queue.active(Instant::now()).len(), 2);

        let later = Instant::now() + Duration::from_secs(1);
        let live = queue.active(later);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].message, "long");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_serializes_kind_lowercase() {
        let mut queue = NotificationQueue::default();
        queue.success("done");
        let json = serde_json::to_value(&queue.drain()[0]).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["duration_ms"], 3000);
        assert!(json.get("posted_at").is_none());
    }
}
