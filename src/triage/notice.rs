//! Transient notifications ("toasts")
//!
//! Only one notice is visible at a time. Showing a new one supersedes the
//! old one together with its expiry timer.

use std::time::{Duration, Instant};

use crate::mail::types::MessageId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    /// Message whose removal this notice offers to undo
    pub undo: Option<MessageId>,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy)]
pub struct NoticeTimings {
    /// Lifetime of a notice carrying an undo offer
    pub with_undo: Duration,
    /// Lifetime of a plain notice
    pub plain: Duration,
}

#[derive(Debug, Clone)]
pub struct NoticeSlot {
    timings: NoticeTimings,
    current: Option<Notice>,
}

impl NoticeSlot {
    pub fn new(timings: NoticeTimings) -> Self {
        Self {
            timings,
            current: None,
        }
    }

    pub fn success(&mut self, message: impl ToString, now: Instant) {
        self.show(message, NoticeKind::Success, None, now);
    }

    pub fn error(&mut self, message: impl ToString, now: Instant) {
        self.show(message, NoticeKind::Error, None, now);
    }

    /// Success notice that offers to undo the removal of `id`
    pub fn with_undo(&mut self, message: impl ToString, id: MessageId, now: Instant) {
        self.show(message, NoticeKind::Success, Some(id), now);
    }

    fn show(&mut self, message: impl ToString, kind: NoticeKind, undo: Option<MessageId>, now: Instant) {
        let ttl = if undo.is_some() {
            self.timings.with_undo
        } else {
            self.timings.plain
        };
        self.current = Some(Notice {
            message: message.to_string(),
            kind,
            undo,
            expires_at: now + ttl,
        });
    }

    /// Cancel the visible notice and its timer
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Cancel the visible notice only if it offers undo for `id`
    pub fn cancel_undo_for(&mut self, id: &MessageId) {
        if self.undo_target() == Some(id) {
            self.current = None;
        }
    }

    /// Clear the notice if its time is up. Returns true if it was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        if let Some(notice) = &self.current
            && now >= notice.expires_at
        {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&Notice> {
        self.current.as_ref()
    }

    /// Message the visible notice offers to restore, if any
    pub fn undo_target(&self) -> Option<&MessageId> {
        self.current.as_ref().and_then(|n| n.undo.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> NoticeSlot {
        NoticeSlot::new(NoticeTimings {
            with_undo: Duration::from_secs(5),
            plain: Duration::from_secs(3),
        })
    }

    #[test]
    fn test_plain_and_undo_lifetimes() {
        let now = Instant::now();
        let mut n = slot();

        n.success("Saved", now);
        assert!(!n.expire(now + Duration::from_millis(2999)));
        assert!(n.expire(now + Duration::from_secs(3)));
        assert!(n.current().is_none());

        n.with_undo("Archived", MessageId::from("a"), now);
        assert!(!n.expire(now + Duration::from_secs(4)));
        assert_eq!(n.undo_target(), Some(&MessageId::from("a")));
        assert!(n.expire(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_new_notice_supersedes_timer() {
        let now = Instant::now();
        let mut n = slot();
        n.with_undo("Archived", MessageId::from("a"), now);
        n.error("Failed to archive", now + Duration::from_secs(4));

        // Old 5s deadline no longer applies
        assert!(!n.expire(now + Duration::from_secs(5)));
        assert_eq!(n.current().unwrap().kind, NoticeKind::Error);
        assert!(n.undo_target().is_none());
        assert!(n.expire(now + Duration::from_secs(7)));
    }

    #[test]
    fn test_cancel_undo_for_only_matching() {
        let now = Instant::now();
        let mut n = slot();
        n.with_undo("Archived", MessageId::from("a"), now);
        n.cancel_undo_for(&MessageId::from("b"));
        assert!(n.current().is_some());
        n.cancel_undo_for(&MessageId::from("a"));
        assert!(n.current().is_none());
    }
}
