//! Undo bookkeeping for optimistic removals
//!
//! Every removal arms a [`PendingUndo`] keyed by message id. An entry lives
//! until its deadline; after that it is dropped silently and the removal is
//! final.

use std::collections::HashMap;
use std::time::Instant;

use crate::mail::gateway::RemoteAction;
use crate::mail::types::{Message, MessageId};

/// A removal that can still be reversed
#[derive(Debug, Clone)]
pub struct PendingUndo {
    pub message: Message,
    /// Index the message occupied in the snapshot
    pub index: usize,
    /// Remote call that reverses the removal
    pub inverse: RemoteAction,
    pub deadline: Instant,
}

#[derive(Debug, Default)]
pub struct UndoLedger {
    entries: HashMap<MessageId, PendingUndo>,
}

impl UndoLedger {
    /// Arm an entry, replacing any stale one for the same message
    pub fn arm(&mut self, entry: PendingUndo) {
        let id = entry.message.id.clone();
        if self.entries.insert(id.clone(), entry).is_some() {
            tracing::debug!("Replaced stale undo entry for {}", id);
        }
    }

    /// The entry for `id` if it has not expired at `now`
    pub fn live(&self, id: &MessageId, now: Instant) -> Option<&PendingUndo> {
        self.entries.get(id).filter(|e| now < e.deadline)
    }

    pub fn take(&mut self, id: &MessageId) -> Option<PendingUndo> {
        self.entries.remove(id)
    }

    /// Drop every entry whose deadline has passed. Returns true if any were dropped.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.entries.len();
        self.entries.retain(|id, e| {
            let keep = now < e.deadline;
            if !keep {
                tracing::debug!("Undo window closed for {}", id);
            }
            keep
        });
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub fn contains(&self, id: &MessageId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::message;
    use std::time::Duration;

    fn entry(id: &str, index: usize, deadline: Instant) -> PendingUndo {
        PendingUndo {
            message: message(id, 3),
            index,
            inverse: RemoteAction::Unarchive,
            deadline,
        }
    }

    #[test]
    fn test_entry_is_live_until_deadline() {
        let now = Instant::now();
        let mut ledger = UndoLedger::default();
        ledger.arm(entry("a", 0, now + Duration::from_secs(5)));

        let id = MessageId::from("a");
        assert!(ledger.live(&id, now + Duration::from_secs(4)).is_some());
        assert!(ledger.live(&id, now + Duration::from_secs(5)).is_none());

        assert!(!ledger.expire(now + Duration::from_secs(4)));
        assert!(ledger.expire(now + Duration::from_secs(5)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_rearm_overwrites() {
        let now = Instant::now();
        let mut ledger = UndoLedger::default();
        ledger.arm(entry("a", 0, now + Duration::from_secs(1)));
        ledger.arm(entry("a", 3, now + Duration::from_secs(5)));

        assert_eq!(ledger.len(), 1);
        let id = MessageId::from("a");
        let live = ledger.live(&id, now + Duration::from_secs(2)).unwrap();
        assert_eq!(live.index, 3);
    }
}
