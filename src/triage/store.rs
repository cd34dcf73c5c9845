//! Ordered snapshot of the messages currently in scope

use std::collections::HashSet;

use crate::mail::types::{Message, MessageId};

#[derive(Debug, Clone, Default)]
pub struct ListStore {
    messages: Vec<Message>,
}

impl ListStore {
    /// Replace the snapshot wholesale. `messages` must already be ranked.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Remove the message with `id`, returning it with the index it occupied.
    /// Absent ids are not an error.
    pub fn remove(&mut self, id: &MessageId) -> Option<(Message, usize)> {
        let index = self.position(id)?;
        Some((self.messages.remove(index), index))
    }

    /// Drop every message in `ids` in a single pass. Returns how many went.
    pub fn remove_all(&mut self, ids: &HashSet<MessageId>) -> usize {
        let before = self.messages.len();
        self.messages.retain(|m| !ids.contains(&m.id));
        before - self.messages.len()
    }

    /// Put a removed message back, clamping `at` to the current length
    pub fn reinsert(&mut self, message: Message, at: usize) -> usize {
        let index = at.min(self.messages.len());
        self.messages.insert(index, message);
        index
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| &m.id == id)
    }

    pub fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.id == id)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.position(id).is_some()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn urgent_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_urgent()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ids, message};

    fn store(list: &[(&str, u8)]) -> ListStore {
        let mut store = ListStore::default();
        store.replace(list.iter().map(|(id, s)| message(id, *s)).collect());
        store
    }

    #[test]
    fn test_remove_then_reinsert_restores_order() {
        let original = store(&[("a", 5), ("b", 4), ("c", 2), ("d", 1)]);
        for id in ["a", "b", "c", "d"] {
            let mut s = original.clone();
            let (removed, index) = s.remove(&MessageId::from(id)).unwrap();
            assert!(!s.contains(&removed.id));
            s.reinsert(removed, index);
            assert_eq!(ids(s.messages()), ids(original.messages()));
        }
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut s = store(&[("a", 5)]);
        assert!(s.remove(&MessageId::from("zzz")).is_none());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_reinsert_clamps_to_length() {
        let mut s = store(&[("a", 5), ("b", 4), ("c", 3)]);
        let (c, index) = s.remove(&MessageId::from("c")).unwrap();
        assert_eq!(index, 2);
        s.remove(&MessageId::from("b"));
        s.remove(&MessageId::from("a"));

        assert_eq!(s.reinsert(c, index), 0);
        assert_eq!(ids(s.messages()), vec!["c"]);
    }

    #[test]
    fn test_remove_all_keeps_order_of_rest() {
        let mut s = store(&[("a", 5), ("b", 4), ("c", 3), ("d", 2)]);
        let gone: HashSet<_> = ["b", "d", "zzz"].into_iter().map(MessageId::from).collect();
        assert_eq!(s.remove_all(&gone), 2);
        assert_eq!(ids(s.messages()), vec!["a", "c"]);
    }

    #[test]
    fn test_urgent_count() {
        let s = store(&[("a", 5), ("b", 4), ("c", 3), ("d", 0)]);
        assert_eq!(s.urgent_count(), 2);
    }
}
