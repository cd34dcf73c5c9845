//! Multi-select state

use std::collections::HashSet;

use crate::mail::types::MessageId;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    active: bool,
    ids: HashSet<MessageId>,
}

impl Selection {
    /// Enter multi-select mode with `id` as the only checked message
    pub fn begin(&mut self, id: MessageId) {
        self.active = true;
        self.ids.clear();
        self.ids.insert(id);
    }

    /// Flip membership of `id`. Ignored outside multi-select mode.
    pub fn toggle(&mut self, id: &MessageId) {
        if !self.active {
            return;
        }
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Leave multi-select mode and uncheck everything
    pub fn clear(&mut self) {
        self.active = false;
        self.ids.clear();
    }

    /// Drop an id that is no longer in the snapshot
    pub fn forget(&mut self, id: &MessageId) {
        self.ids.remove(id);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &MessageId> {
        self.ids.iter()
    }
}
