//! Message operations: open, mark read, archive, tasks and undo

use chrono::Local;

use crate::app::state::{DuePicker, Modal, ReaderView, View};
use crate::mail::types::MessageId;
use crate::triage::actions::MailAction;

use super::super::App;

impl App {
    /// The message an action applies to: the open one, else the cursor row
    fn target_id(&self) -> Option<MessageId> {
        match &self.state.view {
            View::Reader(reader) => Some(reader.id.clone()),
            View::List => self.state.current_id(),
        }
    }

    fn selected_ids(&self) -> Vec<MessageId> {
        self.triage.selection().ids().cloned().collect()
    }

    pub(crate) async fn open_current(&mut self) {
        let Some(id) = self.state.current_id() else {
            return;
        };
        if self.triage.selection().is_active() {
            self.toggle_row(&id);
        } else {
            self.open_reader(id).await;
        }
    }

    pub(crate) async fn open_reader(&mut self, id: MessageId) {
        let body = match self.triage.open(&id).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Could not open {}: {}", id, e);
                return;
            }
        };
        let Some(message) = self.triage.store().get(&id) else {
            return;
        };

        let from = if message.from_name == message.from_addr {
            message.from_addr.clone()
        } else {
            format!("{} <{}>", message.from_name, message.from_addr)
        };
        self.state.view = View::Reader(Box::new(ReaderView {
            id,
            subject: message.subject.clone(),
            from,
            date: message
                .date
                .with_timezone(&Local)
                .format("%a, %d %b %Y %H:%M")
                .to_string(),
            text: body.display_text(),
            scroll: 0,
        }));
    }

    /// Mark read or archive: every selected message in multi-select,
    /// otherwise the current one
    pub(crate) async fn act_on_current(&mut self, action: MailAction) {
        if self.triage.selection().is_active() {
            let ids = self.selected_ids();
            match self.triage.apply_bulk(action, &ids).await {
                Ok(count) => tracing::info!("{:?} applied to {} messages", action, count),
                Err(e) => tracing::warn!("Bulk {:?}: {}", action, e),
            }
            return;
        }

        let Some(id) = self.target_id() else {
            return;
        };
        match self.triage.apply_action(action, &id).await {
            Ok(()) => {
                if matches!(self.state.view, View::Reader(_)) {
                    self.state.view = View::List;
                }
            }
            Err(e) => tracing::debug!("{:?} on {} failed: {}", action, id, e),
        }
    }

    pub(crate) async fn start_task(&mut self) {
        if self.triage.selection().is_active() {
            let ids = self.selected_ids();
            match self.triage.apply_bulk_task(&ids).await {
                Ok(count) => tracing::info!("Created {} tasks", count),
                Err(e) => tracing::warn!("Bulk task: {}", e),
            }
            return;
        }

        if let Some(id) = self.target_id() {
            self.state.modal = Modal::DuePicker(DuePicker::new(id));
        }
    }

    pub(crate) async fn confirm_task(&mut self) {
        let Modal::DuePicker(picker) = &self.state.modal else {
            return;
        };
        // An unparseable custom date keeps the picker open
        let Some(due) = picker.choice() else {
            return;
        };
        let id = picker.id.clone();
        self.state.modal = Modal::None;

        match self.triage.create_task(&id, due).await {
            Ok(task_id) => tracing::info!("Task {} created for {}", task_id, id),
            Err(e) => tracing::debug!("Task for {} failed: {}", id, e),
        }
    }

    pub(crate) fn open_in_browser(&mut self) {
        let Some(id) = self.target_id() else {
            return;
        };
        let url = self.triage.link_for(&id);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open {}: {}", url, e);
        }
    }

    /// Undo whatever the visible notice offers to undo
    pub(crate) async fn undo_last(&mut self) {
        let Some(id) = self.triage.notice().undo_target().cloned() else {
            return;
        };
        match self.triage.undo(&id).await {
            Ok(true) => {
                self.sync_state();
                if let Some(index) = self.triage.store().position(&id) {
                    self.state.cursor_to(index);
                }
            }
            Ok(false) => {}
            Err(e) => tracing::debug!("Undo of {} failed: {}", id, e),
        }
    }

    pub(crate) fn select_current(&mut self) {
        let Some(id) = self.state.current_id() else {
            return;
        };
        if self.triage.selection().is_active() {
            self.toggle_row(&id);
        } else {
            self.triage.begin_selection(&id);
        }
    }

    pub(crate) fn select_all(&mut self) {
        let store = self.triage.store();
        if store.is_empty() {
            return;
        }
        let ids: Vec<MessageId> = store.messages().iter().map(|m| m.id.clone()).collect();
        for id in &ids {
            if !self.triage.selection().is_active() {
                self.triage.begin_selection(id);
            } else if !self.triage.selection().contains(id) {
                self.triage.toggle_selected(id);
            }
        }
    }

    /// Flip one row; unchecking the last row leaves multi-select
    pub(crate) fn toggle_row(&mut self, id: &MessageId) {
        self.triage.toggle_selected(id);
        if self.triage.selection().is_empty() {
            self.triage.exit_selection();
        }
    }
}
