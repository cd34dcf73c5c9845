//! Action handlers for user input
//!
//! - `navigation`: cursor movement and scrolling
//! - `mail`: read, archive, task, undo and the reader
//! - `input`: text typed into the due date picker
//! - `pointer`: mouse drags fed to the gesture controller

mod input;
mod mail;
mod navigation;
mod pointer;

use crate::input::Action;
use crate::triage::actions::MailAction;

use super::App;
use super::state::{Modal, View};

impl App {
    pub(crate) async fn handle_action(&mut self, action: Action) {
        if self.state.modal.is_open() {
            self.handle_modal_action(action).await;
            return;
        }

        match action {
            // Navigation
            Action::Up => self.move_by(-1),
            Action::Down => self.move_by(1),
            Action::Top => self.move_to_top(),
            Action::Bottom => self.move_to_bottom(),
            Action::PageUp => self.move_page(-1),
            Action::PageDown => self.move_page(1),

            // Messages
            Action::Open => self.open_current().await,
            Action::Back => self.go_back(),
            Action::Quit => {} // Handled in event loop
            Action::MarkRead => self.act_on_current(MailAction::MarkRead).await,
            Action::Archive => self.act_on_current(MailAction::Archive).await,
            Action::CreateTask => self.start_task().await,
            Action::OpenInBrowser => self.open_in_browser(),
            Action::Undo => self.undo_last().await,

            // List
            Action::Refresh => self.queue_load(self.state.scope),
            Action::NextScope => self.queue_load(self.state.scope.next()),
            Action::Select => self.select_current(),
            Action::SelectAll => self.select_all(),

            Action::Help => self.state.modal = Modal::Help { scroll: 0 },
        }
    }

    async fn handle_modal_action(&mut self, action: Action) {
        match &mut self.state.modal {
            Modal::Help { scroll } => match action {
                Action::Up => *scroll = scroll.saturating_sub(1),
                Action::Down => *scroll = scroll.saturating_add(1),
                Action::Help | Action::Back => self.state.modal = Modal::None,
                _ => {}
            },
            Modal::DuePicker(picker) => match action {
                Action::Up => picker.up(),
                Action::Down => picker.down(),
                Action::Open => self.confirm_task().await,
                Action::Back => self.state.modal = Modal::None,
                _ => {}
            },
            Modal::None => {}
        }
    }

    fn go_back(&mut self) {
        if matches!(self.state.view, View::Reader(_)) {
            self.state.view = View::List;
        } else if self.triage.selection().is_active() {
            self.triage.exit_selection();
        }
    }
}
