//! Render snapshot and view-local state
//!
//! `AppState` is cloned and sent to the render thread every frame. The list
//! rows are copied out of the triage session; cursor, scroll, view and modal
//! are owned here.

use std::time::Instant;

use chrono::NaiveDate;

use crate::constants::{SWIPE_THRESHOLD, UNITS_PER_CELL};
use crate::input::KeybindingEntry;
use crate::mail::types::{Message, MessageId, Scope};
use crate::tasks::DueChoice;
use crate::triage::gesture::ItemState;
use crate::triage::notice::Notice;

#[derive(Debug, Clone)]
pub struct RowView {
    pub message: Message,
    pub state: ItemState,
    pub tasked: bool,
    pub leaving: bool,
}

#[derive(Debug, Clone)]
pub struct ReaderView {
    pub id: MessageId,
    pub subject: String,
    pub from: String,
    pub date: String,
    pub text: String,
    pub scroll: u16,
}

#[derive(Debug, Clone, Default)]
pub enum View {
    #[default]
    List,
    Reader(Box<ReaderView>),
}

#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    Help {
        scroll: u16,
    },
    DuePicker(DuePicker),
}

/// Due date prompt shown before creating a task
#[derive(Debug, Clone)]
pub struct DuePicker {
    pub id: MessageId,
    pub cursor: usize,
    /// Typed date for the custom option
    pub custom: String,
}

impl DuePicker {
    pub const OPTIONS: [&'static str; 5] = [
        "Suggested",
        "Today",
        "Tomorrow",
        "Custom date (YYYY-MM-DD)",
        "No due date",
    ];
    pub const CUSTOM: usize = 3;

    pub fn new(id: MessageId) -> Self {
        Self {
            id,
            cursor: 0,
            custom: String::new(),
        }
    }

    pub fn editing_custom(&self) -> bool {
        self.cursor == Self::CUSTOM
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        self.cursor = (self.cursor + 1).min(Self::OPTIONS.len() - 1);
    }

    /// The picked due date, or `None` while the custom date does not parse
    pub fn choice(&self) -> Option<DueChoice> {
        match self.cursor {
            0 => Some(DueChoice::Suggested),
            1 => Some(DueChoice::Today),
            2 => Some(DueChoice::Tomorrow),
            Self::CUSTOM => NaiveDate::parse_from_str(self.custom.trim(), "%Y-%m-%d")
                .ok()
                .map(DueChoice::On),
            _ => Some(DueChoice::None),
        }
    }
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::None)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub rows: Vec<RowView>,
    pub cursor: usize,
    /// Index of the first visible row
    pub scroll: usize,
    /// Rows that fit in the list area
    pub visible_rows: usize,
    pub scope: Scope,
    pub urgent_count: usize,
    pub multi_select: bool,
    pub selected_count: usize,
    pub notice: Option<Notice>,
    pub load_error: Option<String>,
    /// Set while a load is queued or running
    pub loading_since: Option<Instant>,
    pub pull_distance: f32,
    pub pull_ready: bool,
    pub swipe_threshold: f32,
    pub units_per_cell: f32,
    pub view: View,
    pub modal: Modal,
    pub help: Vec<KeybindingEntry>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            cursor: 0,
            scroll: 0,
            visible_rows: 10,
            scope: Scope::default(),
            urgent_count: 0,
            multi_select: false,
            selected_count: 0,
            notice: None,
            load_error: None,
            loading_since: None,
            pull_distance: 0.0,
            pull_ready: false,
            swipe_threshold: SWIPE_THRESHOLD,
            units_per_cell: UNITS_PER_CELL,
            view: View::default(),
            modal: Modal::default(),
            help: Vec::new(),
        }
    }
}

impl AppState {
    pub fn current(&self) -> Option<&RowView> {
        self.rows.get(self.cursor)
    }

    pub fn current_id(&self) -> Option<MessageId> {
        self.current().map(|row| row.message.id.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.loading_since.is_some()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.rows.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.ensure_visible();
    }

    pub fn cursor_to(&mut self, index: usize) {
        self.cursor = index;
        self.clamp_cursor();
    }

    /// Keep the cursor on a real row and on screen after the list changed
    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.rows.len().saturating_sub(1));
        self.ensure_visible();
    }

    fn ensure_visible(&mut self) {
        let visible = self.visible_rows.max(1);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + visible {
            self.scroll = self.cursor + 1 - visible;
        }
        let max_scroll = self.rows.len().saturating_sub(visible);
        self.scroll = self.scroll.min(max_scroll);
    }
}
