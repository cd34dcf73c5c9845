//! Mouse input: swipes, long-press, taps and pull-to-refresh on the list

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::app::state::View;
use crate::triage::gesture::GestureOutcome;
use crate::ui;

use super::super::App;

impl App {
    pub(crate) async fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(self.state.view, View::List) || self.state.modal.is_open() {
            return;
        }

        // Terminal cells scaled to the units the gesture thresholds use
        let unit = self.state.units_per_cell;
        let x = f32::from(mouse.column) * unit;
        let y = f32::from(mouse.row) * unit;
        let now = Instant::now();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pull.start(y, self.state.scroll == 0);
                if let Some(index) = ui::row_at(mouse.row, self.state.scroll, self.state.visible_rows)
                    && let Some(row) = self.state.rows.get(index)
                {
                    let id = row.message.id.clone();
                    self.state.cursor_to(index);
                    let multi_select = self.triage.selection().is_active();
                    self.gestures.touch_start(id, x, y, now, multi_select);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(outcome) = self.gestures.touch_move(x, y, now) {
                    self.apply_gesture(outcome).await;
                }
                // Vertical drags fall through to the pull indicator
                if self.gestures.is_idle() && self.pull.is_active() {
                    self.pull.update(y);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.pull.release() {
                    self.gestures.cancel();
                    self.queue_load(self.state.scope);
                    return;
                }
                if let Some(outcome) = self.gestures.touch_end(now) {
                    self.apply_gesture(outcome).await;
                }
            }
            MouseEventKind::ScrollDown => self.move_by(1),
            MouseEventKind::ScrollUp => self.move_by(-1),
            _ => {}
        }
    }

    pub(crate) async fn apply_gesture(&mut self, outcome: GestureOutcome) {
        tracing::trace!("Gesture: {:?}", outcome);
        match outcome {
            GestureOutcome::Commit { id, action } => {
                if let Err(e) = self.triage.apply_action(action, &id).await {
                    tracing::debug!("Swipe {:?} on {} failed: {}", action, id, e);
                }
            }
            GestureOutcome::SnapBack(_) => {}
            GestureOutcome::EnterSelection(id) => self.triage.begin_selection(&id),
            GestureOutcome::Toggle(id) => self.toggle_row(&id),
            GestureOutcome::Tap(id) => self.open_reader(id).await,
        }
    }
}
