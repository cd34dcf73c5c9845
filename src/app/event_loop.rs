//! Main event loop and timer processing

use anyhow::Result;
use crossterm::event;
use std::time::{Duration, Instant};

use crate::constants::POLL_INTERVAL_MS;
use crate::input::{InputResult, handle_input};
use crate::mail::types::Scope;

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Pending removals, undo windows and notice expiry
            if self.triage.tick() {
                self.dirty = true;
            }

            // Long-press timer
            if let Some(outcome) = self.gestures.tick(Instant::now()) {
                self.apply_gesture(outcome).await;
                self.dirty = true;
            }

            // Render only when dirty (non-blocking - sends to render thread)
            if self.dirty {
                self.sync_state();
                self.dirty = !render_thread.render(self.state.clone());
            }

            // Loads run after the frame showing the loading state went out
            if let Some(scope) = self.pending_load.take() {
                self.load(scope).await;
                continue;
            }

            if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => self.handle_action(action).await,
                    InputResult::Char(c) => self.handle_char(c),
                    InputResult::Backspace => self.handle_backspace(),
                    InputResult::Mouse(mouse) => self.handle_mouse(mouse).await,
                    InputResult::Resize(width, height) => self.resize(width, height),
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    async fn load(&mut self, scope: Scope) {
        match self.triage.load(scope).await {
            Ok(count) => {
                tracing::debug!("Showing {} messages for {}", count, scope);
                self.state.cursor = 0;
                self.state.scroll = 0;
            }
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Mailbox rejected the session: {}", e);
            }
            Err(e) => {
                tracing::warn!("Load failed: {}", e);
            }
        }
        // A failed load keeps the previous list and its scope
        self.state.scope = self.triage.scope();
        self.state.loading_since = None;
        self.dirty = true;
    }
}
