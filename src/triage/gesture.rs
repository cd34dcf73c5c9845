//! Pointer gesture recognition for list rows
//!
//! A press either becomes a horizontal swipe (mark read / archive), a
//! long-press (enter multi-select), a tap, or is abandoned as a scroll.
//! Every entry point takes the current instant so the long-press timer can
//! be driven without real time passing.

use std::time::{Duration, Instant};

use super::actions::MailAction;
use super::selection::Selection;
use crate::constants::{
    DRAG_SLOP, LONG_PRESS_MS, PULL_RESISTANCE, PULL_THRESHOLD, SWIPE_RESISTANCE, SWIPE_THRESHOLD,
};
use crate::mail::types::MessageId;

#[derive(Debug, Clone, Copy)]
pub struct GestureConfig {
    /// Displayed offset a swipe must reach to commit
    pub swipe_threshold: f32,
    /// Fraction of the raw drag that becomes displayed offset
    pub resistance: f32,
    /// Movement tolerated before a press stops counting as a tap
    pub drag_slop: f32,
    pub long_press: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: SWIPE_THRESHOLD,
            resistance: SWIPE_RESISTANCE,
            drag_slop: DRAG_SLOP,
            long_press: Duration::from_millis(LONG_PRESS_MS),
        }
    }
}

/// How a row should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemState {
    Idle,
    Swiping(f32),
    LongPressArmed,
    Selected,
}

/// What the caller should do once a gesture resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    Commit { id: MessageId, action: MailAction },
    SnapBack(MessageId),
    EnterSelection(MessageId),
    Toggle(MessageId),
    Tap(MessageId),
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    /// Pressed, undecided. The long-press timer runs unless multi-selecting.
    Pressed {
        id: MessageId,
        origin: (f32, f32),
        started: Instant,
        multi_select: bool,
    },
    Swiping {
        id: MessageId,
        origin_x: f32,
        offset: f32,
    },
    /// Long-press fired; waiting for release
    Held,
}

#[derive(Debug, Clone, Default)]
pub struct GestureController {
    config: GestureConfig,
    phase: Phase,
}

impl GestureController {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    /// Press on row `id`. `multi_select` suspends swipes and long-press.
    pub fn touch_start(
        &mut self,
        id: MessageId,
        x: f32,
        y: f32,
        now: Instant,
        multi_select: bool,
    ) {
        self.phase = Phase::Pressed {
            id,
            origin: (x, y),
            started: now,
            multi_select,
        };
    }

    /// Pointer moved while pressed. May fire an overdue long-press.
    pub fn touch_move(&mut self, x: f32, y: f32, now: Instant) -> Option<GestureOutcome> {
        if let Some(fired) = self.tick(now) {
            return Some(fired);
        }

        let slop = self.config.drag_slop;
        let resistance = self.config.resistance;
        let next = match &mut self.phase {
            Phase::Pressed {
                id,
                origin,
                multi_select,
                ..
            } => {
                let dx = x - origin.0;
                let dy = y - origin.1;
                if *multi_select {
                    (dx.abs() > slop || dy.abs() > slop).then_some(Phase::Idle)
                } else if dx.abs() > slop && dx.abs() >= dy.abs() {
                    Some(Phase::Swiping {
                        id: id.clone(),
                        origin_x: origin.0,
                        offset: dx * resistance,
                    })
                } else if dy.abs() > slop {
                    // Scroll
                    Some(Phase::Idle)
                } else {
                    None
                }
            }
            Phase::Swiping {
                origin_x, offset, ..
            } => {
                *offset = (x - *origin_x) * resistance;
                None
            }
            Phase::Held | Phase::Idle => None,
        };
        if let Some(next) = next {
            self.phase = next;
        }
        None
    }

    /// Pointer released
    pub fn touch_end(&mut self, now: Instant) -> Option<GestureOutcome> {
        if let Some(fired) = self.tick(now) {
            self.phase = Phase::Idle;
            return Some(fired);
        }

        match std::mem::take(&mut self.phase) {
            Phase::Pressed {
                id, multi_select, ..
            } => Some(if multi_select {
                GestureOutcome::Toggle(id)
            } else {
                GestureOutcome::Tap(id)
            }),
            Phase::Swiping { id, offset, .. } => {
                if offset.abs() >= self.config.swipe_threshold {
                    let action = if offset > 0.0 {
                        MailAction::MarkRead
                    } else {
                        MailAction::Archive
                    };
                    Some(GestureOutcome::Commit { id, action })
                } else {
                    Some(GestureOutcome::SnapBack(id))
                }
            }
            Phase::Held | Phase::Idle => None,
        }
    }

    /// Fire the long-press timer if it is due
    pub fn tick(&mut self, now: Instant) -> Option<GestureOutcome> {
        let Phase::Pressed {
            id,
            started,
            multi_select: false,
            ..
        } = &self.phase
        else {
            return None;
        };
        if now.duration_since(*started) < self.config.long_press {
            return None;
        }
        let id = id.clone();
        self.phase = Phase::Held;
        Some(GestureOutcome::EnterSelection(id))
    }

    /// Abandon whatever is in progress
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn item_state(&self, id: &MessageId, selection: &Selection) -> ItemState {
        if selection.is_active() && selection.contains(id) {
            return ItemState::Selected;
        }
        match &self.phase {
            Phase::Swiping {
                id: active, offset, ..
            } if active == id => ItemState::Swiping(*offset),
            Phase::Pressed {
                id: active,
                multi_select: false,
                ..
            } if active == id => ItemState::LongPressArmed,
            _ => ItemState::Idle,
        }
    }
}

/// Pull-down-to-refresh tracking for the top of the list
#[derive(Debug, Clone)]
pub struct PullToRefresh {
    threshold: f32,
    resistance: f32,
    origin: Option<f32>,
    distance: f32,
}

impl Default for PullToRefresh {
    fn default() -> Self {
        Self::new(PULL_THRESHOLD, PULL_RESISTANCE)
    }
}

impl PullToRefresh {
    pub fn new(threshold: f32, resistance: f32) -> Self {
        Self {
            threshold,
            resistance,
            origin: None,
            distance: 0.0,
        }
    }

    /// Start tracking. Ignored unless the list is scrolled to the top.
    pub fn start(&mut self, y: f32, at_top: bool) {
        if at_top {
            self.origin = Some(y);
            self.distance = 0.0;
        }
    }

    pub fn update(&mut self, y: f32) {
        if let Some(origin) = self.origin {
            self.distance = ((y - origin) * self.resistance).max(0.0);
        }
    }

    /// Stop tracking; true if the pull went far enough to refresh
    pub fn release(&mut self) -> bool {
        let triggered = self.origin.is_some() && self.ready();
        self.origin = None;
        self.distance = 0.0;
        triggered
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn ready(&self) -> bool {
        self.distance >= self.threshold
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}
