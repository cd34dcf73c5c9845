//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Delay in milliseconds between a successful action and the row leaving the list.
pub const TRANSITION_DELAY_MS: u64 = 300;

/// Window in milliseconds during which a removal can be undone.
pub const UNDO_WINDOW_MS: u64 = 5_000;

/// Lifetime in milliseconds of a notice without an undo offer.
pub const NOTICE_TTL_MS: u64 = 3_000;

// === Gesture Constants ===

/// Hold duration in milliseconds that turns a press into a long-press.
pub const LONG_PRESS_MS: u64 = 500;

/// Displayed offset (after resistance) a swipe must reach to commit.
pub const SWIPE_THRESHOLD: f32 = 100.0;

/// Fraction of the raw horizontal drag shown as row offset.
pub const SWIPE_RESISTANCE: f32 = 0.6;

/// Movement in units before a press is treated as a drag.
pub const DRAG_SLOP: f32 = 10.0;

/// Pull distance (after resistance) that triggers a refresh.
pub const PULL_THRESHOLD: f32 = 80.0;

/// Fraction of the raw vertical pull shown as pull distance.
pub const PULL_RESISTANCE: f32 = 0.5;

/// Gesture units per terminal column/row when driven by a mouse.
/// A 100 unit swipe threshold then needs roughly 20 columns of drag.
pub const UNITS_PER_CELL: f32 = 8.0;

// === UI Constants ===

/// Event poll timeout in milliseconds. Bounds how late timers fire.
pub const POLL_INTERVAL_MS: u64 = 50;

/// Minimum terminal width to show the reader pane beside the list.
/// Below this width the reader takes the whole screen.
pub const MIN_SPLIT_VIEW_WIDTH: u16 = 100;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;
