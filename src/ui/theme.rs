//! Colors and pre-composed styles for the dashboard

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Catppuccin Mocha palette
mod palette {
    use super::Color;

    pub const BASE: Color = Color::Rgb(30, 30, 46); // #1e1e2e
    pub const MANTLE: Color = Color::Rgb(24, 24, 37); // #181825
    pub const SURFACE0: Color = Color::Rgb(49, 50, 68); // #313244
    pub const SURFACE1: Color = Color::Rgb(69, 71, 90); // #45475a

    pub const TEXT: Color = Color::Rgb(205, 214, 244); // #cdd6f4
    pub const SUBTEXT0: Color = Color::Rgb(166, 173, 200); // #a6adc8
    pub const OVERLAY0: Color = Color::Rgb(108, 112, 134); // #6c7086

    pub const LAVENDER: Color = Color::Rgb(180, 190, 254); // #b4befe
    pub const BLUE: Color = Color::Rgb(137, 180, 250); // #89b4fa
    pub const GREEN: Color = Color::Rgb(166, 227, 161); // #a6e3a1
    pub const YELLOW: Color = Color::Rgb(249, 226, 175); // #f9e2af
    pub const PEACH: Color = Color::Rgb(250, 179, 135); // #fab387
    pub const RED: Color = Color::Rgb(243, 139, 168); // #f38ba8
    pub const MAUVE: Color = Color::Rgb(203, 166, 247); // #cba6f7
}

pub mod colors {
    use super::{Color, palette};
    use crate::mail::types::URGENT_SCORE;

    pub fn bg_main() -> Color {
        palette::BASE
    }

    pub fn bg_status() -> Color {
        palette::MANTLE
    }

    pub fn bg_selection() -> Color {
        palette::SURFACE1
    }

    pub fn bg_checked() -> Color {
        palette::SURFACE0
    }

    pub fn fg_primary() -> Color {
        palette::TEXT
    }

    pub fn fg_secondary() -> Color {
        palette::SUBTEXT0
    }

    pub fn fg_muted() -> Color {
        palette::OVERLAY0
    }

    pub fn fg_accent() -> Color {
        palette::BLUE
    }

    pub fn fg_warning() -> Color {
        palette::YELLOW
    }

    pub fn fg_error() -> Color {
        palette::RED
    }

    pub fn fg_success() -> Color {
        palette::GREEN
    }

    pub fn border() -> Color {
        palette::SURFACE0
    }

    pub fn border_focused() -> Color {
        palette::LAVENDER
    }

    /// Score badge color: red for urgent, peach for notable, muted otherwise
    pub fn score(score: u8) -> Color {
        match score {
            URGENT_SCORE.. => palette::RED,
            3 => palette::PEACH,
            _ => palette::OVERLAY0,
        }
    }

    pub fn category() -> Color {
        palette::MAUVE
    }
}

pub mod symbols {
    pub const CHECKED: &str = "[x]";
    pub const UNCHECKED: &str = "[ ]";
    pub const TASKED: &str = "✓";
    pub const URGENT: &str = "!";
    pub const SWIPE_READ: &str = "→ read";
    pub const SWIPE_ARCHIVE: &str = "archive ←";
    pub const PULL: &str = "↓";
    pub const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];
}

/// Pre-composed styles for common UI elements
pub struct Theme;

impl Theme {
    pub fn selected() -> Style {
        Style::default()
            .bg(colors::bg_selection())
            .fg(colors::fg_primary())
    }

    pub fn text() -> Style {
        Style::default()
            .fg(colors::fg_primary())
            .bg(colors::bg_main())
    }

    pub fn text_bold() -> Style {
        Self::text().add_modifier(Modifier::BOLD)
    }

    pub fn text_secondary() -> Style {
        Style::default()
            .fg(colors::fg_secondary())
            .bg(colors::bg_main())
    }

    pub fn text_muted() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .bg(colors::bg_main())
    }

    pub fn text_accent() -> Style {
        Style::default()
            .fg(colors::fg_accent())
            .bg(colors::bg_main())
    }

    /// Rows waiting out their exit transition
    pub fn leaving() -> Style {
        Self::text_muted().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    }

    pub fn score_badge(score: u8) -> Style {
        Style::default()
            .fg(colors::score(score))
            .add_modifier(Modifier::BOLD)
    }

    pub fn category() -> Style {
        Style::default().fg(colors::category())
    }

    pub fn tasked() -> Style {
        Style::default().fg(colors::fg_success())
    }

    pub fn swipe_hint(committing: bool) -> Style {
        if committing {
            Style::default()
                .fg(colors::fg_warning())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::fg_muted())
        }
    }

    // === Status Bar ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    pub fn notice_success() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_success())
    }

    pub fn notice_error() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_error())
            .add_modifier(Modifier::BOLD)
    }

    pub fn help_key() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_warning())
    }

    pub fn help_desc() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_muted())
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default().fg(colors::border())
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors::border_focused())
    }

    pub fn border_type() -> BorderType {
        BorderType::Rounded
    }
}

/// Merge a style with the row background: highlight for the cursor row,
/// a softer tint for checked rows in multi-select.
pub fn with_row_bg(style: Style, cursor: bool, checked: bool) -> Style {
    if cursor {
        style.bg(colors::bg_selection())
    } else if checked {
        style.bg(colors::bg_checked())
    } else {
        style.bg(colors::bg_main())
    }
}
