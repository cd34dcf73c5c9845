//! Status line (notices, load errors, counts) and the key hint bar

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;
use super::widgets::{help_bar, truncate_string};
use crate::app::state::{AppState, View};
use crate::triage::notice::NoticeKind;

pub fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let width = area.width as usize;

    let (left, style) = if let Some(notice) = &state.notice {
        let style = match notice.kind {
            NoticeKind::Success => Theme::notice_success(),
            NoticeKind::Error => Theme::notice_error(),
        };
        let text = if notice.undo.is_some() {
            format!("{} · u to undo", notice.message)
        } else {
            notice.message.clone()
        };
        (text, style)
    } else if let Some(err) = &state.load_error {
        (format!("Error: {}", err), Theme::notice_error())
    } else {
        (String::new(), Theme::status_bar())
    };

    let right = format!("{} messages ", state.rows.len());
    let left = truncate_string(&left, width.saturating_sub(right.width() + 2));
    let pad = width.saturating_sub(left.width() + right.width() + 1);

    let line = Line::from(vec![
        Span::styled(format!(" {}", left), style),
        Span::styled(" ".repeat(pad), Theme::status_bar()),
        Span::styled(right, Theme::status_bar()),
    ]);
    frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
}

pub fn render_hints(frame: &mut Frame, area: Rect, state: &AppState) {
    let hints: &[(&str, &str)] = match (&state.view, state.multi_select) {
        (View::Reader(_), _) => &[
            ("j/k", "scroll"),
            ("m", "read"),
            ("e", "archive"),
            ("t", "task"),
            ("o", "browser"),
            ("Esc", "back"),
        ],
        (View::List, true) => &[
            ("Space", "toggle"),
            ("V", "all"),
            ("m", "read"),
            ("e", "archive"),
            ("t", "tasks"),
            ("Esc", "done"),
        ],
        (View::List, false) => &[
            ("Enter", "open"),
            ("m", "read"),
            ("e", "archive"),
            ("t", "task"),
            ("u", "undo"),
            ("Tab", "scope"),
            ("v", "select"),
            ("?", "help"),
        ],
    };
    help_bar(frame, area, hints);
}
