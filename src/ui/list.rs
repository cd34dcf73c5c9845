//! Ranked message list with swipe, selection and pull indicators

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::theme::{Theme, symbols, with_row_bg};
use super::widgets::{format_date, sanitize_text, truncate_string};
use crate::app::state::{AppState, RowView};
use crate::constants::SPINNER_FRAME_MS;
use crate::mail::types::URGENT_SCORE;
use crate::triage::gesture::ItemState;

/// Screen row where the list starts (below the header)
pub const LIST_TOP: u16 = 1;
/// Lines per message row
pub const ROW_HEIGHT: u16 = 2;
/// Header, status line and help bar
const CHROME_LINES: u16 = 3;

/// Number of message rows that fit in a terminal of `height` lines
pub fn list_capacity(height: u16) -> usize {
    usize::from(height.saturating_sub(CHROME_LINES) / ROW_HEIGHT).max(1)
}

/// Index of the message under screen row `screen_row`, if it is a list row
pub fn row_at(screen_row: u16, scroll: usize, visible_rows: usize) -> Option<usize> {
    let offset = usize::from(screen_row.checked_sub(LIST_TOP)? / ROW_HEIGHT);
    (offset < visible_rows).then_some(scroll + offset)
}

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(" Triage ", Theme::text_bold()),
        Span::styled(format!("· {} ", state.scope.label()), Theme::text_accent()),
    ];

    if state.urgent_count > 0 {
        spans.push(Span::styled(
            format!(" {} {} urgent ", symbols::URGENT, state.urgent_count),
            Theme::score_badge(URGENT_SCORE),
        ));
    }
    if state.multi_select {
        spans.push(Span::styled(
            format!(" {} selected ", state.selected_count),
            Theme::text_accent(),
        ));
    }
    if let Some(started) = state.loading_since {
        let frame_idx = (started.elapsed().as_millis() / SPINNER_FRAME_MS) as usize;
        let spinner = symbols::SPINNER[frame_idx % symbols::SPINNER.len()];
        spans.push(Span::styled(
            format!(" {} loading ", spinner),
            Theme::text_muted(),
        ));
    } else if state.pull_distance > 0.0 {
        let label = if state.pull_ready {
            "release to refresh"
        } else {
            "pull to refresh"
        };
        spans.push(Span::styled(
            format!(" {} {} ", symbols::PULL, label),
            Theme::swipe_hint(state.pull_ready),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::text()), area);
}

pub fn render_list(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.rows.is_empty() {
        let text = if state.is_loading() {
            String::new()
        } else if let Some(err) = &state.load_error {
            format!("Could not load messages: {}", err)
        } else {
            format!("Nothing unread for {}", state.scope.label())
        };
        let y = area.y + area.height / 2;
        let line_area = Rect::new(
            area.x,
            y.min(area.bottom().saturating_sub(1)),
            area.width,
            1,
        );
        frame.render_widget(Paragraph::new("").style(Theme::text()), area);
        frame.render_widget(
            Paragraph::new(text)
                .style(Theme::text_muted())
                .alignment(Alignment::Center),
            line_area,
        );
        return;
    }

    let now = Local::now();
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(state.visible_rows * ROW_HEIGHT as usize);
    for (index, row) in state
        .rows
        .iter()
        .enumerate()
        .skip(state.scroll)
        .take(state.visible_rows)
    {
        let [first, second] = row_lines(row, index == state.cursor, state, width, now);
        lines.push(first);
        lines.push(second);
    }

    frame.render_widget(Paragraph::new(lines).style(Theme::text()), area);
}

fn row_lines(
    row: &RowView,
    is_cursor: bool,
    state: &AppState,
    width: usize,
    now: chrono::DateTime<Local>,
) -> [Line<'static>; 2] {
    let message = &row.message;
    let checked = row.state == ItemState::Selected;
    let bg = |style: Style| with_row_bg(style, is_cursor, checked);

    let base = if row.leaving {
        Theme::leaving()
    } else if row.state == ItemState::LongPressArmed {
        Theme::text_accent()
    } else {
        Theme::text()
    };

    // Swipes shift the row horizontally by the displayed offset
    let (indent, hint) = match row.state {
        ItemState::Swiping(offset) => {
            let columns = (offset.abs() / state.units_per_cell.max(1.0)) as usize;
            let committing = offset.abs() >= state.swipe_threshold;
            let label = if offset > 0.0 {
                symbols::SWIPE_READ
            } else {
                symbols::SWIPE_ARCHIVE
            };
            (columns.min(width / 2), Some((label, committing)))
        }
        _ => (0, None),
    };

    let mut first: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    if let Some((label, committing)) = hint {
        let shown = truncate_string(label, indent);
        used += indent;
        first.push(Span::styled(
            format!("{:<indent$}", shown),
            bg(Theme::swipe_hint(committing)),
        ));
    }

    if state.multi_select {
        let mark = if checked {
            symbols::CHECKED
        } else {
            symbols::UNCHECKED
        };
        first.push(Span::styled(format!("{} ", mark), bg(Theme::text_accent())));
        used += mark.width() + 1;
    }

    let score = message.score();
    first.push(Span::styled(
        format!(" {} ", score),
        bg(Theme::score_badge(score)),
    ));
    used += 3;

    let mark = if row.tasked { symbols::TASKED } else { " " };
    first.push(Span::styled(format!("{} ", mark), bg(Theme::tasked())));
    used += 2;

    let date = format_date(message.date, now);
    let from = truncate_string(&sanitize_text(&message.from_name), 20);
    let name_width = from.width() + 2;
    let subject_width = width.saturating_sub(used + name_width + date.width() + 2);
    let subject = truncate_string(&sanitize_text(&message.subject), subject_width);
    let pad = width.saturating_sub(used + name_width + subject.width() + date.width() + 1);

    first.push(Span::styled(
        format!("{}  ", from),
        bg(base.add_modifier(Modifier::BOLD)),
    ));
    first.push(Span::styled(subject, bg(base)));
    first.push(Span::styled(" ".repeat(pad), bg(base)));
    first.push(Span::styled(format!("{} ", date), bg(Theme::text_muted())));

    let (category, detail) = match &message.analysis {
        Some(analysis) => (
            analysis.category().label(),
            format!("{} · {}", analysis.action_item(), analysis.summary()),
        ),
        None => ("", sanitize_text(&message.snippet)),
    };
    let prefix = " ".repeat(indent + 6);
    let detail_width = width.saturating_sub(prefix.width() + category.width() + 2);
    let detail = truncate_string(&detail.replace('\n', " "), detail_width);
    let second_pad = width.saturating_sub(prefix.width() + category.width() + 1 + detail.width());
    let detail_style = if row.leaving {
        Theme::leaving()
    } else {
        Theme::text_secondary()
    };
    let second = vec![
        Span::styled(prefix, bg(Theme::text())),
        Span::styled(format!("{} ", category), bg(Theme::category())),
        Span::styled(detail, bg(detail_style)),
        Span::styled(" ".repeat(second_pad), bg(Theme::text())),
    ];

    [Line::from(first), Line::from(second)]
}
