//! Help and due date popups

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme::Theme;
use super::widgets::centered_rect_constrained;
use crate::app::state::DuePicker;
use crate::input::KeybindingEntry;

pub fn render_help_popup(frame: &mut Frame, area: Rect, keys: &[KeybindingEntry], scroll: u16) {
    let popup_area = centered_rect_constrained(area, 36, 52, 10, 40);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Help ")
        .title_bottom(" j/k scroll │ ? or Esc close ")
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_width = 12;
    let mut lines: Vec<Line> = Vec::new();
    let mut current_category: Option<&str> = None;
    for entry in keys {
        if current_category != Some(entry.category) {
            if current_category.is_some() {
                lines.push(Line::from(""));
            }
            let rule = "─".repeat(inner.width.saturating_sub(entry.category.len() as u16 + 4) as usize);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("── {} ", entry.category),
                    Theme::text_secondary().add_modifier(Modifier::BOLD),
                ),
                Span::styled(rule, Theme::border()),
            ]));
            current_category = Some(entry.category);
        }

        let key_display: String = entry.key.chars().take(key_width).collect();
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:key_width$}", key_display), Theme::text_accent()),
            Span::styled(entry.description, Theme::text()),
        ]));
    }

    let max_scroll = (lines.len() as u16).saturating_sub(inner.height);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Theme::text())
            .scroll((scroll.min(max_scroll), 0)),
        inner,
    );
}

pub fn render_due_picker(frame: &mut Frame, area: Rect, picker: &DuePicker) {
    let height = DuePicker::OPTIONS.len() as u16 + 4;
    let popup_area = centered_rect_constrained(area, 34, 44, height, height);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Add to tasks ")
        .title_bottom(" Enter confirm │ Esc cancel ")
        .borders(Borders::ALL)
        .border_type(Theme::border_type())
        .border_style(Theme::border_focused());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(" Due:", Theme::text_muted())));
    for (i, option) in DuePicker::OPTIONS.iter().enumerate() {
        let active = i == picker.cursor;
        let style = if active {
            Theme::selected().add_modifier(Modifier::BOLD)
        } else {
            Theme::text()
        };
        let marker = if active { "›" } else { " " };
        lines.push(Line::from(Span::styled(format!(" {} {}", marker, option), style)));
    }

    if picker.editing_custom() {
        let valid = picker.choice().is_some();
        let style = if valid || picker.custom.is_empty() {
            Theme::text_accent()
        } else {
            Theme::notice_error()
        };
        lines.push(Line::from(vec![
            Span::styled("   > ", Theme::text_muted()),
            Span::styled(format!("{}│", picker.custom), style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(Theme::text()), inner);
}
