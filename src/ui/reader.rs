use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::Theme;
use super::widgets::{sanitize_text, truncate_string};
use crate::app::state::ReaderView;

pub fn render_reader(frame: &mut Frame, area: Rect, reader: &ReaderView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Headers
            Constraint::Min(0),    // Body
        ])
        .split(area);

    render_headers(frame, chunks[0], reader);
    render_body(frame, chunks[1], reader);
}

fn render_headers(frame: &mut Frame, area: Rect, reader: &ReaderView) {
    let width = area.width.saturating_sub(10) as usize;
    let field = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!(" {:<8}", label), Theme::text_muted()),
            Span::styled(truncate_string(&sanitize_text(value), width), Theme::text()),
        ])
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", truncate_string(&sanitize_text(&reader.subject), width)),
            Theme::text_bold(),
        )),
        field("From:", &reader.from),
        field("Date:", &reader.date),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Theme::border());
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Theme::text()),
        area,
    );
}

fn render_body(frame: &mut Frame, area: Rect, reader: &ReaderView) {
    let text = sanitize_text(&reader.text);
    let paragraph = Paragraph::new(text)
        .style(Theme::text())
        .wrap(Wrap { trim: false })
        .scroll((reader.scroll, 0));
    frame.render_widget(paragraph, area);
}
