//! Common UI widgets and utilities

use chrono::{DateTime, Datelike, Local, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let available_width = area.width as usize;

    // Format: " key desc │" (separator between hints)
    let mut total_width = 0;
    let mut hints_to_show = 0;
    for (i, (key, desc)) in hints.iter().enumerate() {
        let separator = if i + 1 < hints.len() { 3 } else { 1 };
        let width = key.width() + 2 + desc.width() + separator;
        if total_width + width > available_width {
            break;
        }
        total_width += width;
        hints_to_show += 1;
    }
    hints_to_show = hints_to_show.max(1).min(hints.len());

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().take(hints_to_show).enumerate() {
        spans.push(Span::styled(format!(" {} ", key), Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        if i + 1 < hints_to_show {
            spans.push(Span::styled(" │ ", Theme::help_desc()));
        }
    }
    spans.push(Span::styled(" ", Theme::help_desc()));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Theme::status_bar()),
        area,
    );
}

/// Cut `s` to at most `max_width` terminal columns, ending in "..." when cut
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = if max_width > 3 { max_width - 3 } else { max_width };

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 3 {
        out.push_str("...");
    }
    out
}

/// Short date for list rows: time today, weekday this week, else the date
pub fn format_date(date: DateTime<Utc>, now: DateTime<Local>) -> String {
    let dt = date.with_timezone(&Local);
    let today = now.date_naive();
    let day = dt.date_naive();

    if day == today {
        dt.format("%H:%M").to_string()
    } else if (today - day).num_days() < 7 {
        dt.format("%a %H:%M").to_string()
    } else if day.year() == today.year() {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Sanitize text for display: remove control characters and ANSI escape sequences
pub fn sanitize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Skip until the final letter of the sequence
            while let Some(ch) = chars.next() {
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if c.is_control() && c != '\n' && c != '\t' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

/// Creates a centered rect with min/max constraints for width and height.
/// The size prefers max, shrinks to fit `area`, and never drops below min.
pub fn centered_rect_constrained(
    area: Rect,
    min_width: u16,
    max_width: u16,
    min_height: u16,
    max_height: u16,
) -> Rect {
    let w = max_width.min(area.width.saturating_sub(4)).max(min_width);
    let h = max_height
        .min(area.height.saturating_sub(4))
        .max(min_height);

    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w.min(area.width), h.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_counts_columns() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("日本語のメール", 7), "日本...");
        assert_eq!(truncate_string("abcdef", 2), "ab");
    }

    #[test]
    fn test_sanitize_strips_escapes() {
        assert_eq!(sanitize_text("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(sanitize_text("a\rb\nc"), "a b\nc");
    }

    #[test]
    fn test_format_date_buckets() {
        let now = Local.with_ymd_and_hms(2026, 5, 20, 15, 0, 0).unwrap();
        let today = now.with_timezone(&Utc) - chrono::Duration::hours(1);
        assert_eq!(format_date(today, now).len(), 5); // HH:MM

        let last_year = Local
            .with_ymd_and_hms(2025, 1, 2, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date(last_year, now), "2025-01-02");
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect_constrained(area, 20, 60, 5, 20);
        assert_eq!(rect.width, 36);
        assert_eq!(rect.height, 6);
        assert_eq!(rect.x, 2);
    }
}
