mod list;
mod popups;
mod reader;
mod status_bar;
pub mod theme;
mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders},
};

pub use list::{list_capacity, row_at};

use crate::app::state::{AppState, Modal, View};
use crate::constants::MIN_SPLIT_VIEW_WIDTH;
use theme::Theme;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(list::LIST_TOP), // Header
            Constraint::Min(0),                 // List or reader
            Constraint::Length(1),              // Status line
            Constraint::Length(1),              // Key hints
        ])
        .split(area);

    list::render_header(frame, chunks[0], state);

    match &state.view {
        View::List => list::render_list(frame, chunks[1], state),
        View::Reader(reader) if area.width >= MIN_SPLIT_VIEW_WIDTH => {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(chunks[1]);
            list::render_list(frame, panes[0], state);

            let block = Block::default()
                .borders(Borders::LEFT)
                .border_style(Theme::border());
            let inner = block.inner(panes[1]);
            frame.render_widget(block, panes[1]);
            reader::render_reader(frame, inner, reader);
        }
        View::Reader(reader) => reader::render_reader(frame, chunks[1], reader),
    }

    status_bar::render_status(frame, chunks[2], state);
    status_bar::render_hints(frame, chunks[3], state);

    match &state.modal {
        Modal::Help { scroll } => popups::render_help_popup(frame, area, &state.help, *scroll),
        Modal::DuePicker(picker) => popups::render_due_picker(frame, area, picker),
        Modal::None => {}
    }
}
