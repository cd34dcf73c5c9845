//! Navigation actions (movement, scrolling)

use crate::app::state::View;

use super::super::App;

impl App {
    pub(crate) fn move_by(&mut self, delta: isize) {
        match &mut self.state.view {
            View::List => self.state.move_cursor(delta),
            View::Reader(reader) => {
                reader.scroll = reader.scroll.saturating_add_signed(delta as i16);
            }
        }
    }

    pub(crate) fn move_to_top(&mut self) {
        match &mut self.state.view {
            View::List => self.state.cursor_to(0),
            View::Reader(reader) => reader.scroll = 0,
        }
    }

    pub(crate) fn move_to_bottom(&mut self) {
        match &mut self.state.view {
            View::List => self.state.cursor_to(self.state.rows.len().saturating_sub(1)),
            View::Reader(reader) => {
                let lines = reader.text.lines().count();
                reader.scroll = u16::try_from(lines).unwrap_or(u16::MAX);
            }
        }
    }

    /// Move one screenful in `direction` (-1 up, 1 down)
    pub(crate) fn move_page(&mut self, direction: isize) {
        let page = self.state.visible_rows.max(1) as isize;
        self.move_by(direction * page);
    }
}
