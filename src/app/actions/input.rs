//! Text input for the custom due date

use crate::app::state::Modal;

use super::super::App;

/// Length of a `YYYY-MM-DD` date
const DATE_LEN: usize = 10;

impl App {
    pub(crate) fn handle_char(&mut self, c: char) {
        if let Modal::DuePicker(picker) = &mut self.state.modal
            && picker.editing_custom()
            && (c.is_ascii_digit() || c == '-')
            && picker.custom.len() < DATE_LEN
        {
            picker.custom.push(c);
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        if let Modal::DuePicker(picker) = &mut self.state.modal
            && picker.editing_custom()
        {
            picker.custom.pop();
        }
    }
}
