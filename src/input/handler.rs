use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, Modal};

pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
    Mouse(MouseEvent),
    Resize(u16, u16),
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(key_event, state, bindings)
        }
        Event::Mouse(mouse) => InputResult::Mouse(mouse),
        Event::Resize(width, height) => InputResult::Resize(width, height),
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match &state.modal {
        Modal::Help { .. } => return handle_help_input(key, bindings),
        Modal::DuePicker(picker) => return handle_due_picker_input(key, picker.editing_custom()),
        Modal::None => {}
    }

    if let Some(action) = bindings.get(&key) {
        if action == Action::Quit {
            return InputResult::Quit;
        }
        return InputResult::Action(action);
    }

    InputResult::Continue
}

fn handle_help_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // In help modal: j/k scroll, Esc or "?" closes
    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Help | Action::Back => return InputResult::Action(Action::Help),
            Action::Up | Action::Down => return InputResult::Action(action),
            _ => {}
        }
    }
    InputResult::Continue
}

fn handle_due_picker_input(key: KeyEvent, editing_custom: bool) -> InputResult {
    match key.code {
        KeyCode::Esc => InputResult::Action(Action::Back),
        KeyCode::Enter => InputResult::Action(Action::Open),
        KeyCode::Up => InputResult::Action(Action::Up),
        KeyCode::Down => InputResult::Action(Action::Down),
        KeyCode::Backspace if editing_custom => InputResult::Backspace,
        KeyCode::Char(c) if editing_custom => InputResult::Char(c),
        KeyCode::Char('k') => InputResult::Action(Action::Up),
        KeyCode::Char('j') => InputResult::Action(Action::Down),
        _ => InputResult::Continue,
    }
}
