use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Actions
    Open,
    Back,
    Quit,
    MarkRead,
    Archive,
    CreateTask,
    OpenInBrowser,
    Refresh,
    NextScope,
    Undo,

    // Multi-select
    Select,
    SelectAll,

    // Help
    Help,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

/// A displayable keybinding entry
#[derive(Debug, Clone)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: &'static str,
    pub category: &'static str,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
        }
    }
}

impl KeyBindings {
    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// Get all keybindings as displayable entries grouped by category
    pub fn all_bindings(&self) -> Vec<KeybindingEntry> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(event, action)| KeybindingEntry {
                key: format_key_event(event),
                description: action_description(*action),
                category: action_category(*action),
            })
            .collect();

        entries.sort_by(|a, b| {
            category_order(a.category)
                .cmp(&category_order(b.category))
                .then_with(|| a.description.cmp(b.description))
                .then_with(|| a.key.cmp(&b.key))
        });
        entries
    }

    fn default_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        // Navigation
        map.insert(key('j'), Action::Down);
        map.insert(key('k'), Action::Up);
        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key('g'), Action::Top);
        map.insert(shift_key('G'), Action::Bottom);
        map.insert(key_code(KeyCode::Home), Action::Top);
        map.insert(key_code(KeyCode::End), Action::Bottom);
        map.insert(ctrl_key('d'), Action::PageDown);
        map.insert(ctrl_key('u'), Action::PageUp);
        map.insert(key_code(KeyCode::PageDown), Action::PageDown);
        map.insert(key_code(KeyCode::PageUp), Action::PageUp);

        // Actions
        map.insert(key_code(KeyCode::Enter), Action::Open);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(key('q'), Action::Quit);
        map.insert(key('m'), Action::MarkRead);
        map.insert(key('e'), Action::Archive);
        map.insert(key('t'), Action::CreateTask);
        map.insert(key('o'), Action::OpenInBrowser);
        map.insert(ctrl_key('r'), Action::Refresh);
        map.insert(shift_key('R'), Action::Refresh);
        map.insert(key_code(KeyCode::Tab), Action::NextScope);
        map.insert(key('u'), Action::Undo);
        map.insert(ctrl_key('z'), Action::Undo);

        // Multi-select
        map.insert(key(' '), Action::Select);
        map.insert(key('v'), Action::Select);
        map.insert(shift_key('V'), Action::SelectAll);

        // Help
        map.insert(key('?'), Action::Help);

        map
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn shift_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl+");
    }

    let key_str = match event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", parts.join(""), key_str)
}

fn action_description(action: Action) -> &'static str {
    match action {
        Action::Up => "Move up",
        Action::Down => "Move down",
        Action::Top => "Go to top",
        Action::Bottom => "Go to bottom",
        Action::PageUp => "Page up",
        Action::PageDown => "Page down",
        Action::Open => "Open email / toggle in selection",
        Action::Back => "Go back / leave selection",
        Action::Quit => "Quit",
        Action::MarkRead => "Mark as read",
        Action::Archive => "Archive",
        Action::CreateTask => "Add to tasks",
        Action::OpenInBrowser => "Open in mail provider",
        Action::Refresh => "Refresh",
        Action::NextScope => "Next time range",
        Action::Undo => "Undo last removal",
        Action::Select => "Select / toggle",
        Action::SelectAll => "Select all",
        Action::Help => "Toggle help",
    }
}

fn action_category(action: Action) -> &'static str {
    match action {
        Action::Up
        | Action::Down
        | Action::Top
        | Action::Bottom
        | Action::PageUp
        | Action::PageDown => "Navigation",

        Action::Open
        | Action::Back
        | Action::Quit
        | Action::MarkRead
        | Action::Archive
        | Action::CreateTask
        | Action::OpenInBrowser
        | Action::Refresh
        | Action::NextScope
        | Action::Undo => "Actions",

        Action::Select | Action::SelectAll => "Selection",

        Action::Help => "Help",
    }
}

fn category_order(category: &str) -> u8 {
    match category {
        "Navigation" => 0,
        "Actions" => 1,
        "Selection" => 2,
        "Help" => 3,
        _ => 99,
    }
}
