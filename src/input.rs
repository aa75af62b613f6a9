use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys the statistics screen and the interface picker react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ScrollTowardTail, // Down arrow
    ScrollTowardHead, // Up arrow
    PageTowardTail,   // PageDown, Space
    PageTowardHead,   // PageUp, '-'
    RedrawScreen,     // Ctrl+L, 'l'
    Select,           // Enter (picker only)
    Quit,             // q, x, Esc, Ctrl+C

    Unknown,
}

impl InputEvent {
    pub fn from_key_event(key_event: KeyEvent) -> Self {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Down, _) => Self::ScrollTowardTail,
            (KeyCode::Up, _) => Self::ScrollTowardHead,

            (KeyCode::PageDown, _) | (KeyCode::Char(' '), _) => Self::PageTowardTail,
            (KeyCode::PageUp, _) | (KeyCode::Char('-'), _) => Self::PageTowardHead,

            (KeyCode::Char('l' | 'L'), _) => Self::RedrawScreen,

            (KeyCode::Enter, _) => Self::Select,

            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Self::Quit,
            (KeyCode::Char('q' | 'Q' | 'x' | 'X'), _) => Self::Quit,
            (KeyCode::Esc, _) => Self::Quit,

            _ => Self::Unknown,
        }
    }
}
