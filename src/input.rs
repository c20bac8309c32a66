use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    JumpTop,       // g: first line of the report
    JumpBottom,    // G: last page of the report
    CycleTheme,    // t: cycle pager colour theme
    None,
}

pub fn handle_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _)
        | (KeyCode::Char('Q'), _)
        | (KeyCode::Esc, _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('f'), KeyModifiers::CONTROL)
        | (KeyCode::Char(' '), _)
        | (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL)
        | (KeyCode::PageUp, _)   => Action::PageUp,

        // arrow keys and vim jk
        (KeyCode::Up,   _) | (KeyCode::Char('k'), _) => Action::ScrollUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), _)
        | (KeyCode::Enter, _)                        => Action::ScrollDown,

        (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Action::JumpTop,
        (KeyCode::Char('G'), _) | (KeyCode::End,  _) => Action::JumpBottom,

        (KeyCode::Char('t'), _) => Action::CycleTheme,

        _ => Action::None,
    }
}
