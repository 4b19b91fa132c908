//! Key bindings: arrows, vim-style and wasd.

use crate::grid::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press. Everything outside the canonical set maps to
/// `None` here, so no other input can reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Reset,
    Quit,
    None,
}

impl Action {
    /// The move direction, if this action is one.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Map key event to game action. Supports arrows, vim (hjkl) and wasd.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Action::Reset,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => Action::Right,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_vim_and_wasd_map_to_directions() {
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::Up);
        assert_eq!(key_to_action(key(KeyCode::Char('k'))), Action::Up);
        assert_eq!(key_to_action(key(KeyCode::Char('w'))), Action::Up);
        assert_eq!(key_to_action(key(KeyCode::Left)), Action::Left);
        assert_eq!(key_to_action(key(KeyCode::Char('h'))), Action::Left);
        assert_eq!(key_to_action(key(KeyCode::Char('a'))), Action::Left);
    }

    #[test]
    fn reset_and_quit_accept_both_cases() {
        assert_eq!(key_to_action(key(KeyCode::Char('r'))), Action::Reset);
        assert_eq!(key_to_action(key(KeyCode::Char('R'))), Action::Reset);
        assert_eq!(key_to_action(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('Q'))), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn unbound_or_modified_keys_are_filtered() {
        assert_eq!(key_to_action(key(KeyCode::Char('x'))), Action::None);
        assert_eq!(key_to_action(key(KeyCode::Tab)), Action::None);
        let ctrl_left = KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_left), Action::None);
    }

    #[test]
    fn direction_helper_only_covers_moves() {
        assert_eq!(Action::Up.direction(), Some(Direction::Up));
        assert_eq!(Action::Reset.direction(), None);
        assert_eq!(Action::Quit.direction(), None);
    }
}
