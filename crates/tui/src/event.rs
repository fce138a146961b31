//! Event handling for the TUI.
//!
//! Provides keyboard and mouse event polling and key predicates.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

use crate::TuiResult;

/// An input event the app reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

/// Poll for input events with a timeout.
///
/// Returns `None` if nothing relevant happened within the timeout. Key
/// releases and repeats reported by some terminals are dropped.
pub fn poll_input(timeout: Duration) -> TuiResult<Option<Input>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Input::Key(key)),
        Event::Mouse(mouse) => Some(Input::Mouse(mouse)),
        Event::Resize(_, _) => Some(Input::Resize),
        _ => None,
    })
}

/// Check if the key event represents a quit command.
///
/// Returns `true` for 'q' key or Ctrl+C.
pub fn is_quit(key: &KeyEvent) -> bool {
    is_char(key, 'q') || is_ctrl_c(key)
}

/// Check if the key event is Ctrl+C.
pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    )
}

/// Check if the key event is a plain character (no Ctrl/Alt).
fn is_char(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c)
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

/// Check if the key event is the Tab key.
pub fn is_tab(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Tab,
            ..
        }
    )
}

/// Check if the key event is the down navigation key (j or Down arrow).
pub fn is_down(key: &KeyEvent) -> bool {
    is_char(key, 'j') || key.code == KeyCode::Down
}

/// Check if the key event is the up navigation key (k or Up arrow).
pub fn is_up(key: &KeyEvent) -> bool {
    is_char(key, 'k') || key.code == KeyCode::Up
}

/// Collapse, or go to parent (h or Left arrow).
pub fn is_left(key: &KeyEvent) -> bool {
    is_char(key, 'h') || key.code == KeyCode::Left
}

/// Expand (l or Right arrow).
pub fn is_right(key: &KeyEvent) -> bool {
    is_char(key, 'l') || key.code == KeyCode::Right
}

/// Check if the key event is the Enter key.
pub fn is_enter(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Enter,
            ..
        }
    )
}

pub fn is_escape(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
}

pub fn is_backspace(key: &KeyEvent) -> bool {
    key.code == KeyCode::Backspace
}

/// Toggle the selection affordance (Space).
pub fn is_space(key: &KeyEvent) -> bool {
    is_char(key, ' ')
}

/// Start editing the label (e or i).
pub fn is_edit(key: &KeyEvent) -> bool {
    is_char(key, 'e') || is_char(key, 'i')
}

/// Open the more-actions menu (m or .).
pub fn is_menu(key: &KeyEvent) -> bool {
    is_char(key, 'm') || is_char(key, '.')
}

/// Move the node down among its siblings (J).
pub fn is_move_down(key: &KeyEvent) -> bool {
    is_char(key, 'J')
}

/// Move the node up among its siblings (K).
pub fn is_move_up(key: &KeyEvent) -> bool {
    is_char(key, 'K')
}

/// Save the focused outline (w or Ctrl+S).
pub fn is_save(key: &KeyEvent) -> bool {
    is_char(key, 'w')
        || matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('s'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
}

/// The character typed, for text input. Control chords yield `None`.
pub fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Check if the mouse event is a left button press.
pub fn is_left_click(mouse: &MouseEvent) -> bool {
    mouse.kind == MouseEventKind::Down(MouseButton::Left)
}

/// Check if the mouse event is any button press.
pub fn is_mousedown(mouse: &MouseEvent) -> bool {
    matches!(mouse.kind, MouseEventKind::Down(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: event::KeyEventState::NONE,
        }
    }

    fn make_mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_is_quit_q() {
        let key = make_key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(is_quit(&key));
    }

    #[test]
    fn test_is_quit_ctrl_c() {
        let key = make_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_quit(&key));
        assert!(is_ctrl_c(&key));
    }

    #[test]
    fn test_is_quit_other() {
        let key = make_key(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(!is_quit(&key));
    }

    #[test]
    fn test_is_tab() {
        let key = make_key(KeyCode::Tab, KeyModifiers::NONE);
        assert!(is_tab(&key));
    }

    #[test]
    fn test_vim_and_arrow_navigation() {
        assert!(is_down(&make_key(KeyCode::Char('j'), KeyModifiers::NONE)));
        assert!(is_down(&make_key(KeyCode::Down, KeyModifiers::NONE)));
        assert!(is_up(&make_key(KeyCode::Char('k'), KeyModifiers::NONE)));
        assert!(is_up(&make_key(KeyCode::Up, KeyModifiers::NONE)));
        assert!(is_left(&make_key(KeyCode::Char('h'), KeyModifiers::NONE)));
        assert!(is_left(&make_key(KeyCode::Left, KeyModifiers::NONE)));
        assert!(is_right(&make_key(KeyCode::Char('l'), KeyModifiers::NONE)));
        assert!(is_right(&make_key(KeyCode::Right, KeyModifiers::NONE)));
    }

    #[test]
    fn test_is_left_with_control_is_false() {
        let key = make_key(KeyCode::Char('h'), KeyModifiers::CONTROL);
        assert!(!is_left(&key));
    }

    #[test]
    fn test_shifted_moves() {
        assert!(is_move_down(&make_key(KeyCode::Char('J'), KeyModifiers::SHIFT)));
        assert!(is_move_up(&make_key(KeyCode::Char('K'), KeyModifiers::SHIFT)));
        assert!(!is_move_down(&make_key(KeyCode::Char('j'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_is_save() {
        assert!(is_save(&make_key(KeyCode::Char('w'), KeyModifiers::NONE)));
        assert!(is_save(&make_key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!is_save(&make_key(KeyCode::Char('s'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_typed_char() {
        assert_eq!(
            typed_char(&make_key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some('A')
        );
        assert_eq!(
            typed_char(&make_key(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(typed_char(&make_key(KeyCode::Enter, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_mouse_predicates() {
        let click = make_mouse(MouseEventKind::Down(MouseButton::Left));
        assert!(is_left_click(&click));
        assert!(is_mousedown(&click));

        let right = make_mouse(MouseEventKind::Down(MouseButton::Right));
        assert!(!is_left_click(&right));
        assert!(is_mousedown(&right));

        assert!(!is_mousedown(&make_mouse(MouseEventKind::Moved)));
    }
}
