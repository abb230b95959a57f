use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::controller::Intent;
use crate::game::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Intent(Intent),
    Restart,
    Quit,
    None,
}

/// Maps terminal events onto input actions.
///
/// Mouse press and release stand in for a touch swipe.
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_event(&self, event: &Event) -> InputAction {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(*key),
            Event::Mouse(mouse) => self.handle_mouse_event(*mouse),
            _ => InputAction::None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        let turn = |direction| InputAction::Intent(Intent::Turn(direction));

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => turn(Direction::Up),
            KeyCode::Down => turn(Direction::Down),
            KeyCode::Left => turn(Direction::Left),
            KeyCode::Right => turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => turn(Direction::Right),

            // Controls
            KeyCode::Char(' ') => InputAction::Intent(Intent::StartOrPause),
            KeyCode::Enter => InputAction::Intent(Intent::Start),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => InputAction::Restart,

            _ => InputAction::None,
        }
    }

    pub fn handle_mouse_event(&self, mouse: MouseEvent) -> InputAction {
        let x = i32::from(mouse.column);
        let y = i32::from(mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                InputAction::Intent(Intent::SwipeBegin { x, y })
            }
            MouseEventKind::Up(MouseButton::Left) => InputAction::Intent(Intent::SwipeEnd { x, y }),
            _ => InputAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            InputAction::Intent(Intent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            InputAction::Intent(Intent::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            InputAction::Intent(Intent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            InputAction::Intent(Intent::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            InputAction::Intent(Intent::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            InputAction::Intent(Intent::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('s'))),
            InputAction::Intent(Intent::Turn(Direction::Down))
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(d_upper),
            InputAction::Intent(Intent::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_space_and_enter() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char(' '))),
            InputAction::Intent(Intent::StartOrPause)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Enter)),
            InputAction::Intent(Intent::Start)
        );
    }

    #[test]
    fn test_quit_and_restart_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), InputAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), InputAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('r'))), InputAction::Restart);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), InputAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), InputAction::None);
    }

    #[test]
    fn test_key_release_ignored() {
        let handler = InputHandler::new();
        let mut release = press(KeyCode::Up);
        release.kind = KeyEventKind::Release;
        assert_eq!(handler.handle_event(&Event::Key(release)), InputAction::None);
    }

    #[test]
    fn test_mouse_drag_is_a_swipe() {
        let handler = InputHandler::new();

        let down = Event::Mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 4));
        assert_eq!(
            handler.handle_event(&down),
            InputAction::Intent(Intent::SwipeBegin { x: 10, y: 4 })
        );

        let up = Event::Mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 5));
        assert_eq!(
            handler.handle_event(&up),
            InputAction::Intent(Intent::SwipeEnd { x: 30, y: 5 })
        );

        let moved = Event::Mouse(mouse(MouseEventKind::Moved, 1, 1));
        assert_eq!(handler.handle_event(&moved), InputAction::None);
    }
}
