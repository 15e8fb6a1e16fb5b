//! Terminal input source (crossterm events)

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use glam::Vec2;

use super::{InputEvent, InputSource, Key, PlatformError, Viewport};

pub struct TerminalInput {
    world: Vec2,
}

impl TerminalInput {
    /// `world` is the logical screen size clicks are mapped into
    pub fn new(world: Vec2) -> Self {
        Self { world }
    }
}

impl InputSource for TerminalInput {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>, PlatformError> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => events.extend(map_key(key)),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let viewport = Viewport::current(self.world)?;
                    events.push(InputEvent::MouseDown(
                        viewport.cell_to_world(mouse.column, mouse.row),
                    ));
                }
                Event::Resize(cols, rows) => log::debug!("Terminal resized to {}x{}", cols, rows),
                _ => {}
            }
        }
        Ok(events)
    }
}

/// Translate a key event; releases, repeats and unbound keys yield `None`
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c' | 'C')).then_some(InputEvent::Quit);
    }

    let key = match key.code {
        KeyCode::Esc | KeyCode::Char('q' | 'Q') => return Some(InputEvent::Quit),
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Up,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(InputEvent::KeyDown(key))
}
