//! Crossterm event decoding.
//!
//! Maps raw terminal events to the editor's [`Key`] values. Key-sequence
//! details (escape sequences, modifier reporting) stay behind crossterm;
//! the core only ever sees decoded keys.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers};

use crate::core::app::Key;

/// Editor events delivered to the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(Key),
    Resize(u16, u16),
}

/// Wait up to `timeout` for the next event; `None` on timeout.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>, Box<dyn std::error::Error>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    match event::read()? {
        CtEvent::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            Ok(decode_key(key.code, key.modifiers).map(Event::Key))
        }
        CtEvent::Resize(cols, rows) => Ok(Some(Event::Resize(cols, rows))),
        _ => Ok(None),
    }
}

fn decode_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Ctrl(c.to_ascii_lowercase())
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(key)
}
