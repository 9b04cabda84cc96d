use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::error::Result;

/// Blocking key reader with a poll timeout.
#[derive(Debug, Default)]
pub struct EventReader;

impl EventReader {
    pub fn new() -> Self {
        Self
    }

    /// `None` when the timeout passes or the event is not a key press.
    pub fn read_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}
