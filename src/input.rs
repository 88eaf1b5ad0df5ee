//! Terminal key handling
//!
//! Turns crossterm key events into engine events. Piece controls are passed
//! through as raw characters; the engine decides which ones mean anything.

use crate::game::Event;
use crate::settings::KeySettings;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the main loop should do with a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Feed this event to the engine
    Game(Event),
    Quit,
}

/// Key bindings for the app-level commands
#[derive(Debug, Clone)]
pub struct InputHandler {
    quit: char,
    new_game: char,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::from_settings(&KeySettings::default())
    }
}

impl InputHandler {
    pub fn from_settings(keys: &KeySettings) -> Self {
        Self {
            quit: keys.quit.to_ascii_lowercase(),
            new_game: keys.new_game.to_ascii_lowercase(),
        }
    }

    /// Translate one key event; releases and non-character keys yield None
    pub fn translate(&self, key: KeyEvent) -> Option<Input> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Input::Quit);
        }

        match key.code {
            KeyCode::Esc => Some(Input::Quit),
            KeyCode::Char(c) => {
                let c = c.to_ascii_lowercase();
                if c == self.quit {
                    Some(Input::Quit)
                } else if c == self.new_game {
                    Some(Input::Game(Event::NewGame))
                } else {
                    Some(Input::Game(Event::Key(c)))
                }
            }
            _ => None,
        }
    }
}
