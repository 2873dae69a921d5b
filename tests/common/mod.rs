//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::collections::VecDeque;

use serde_json::{json, Value};

use vimbridge::error::HostError;
use vimbridge::host::Host;
use vimbridge::keymap::{default_keymap, host_flags};
use vimbridge::{Action, Dispatcher, KeyEvent, KeyResponse};

/// Host stand-in with scripted editor state
///
/// Queries are answered from the fields; every other action sent mid-command
/// is recorded in `performed`.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    pub has_selection: bool,
    /// Successive `getSelectedText` answers; the last one repeats
    pub selected_text: VecDeque<String>,
    pub clipboard: String,
    pub performed: Vec<Action>,
    pub queries: Vec<String>,
}

impl ScriptedHost {
    pub fn with_clipboard(clipboard: &str) -> Self {
        Self {
            clipboard: clipboard.to_string(),
            ..Self::default()
        }
    }
}

impl Host for ScriptedHost {
    fn send(&mut self, action: &Action) -> Result<Value, HostError> {
        let reply = match action.selector.as_str() {
            "hasSelection" => json!({ "hasSelection": self.has_selection }),
            "getClipboardContents" => json!({ "clipboardContents": self.clipboard }),
            "getSelectedText" => {
                let text = if self.selected_text.len() > 1 {
                    self.selected_text.pop_front().unwrap_or_default()
                } else {
                    self.selected_text.front().cloned().unwrap_or_default()
                };
                json!({ "selectedText": text })
            }
            _ => {
                self.performed.push(action.clone());
                return Ok(json!({}));
            }
        };
        self.queries.push(action.selector.clone());
        Ok(reply)
    }
}

/// Dispatcher over the shipped default keymap
pub fn default_dispatcher() -> Dispatcher {
    Dispatcher::with_keymap(default_keymap())
}

/// A plain key event at the document start, with no selection
pub fn key(characters: &str) -> KeyEvent {
    KeyEvent {
        has_selection: Some(false),
        ..KeyEvent::typed(characters, 0)
    }
}

/// Ctrl + letter, as the host delivers it (a control character)
pub fn ctrl(letter: char) -> KeyEvent {
    let code = (letter as u8 - b'a' + 1) as char;
    KeyEvent {
        has_selection: Some(false),
        ..KeyEvent::typed(&code.to_string(), host_flags::CONTROL)
    }
}

/// Shifted letter, as the host delivers it
pub fn shifted(letter: char) -> KeyEvent {
    KeyEvent {
        has_selection: Some(false),
        ..KeyEvent::typed(&letter.to_ascii_uppercase().to_string(), host_flags::SHIFT)
    }
}

/// Feed each character of `keys` as its own event; returns every response
pub fn type_keys(d: &mut Dispatcher, host: &mut ScriptedHost, keys: &str) -> Vec<KeyResponse> {
    keys.chars()
        .map(|c| {
            let event = if c.is_ascii_uppercase() {
                shifted(c)
            } else {
                key(&c.to_string())
            };
            d.handle_key(&event, host).expect("host round trip")
        })
        .collect()
}

/// Selectors of a response, for compact assertions
pub fn selectors(response: &KeyResponse) -> Vec<&str> {
    response.selectors()
}
