//! Line-delimited JSON wire protocol with the host editor
//!
//! ```text
//! host → core   {"characters":"j","modifierFlags":0,"line":3,"column":7,...}
//! core → host   {"send":"getClipboardContents"}          (mid-command, optional)
//! host → core   {"clipboardContents":"foo\n"}
//! core → host   ["moveDown:","suppressKeystroke"]
//! ```
//!
//! stdout belongs to this protocol; nothing else may write to it.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::commands::Action;
use crate::error::{HostError, ProtocolError};
use crate::host::Host;
use crate::keymap::{BindingTable, Keystroke};

/// One key press as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyEvent {
    /// Text the key produced, absent for a bare modifier press
    pub characters: Option<String>,
    pub modifier_flags: u32,
    /// Cursor position when the key was pressed, zero-based
    pub line: usize,
    pub column: usize,
    /// Scroll offset when the key was pressed
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Selection state if the host sent it; otherwise handlers ask
    pub has_selection: Option<bool>,
}

impl KeyEvent {
    /// An event for typed text with the given host modifier flags
    pub fn typed(characters: &str, modifier_flags: u32) -> Self {
        Self {
            characters: Some(characters.to_string()),
            modifier_flags,
            ..Self::default()
        }
    }

    /// Decode into a canonical keystroke
    ///
    /// Keys that produce more than one character (dead-key compositions,
    /// IME commits) have no keystroke form.
    pub fn keystroke(&self) -> Result<Keystroke, ProtocolError> {
        let character = match self.characters.as_deref() {
            None | Some("") => None,
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(ProtocolError::Malformed(format!(
                            "expected a single character, got {:?}",
                            s
                        )))
                    }
                }
            }
        };
        Ok(Keystroke::decode(character, self.modifier_flags))
    }
}

/// Out-of-band requests from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMessage {
    /// Reply with every bound keystroke so the host can release menu shortcuts
    GetKeybindings,
    /// Rebuild the keymap from its files
    ReloadKeymap,
}

impl HostMessage {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "getKeybindings" => Some(HostMessage::GetKeybindings),
            "reloadKeymap" => Some(HostMessage::ReloadKeymap),
            _ => None,
        }
    }
}

/// A parsed inbound line
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Key(KeyEvent),
    Message(HostMessage),
}

pub fn parse_inbound(line: &str) -> Result<Inbound, ProtocolError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    if let Some(message) = value.get("message") {
        let name = message.as_str().ok_or_else(|| {
            ProtocolError::Malformed(format!("message is not a string: {}", message))
        })?;
        return HostMessage::from_name(name)
            .map(Inbound::Message)
            .ok_or_else(|| ProtocolError::UnknownMessage(name.to_string()));
    }

    serde_json::from_value(value)
        .map(Inbound::Key)
        .map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// The `getKeybindings` reply: `[[displayKey, modifierFlags], ...]`
pub fn keybindings_reply(table: &BindingTable) -> Value {
    Value::Array(
        table
            .key_equivalents()
            .into_iter()
            .map(|(key, flags)| json!([key, flags]))
            .collect(),
    )
}

/// Outcome of a `reloadKeymap` request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReloadStatus {
    Ok,
    Error { message: String },
}

/// Line-framed JSON over a reader/writer pair (stdin/stdout in production)
pub struct Transport<R, W> {
    reader: R,
    writer: W,
    buf: String,
}

impl<R: BufRead, W: Write> Transport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            buf: String::new(),
        }
    }

    /// Next non-blank line, or `None` at end of input
    pub fn read_line(&mut self) -> io::Result<Option<&str>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            if !self.buf.trim().is_empty() {
                return Ok(Some(self.buf.trim()));
            }
        }
    }

    /// Write one value as a single line and flush
    pub fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Host for Transport<R, W> {
    fn send(&mut self, action: &Action) -> Result<Value, HostError> {
        self.write_json(&json!({ "send": action }))?;
        let line = self.read_line()?.ok_or(HostError::Disconnected)?;
        let reply: Value =
            serde_json::from_str(line).map_err(|e| HostError::MalformedReply(e.to_string()))?;
        if !reply.is_object() {
            return Err(HostError::MalformedReply(format!(
                "expected an object, got {}",
                reply
            )));
        }
        tracing::trace!(selector = %action.selector, %reply, "host reply");
        Ok(reply)
    }
}
