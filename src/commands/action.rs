//! Action tokens sent to the host, and the reply to one key event

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One opaque editor action for the host to perform
///
/// Serialized as a bare selector string when it has no arguments
/// (`"moveForward:"`), otherwise as a single-entry object
/// (`{"enterMode:": ["insert"]}`).
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub selector: String,
    pub args: Vec<Value>,
}

impl Action {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(selector: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            selector: selector.into(),
            args,
        }
    }

    /// `n` copies of this action
    pub fn times(self, n: u32) -> Vec<Action> {
        vec![self; n as usize]
    }
}

impl From<&str> for Action {
    fn from(selector: &str) -> Self {
        Action::new(selector)
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.args.is_empty() {
            return serializer.serialize_str(&self.selector);
        }
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.selector, &self.args)?;
        map.end()
    }
}

/// What the host should do with the raw keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Swallow the key; the host editor never sees it
    Suppress,
    /// Let the key reach the host editor unmodified
    PassThrough,
}

impl Disposition {
    pub fn token(self) -> &'static str {
        match self {
            Disposition::Suppress => "suppressKeystroke",
            Disposition::PassThrough => "passThroughKeystroke",
        }
    }
}

/// Ordered actions terminated by exactly one disposition
#[derive(Debug, Clone, PartialEq)]
pub struct KeyResponse {
    pub actions: Vec<Action>,
    pub disposition: Disposition,
}

impl KeyResponse {
    pub fn suppress(actions: Vec<Action>) -> Self {
        Self {
            actions,
            disposition: Disposition::Suppress,
        }
    }

    pub fn pass_through() -> Self {
        Self {
            actions: Vec::new(),
            disposition: Disposition::PassThrough,
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.disposition == Disposition::Suppress
    }

    /// Selectors of the actions, for compact assertions and logging
    pub fn selectors(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.selector.as_str()).collect()
    }
}

impl Serialize for KeyResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.actions.len() + 1))?;
        for action in &self.actions {
            seq.serialize_element(action)?;
        }
        seq.serialize_element(self.disposition.token())?;
        seq.end()
    }
}
