//! Editing modes that bindings are scoped to

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An editing mode
///
/// The set is open: keymaps may define their own modes, which only become
/// reachable through procedures that switch to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Mode {
    Insert,
    #[default]
    Command,
    Visual,
    Custom(String),
}

impl Mode {
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Insert => "insert",
            Mode::Command => "command",
            Mode::Visual => "visual",
            Mode::Custom(name) => name,
        }
    }

    /// Whether a leading count (`3j`) is recognized in this mode
    ///
    /// Digits typed in insert mode are text.
    pub fn accepts_count(&self) -> bool {
        !matches!(self, Mode::Insert)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "insert" => Ok(Mode::Insert),
            "command" | "normal" => Ok(Mode::Command),
            "visual" => Ok(Mode::Visual),
            "" => Err(s.to_string()),
            _ if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') => {
                Ok(Mode::Custom(name))
            }
            _ => Err(s.to_string()),
        }
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

impl TryFrom<String> for Mode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|bad| format!("invalid mode name {:?}", bad))
    }
}
