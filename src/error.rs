//! Error types for the keystroke interpreter
//!
//! Each layer gets its own enum so callers can tell a bad keymap apart from a
//! lost host connection without string matching.

use thiserror::Error;

/// Errors raised while building a keymap (spec parsing, config files)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeymapError {
    #[error("Invalid binding spec {spec:?}: {reason}")]
    InvalidBindingSpec { spec: String, reason: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("No config directory available")]
    NoConfigDir,
}

impl KeymapError {
    pub(crate) fn invalid_spec(spec: &str, reason: impl Into<String>) -> Self {
        KeymapError::InvalidBindingSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures of the synchronous round trip to the host editor
#[derive(Error, Debug)]
pub enum HostError {
    /// The host went away while a reply was pending. Fatal for the session.
    #[error("Host closed the connection while a reply was pending")]
    Disconnected,

    #[error("Malformed reply from host: {0}")]
    MalformedReply(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors a command handler can produce
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("Command failed: {0}")]
    Failed(String),
}

/// Errors surfaced by `Dispatcher::handle_key`
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The host connection is unusable; the session must end
    #[error("Protocol failure: {0}")]
    Host(#[from] HostError),
}

/// Errors decoding an inbound wire message
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Unknown message: {0}")]
    UnknownMessage(String),
}

/// Errors loading `config.yaml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("No config directory available")]
    NoConfigDir,
}
