//! vimbridge - Vim-style keystroke interpretation for a host text editor
//!
//! The host forwards each key event; the core answers with the editor
//! actions to perform and whether to swallow the key. Mode, pending keys,
//! and undo bookkeeping live here; the text lives in the host.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod keymap;
pub mod protocol;
pub mod session;
pub mod tracing;
pub mod undo;

// Re-export commonly used types
pub use commands::{Action, Command, KeyResponse};
pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, KeyAction};
pub use keymap::{BindingTable, Keystroke, Mode};
pub use protocol::KeyEvent;
pub use session::Session;
