//! Configurable keyboard mapping system
//!
//! This module provides a data-driven keybinding system that:
//! - Encodes host key events into canonical keystroke strings
//! - Parses Vim-style binding specs (`gg`, `<C-d>`, `<S-tab>`)
//! - Maps key sequences to commands, scoped by editing mode
//! - Enables user customization via layered YAML files
//!
//! # Architecture
//!
//! ```text
//! (characters, modifierFlags) → Keystroke → canonical string → BindingTable::lookup() → BindingTarget
//! ```
//!
//! # Loading Keymaps
//!
//! ```ignore
//! // Embedded defaults only
//! let table = default_keymap();
//!
//! // Defaults + ./keymap.yaml + user keymap + an explicit file
//! let loaded = load_default_keymap(Some(Path::new("my-keys.yaml")));
//! ```

mod binding;
mod config;
mod defaults;
mod mode;
mod parse;
mod table;
mod types;

pub use binding::{BindingTarget, Keybinding, Procedure};
pub use config::{apply_config, load_keymap_file, parse_keymap_yaml, CommandList, KeymapConfig};
pub use defaults::{
    default_keymap, fallback_keymap, get_default_keymap_yaml, keymap_layer_paths,
    load_default_keymap, load_layered_keymap, LayeredKeymap,
};
pub use mode::Mode;
pub use parse::{join_canonical, parse_sequence_spec, parse_spec};
pub use table::{BindingTable, KeymapBuilder};
pub use types::{host_flags, KeyCode, Keystroke, Modifiers};
