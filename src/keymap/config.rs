//! YAML configuration parsing for keymaps
//!
//! A keymap file has a top-level `map` (command mode) and a list of
//! `modes` blocks, each binding its own `map` in one or more other modes:
//!
//! ```yaml
//! map:
//!   h: move_backward
//!   dd: [move_to_beginning_of_line, cut_line]
//! modes:
//!   - modes: [insert, visual]
//!     map:
//!       "<esc>": enter_command_mode
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::commands::Command;
use crate::error::KeymapError;

use super::mode::Mode;
use super::table::{BindingTable, KeymapBuilder};

/// Root structure of a keymap YAML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapConfig {
    /// Bindings registered in command mode
    #[serde(default)]
    pub map: BTreeMap<String, CommandList>,
    #[serde(default)]
    pub modes: Vec<ModeBlock>,
}

/// A `modes:` entry: bindings scoped to the listed modes
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeBlock {
    pub modes: Vec<String>,
    #[serde(default)]
    pub map: BTreeMap<String, CommandList>,
}

/// One command name or a list of them
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CommandList {
    One(String),
    Many(Vec<String>),
}

impl CommandList {
    fn names(&self) -> &[String] {
        match self {
            CommandList::One(name) => std::slice::from_ref(name),
            CommandList::Many(names) => names,
        }
    }

    fn resolve(&self) -> Result<Vec<Command>, KeymapError> {
        self.names().iter().map(|name| parse_command(name)).collect()
    }
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<BindingTable, KeymapError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| KeymapError::Io(format!("{}: {}", path.display(), e)))?;

    parse_keymap_yaml(&content)
}

/// Parse keybindings from YAML string
///
/// Either every binding in the document is accepted or none is.
pub fn parse_keymap_yaml(yaml: &str) -> Result<BindingTable, KeymapError> {
    // An empty document is a valid, empty keymap
    if yaml.trim().is_empty() {
        return Ok(BindingTable::new());
    }

    let config: KeymapConfig =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::Parse(e.to_string()))?;

    let mut builder = KeymapBuilder::new();
    apply_config(&mut builder, &config)?;
    Ok(builder.build())
}

/// Register everything in `config` through `builder`
pub fn apply_config(builder: &mut KeymapBuilder, config: &KeymapConfig) -> Result<(), KeymapError> {
    register_map(builder, &config.map)?;

    for block in &config.modes {
        let modes = block
            .modes
            .iter()
            .map(|name| parse_mode(name))
            .collect::<Result<Vec<_>, _>>()?;
        builder.mode(&modes, |b| register_map(b, &block.map))?;
    }
    Ok(())
}

fn register_map(
    builder: &mut KeymapBuilder,
    map: &BTreeMap<String, CommandList>,
) -> Result<(), KeymapError> {
    for (spec, commands) in map {
        builder.map(spec, commands.resolve()?)?;
    }
    Ok(())
}

/// Parse a command name string into a Command enum
fn parse_command(name: &str) -> Result<Command, KeymapError> {
    Command::from_str(name.trim()).map_err(|()| KeymapError::UnknownCommand(name.to_string()))
}

fn parse_mode(name: &str) -> Result<Mode, KeymapError> {
    Mode::from_str(name).map_err(KeymapError::UnknownMode)
}
