//! Dispatcher settings
//!
//! Stored in `~/.config/vimbridge/config.yaml`. Every field is optional.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::commands::Command;
use crate::error::ConfigError;
use crate::undo::DEFAULT_UNDO_DEPTH;

/// Hard ceiling on `max_repeat`; every counted command emits one action per
/// repeat, so this bounds the size of a single reply
pub const MAX_REPEAT_LIMIT: u32 = 9999;

/// Tunables for the dispatcher and undo bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Cursor snapshots kept for undo
    pub undo_depth: usize,
    /// Ceiling applied to a typed repeat count
    pub max_repeat: u32,
    /// Ceiling on the pending key queue, counts included
    pub max_queue_len: usize,
    /// Commands that get an undo snapshot before they run
    pub mutating_commands: BTreeSet<Command>,
}

fn default_mutating_commands() -> BTreeSet<Command> {
    BTreeSet::from([
        Command::CutBackward,
        Command::CutForward,
        Command::CutWordForward,
        Command::CutWordBackward,
        Command::CutLine,
        Command::CutToBeginningOfLine,
        Command::CutToEndOfLine,
        Command::PasteBefore,
        Command::PasteAfter,
        Command::InsertNewlineAbove,
        Command::InsertNewlineBelow,
    ])
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            undo_depth: DEFAULT_UNDO_DEPTH,
            max_repeat: 999,
            max_queue_len: 32,
            mutating_commands: default_mutating_commands(),
        }
    }
}

impl DispatcherConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load a specific config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_repeat == 0 || self.max_repeat > MAX_REPEAT_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_repeat must be between 1 and {}, got {}",
                MAX_REPEAT_LIMIT, self.max_repeat
            )));
        }
        Ok(())
    }

    /// The effective repeat ceiling, even for a config built in code
    pub fn repeat_ceiling(&self) -> u32 {
        self.max_repeat.clamp(1, MAX_REPEAT_LIMIT)
    }

    pub fn is_mutating(&self, command: Command) -> bool {
        self.mutating_commands.contains(&command)
    }
}
