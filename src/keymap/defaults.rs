//! Default keybindings and keymap layering
//!
//! The shipped keymap lives in `keymap.yaml` at the crate root and is
//! compiled in. If it ever fails to parse, a small hardcoded table keeps the
//! modal basics working.

use std::path::{Path, PathBuf};

use crate::commands::Command;
use crate::error::KeymapError;

use super::config::{load_keymap_file, parse_keymap_yaml};
use super::mode::Mode;
use super::table::{BindingTable, KeymapBuilder};

/// Default keymap YAML embedded at compile time
const DEFAULT_KEYMAP_YAML: &str = include_str!("../../keymap.yaml");

/// Get the embedded default keymap YAML
pub fn get_default_keymap_yaml() -> &'static str {
    DEFAULT_KEYMAP_YAML
}

/// The embedded default keymap
pub fn default_keymap() -> BindingTable {
    match parse_keymap_yaml(DEFAULT_KEYMAP_YAML) {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(
                "Failed to parse embedded keymap: {}, using hardcoded defaults",
                e
            );
            fallback_keymap()
        }
    }
}

/// Minimal bindings: movement, insert, and the way back out of insert
pub fn fallback_keymap() -> BindingTable {
    let mut builder = KeymapBuilder::new();
    let result = (|| -> Result<(), KeymapError> {
        builder
            .map("h", Command::MoveBackward)?
            .map("l", Command::MoveForward)?
            .map("j", Command::MoveDown)?
            .map("k", Command::MoveUp)?
            .map("i", Command::InsertBackward)?
            .map("a", Command::InsertForward)?
            .map("x", Command::CutForward)?
            .map("u", Command::Undo)?;
        builder.mode(&[Mode::Insert, Mode::Visual], |b| {
            b.map("<esc>", Command::EnterCommandMode)?;
            Ok(())
        })?;
        Ok(())
    })();
    if let Err(e) = result {
        tracing::error!("Hardcoded keymap rejected: {}", e);
    }
    builder.build()
}

/// Keymap files layered over the embedded defaults, lowest priority first
///
/// 1. keymap.yaml in the current directory
/// 2. User config at ~/.config/vimbridge/keymap.yaml
/// 3. An explicit path (`--keymap`)
pub fn keymap_layer_paths(extra: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("keymap.yaml")];
    paths.extend(crate::config_paths::keymap_file());
    paths.extend(extra.map(Path::to_path_buf));
    paths
}

/// Result of loading every keymap layer
#[derive(Debug)]
pub struct LayeredKeymap {
    pub table: BindingTable,
    /// Layers that were rejected; the layers before them stay in effect
    pub errors: Vec<(PathBuf, KeymapError)>,
}

impl LayeredKeymap {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Load and merge keymaps: defaults + overrides
///
/// Missing optional files are skipped. The `required` path, if any, must
/// exist. A layer that fails to load is dropped whole and reported.
pub fn load_layered_keymap(layers: &[PathBuf], required: Option<&Path>) -> LayeredKeymap {
    let mut table = default_keymap();
    tracing::info!("Loaded default keymap ({} bindings)", table.len());

    let mut errors = Vec::new();
    for path in layers {
        let is_required = required.is_some_and(|r| r == path.as_path());
        if !is_required && !path.exists() {
            continue;
        }
        match load_keymap_file(path) {
            Ok(layer) => {
                tracing::info!(
                    "Merging keymap from {} ({} bindings)",
                    path.display(),
                    layer.len()
                );
                table.merge(layer);
            }
            Err(e) => {
                tracing::warn!("Failed to load keymap from {}: {}", path.display(), e);
                errors.push((path.clone(), e));
            }
        }
    }

    LayeredKeymap { table, errors }
}

/// Load the standard layers plus an optional explicit keymap file
pub fn load_default_keymap(extra: Option<&Path>) -> LayeredKeymap {
    load_layered_keymap(&keymap_layer_paths(extra), extra)
}
