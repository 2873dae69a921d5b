//! Mode-scoped binding table and the registration API used by keymap loaders

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use crate::error::KeymapError;

use super::binding::{BindingTarget, Keybinding};
use super::mode::Mode;
use super::parse::parse_sequence_spec;

/// Bindings keyed by `(mode, canonical sequence string)`
///
/// Built once at load time and shared read-only by dispatchers. Sequences
/// are kept ordered so prefix queries are a range scan.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    modes: HashMap<Mode, BTreeMap<String, Keybinding>>,
    /// Length in keystrokes of the longest sequence in any mode
    longest: usize,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `spec` and bind it in every mode of `modes`, overwriting any
    /// existing entry for the same `(mode, sequence)`
    pub fn register(
        &mut self,
        modes: &[Mode],
        spec: &str,
        target: impl Into<BindingTarget>,
    ) -> Result<(), KeymapError> {
        let keystrokes = parse_sequence_spec(spec)?;
        let target = target.into();
        for mode in modes {
            self.insert(Keybinding::new(
                mode.clone(),
                keystrokes.clone(),
                target.clone(),
            ));
        }
        Ok(())
    }

    /// Add a binding to the table
    pub fn insert(&mut self, binding: Keybinding) {
        if binding.keystrokes.is_empty() {
            return;
        }
        self.longest = self.longest.max(binding.keystrokes.len());
        self.modes
            .entry(binding.mode.clone())
            .or_default()
            .insert(binding.canonical(), binding);
    }

    /// Layer `other` on top of this table; its entries win
    pub fn merge(&mut self, other: BindingTable) {
        for binding in other.modes.into_values().flat_map(BTreeMap::into_values) {
            self.insert(binding);
        }
    }

    pub fn lookup(&self, mode: &Mode, canonical: &str) -> Option<&BindingTarget> {
        self.modes
            .get(mode)?
            .get(canonical)
            .map(|binding| &binding.target)
    }

    /// True if some sequence in `mode` starts with `canonical` and is
    /// strictly longer than it. An exact match alone does not count.
    pub fn has_prefix(&self, mode: &Mode, canonical: &str) -> bool {
        let Some(sequences) = self.modes.get(mode) else {
            return false;
        };
        sequences
            .range::<str, _>((Bound::Included(canonical), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(canonical))
            .any(|(key, _)| key.len() > canonical.len())
    }

    pub fn longest_sequence(&self) -> usize {
        self.longest
    }

    /// Every binding, grouped by mode
    pub fn bindings(&self) -> impl Iterator<Item = &Keybinding> {
        self.modes.values().flat_map(BTreeMap::values)
    }

    pub fn bindings_for(&self, mode: &Mode) -> impl Iterator<Item = &Keybinding> {
        self.modes.get(mode).into_iter().flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.modes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every keystroke used by any binding, as `(display key, host flags)`
    /// with shift folded into the key
    ///
    /// The host uses this list to disable menu shortcuts that would
    /// otherwise steal these keys.
    pub fn key_equivalents(&self) -> Vec<(String, u32)> {
        self.bindings()
            .flat_map(|binding| binding.keystrokes.iter())
            .map(|k| (k.display_key(), k.to_modifier_bitmask(false)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Registration entry points handed to keymap configuration
///
/// `map` binds in the current modes (command mode unless inside `mode`);
/// `mode` scopes nested registrations to other modes.
#[derive(Debug)]
pub struct KeymapBuilder {
    table: BindingTable,
    modes: Vec<Mode>,
}

impl KeymapBuilder {
    pub fn new() -> Self {
        Self::from_table(BindingTable::new())
    }

    /// Continue registering on top of an existing table
    pub fn from_table(table: BindingTable) -> Self {
        Self {
            table,
            modes: vec![Mode::Command],
        }
    }

    pub fn map(
        &mut self,
        spec: &str,
        target: impl Into<BindingTarget>,
    ) -> Result<&mut Self, KeymapError> {
        self.table.register(&self.modes, spec, target)?;
        Ok(self)
    }

    pub fn register(
        &mut self,
        modes: &[Mode],
        spec: &str,
        target: impl Into<BindingTarget>,
    ) -> Result<&mut Self, KeymapError> {
        self.table.register(modes, spec, target)?;
        Ok(self)
    }

    /// Run `f` with `modes` as the current modes, then restore the old ones
    pub fn mode<F>(&mut self, modes: &[Mode], f: F) -> Result<&mut Self, KeymapError>
    where
        F: FnOnce(&mut Self) -> Result<(), KeymapError>,
    {
        let previous = std::mem::replace(&mut self.modes, modes.to_vec());
        let result = f(self);
        self.modes = previous;
        result.map(|()| self)
    }

    pub fn build(self) -> BindingTable {
        self.table
    }
}

impl Default for KeymapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
