//! Keybinding struct representing a mapping from a key sequence to commands

use std::fmt;
use std::sync::Arc;

use crate::commands::{Action, Command, CommandContext};
use crate::error::CommandError;

use super::mode::Mode;
use super::parse::join_canonical;
use super::types::Keystroke;

type ProcedureFn =
    dyn Fn(&mut CommandContext<'_>) -> Result<Vec<Action>, CommandError> + Send + Sync;

/// An ad-hoc handler bound in place of a command list
#[derive(Clone)]
pub struct Procedure {
    name: String,
    f: Arc<ProcedureFn>,
}

impl Procedure {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>) -> Result<Vec<Action>, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, ctx: &mut CommandContext<'_>) -> Result<Vec<Action>, CommandError> {
        (self.f)(ctx)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Procedure").field(&self.name).finish()
    }
}

/// What a key sequence triggers
#[derive(Debug, Clone)]
pub enum BindingTarget {
    /// Commands run in order, their actions concatenated
    Commands(Vec<Command>),
    Procedure(Procedure),
}

impl BindingTarget {
    /// The bound command list, if this is not a procedure
    pub fn commands(&self) -> Option<&[Command]> {
        match self {
            BindingTarget::Commands(commands) => Some(commands),
            BindingTarget::Procedure(_) => None,
        }
    }

    /// An empty command list binds nothing
    pub fn is_empty(&self) -> bool {
        matches!(self, BindingTarget::Commands(commands) if commands.is_empty())
    }
}

impl From<Command> for BindingTarget {
    fn from(command: Command) -> Self {
        BindingTarget::Commands(vec![command])
    }
}

impl From<Vec<Command>> for BindingTarget {
    fn from(commands: Vec<Command>) -> Self {
        BindingTarget::Commands(commands)
    }
}

impl From<Procedure> for BindingTarget {
    fn from(procedure: Procedure) -> Self {
        BindingTarget::Procedure(procedure)
    }
}

/// A single keybinding: one mode, one key sequence
#[derive(Debug, Clone)]
pub struct Keybinding {
    pub mode: Mode,
    /// The keystroke sequence (usually 1, sometimes 2 for `gg`-style chords)
    pub keystrokes: Vec<Keystroke>,
    pub target: BindingTarget,
}

impl Keybinding {
    pub fn new(mode: Mode, keystrokes: Vec<Keystroke>, target: impl Into<BindingTarget>) -> Self {
        Self {
            mode,
            keystrokes,
            target: target.into(),
        }
    }

    /// The binding-table key for this sequence
    pub fn canonical(&self) -> String {
        join_canonical(&self.keystrokes)
    }

    /// Check if this is a multi-keystroke binding
    pub fn is_sequence(&self) -> bool {
        self.keystrokes.len() > 1
    }
}
