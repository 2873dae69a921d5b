//! Modal commands and the host actions they expand into
//!
//! ```text
//! Command::execute(CommandContext) → Vec<Action> (+ blocking Host round trips)
//! ```

mod action;
mod command;
mod context;

pub use action::{Action, Disposition, KeyResponse};
pub use command::Command;
pub use context::CommandContext;
