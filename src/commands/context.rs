//! Everything a command handler may read or change while it runs

use serde_json::json;

use crate::error::HostError;
use crate::host::Host;
use crate::keymap::Mode;
use crate::protocol::KeyEvent;
use crate::undo::UndoHistory;

use super::action::Action;

/// Execution context for one command invocation
///
/// Borrowed from the dispatcher for the duration of a single command; the
/// host handle is the only way out to the editor.
pub struct CommandContext<'a> {
    /// Resolved repeat count (at least 1)
    pub count: u32,
    /// The key event that triggered the command
    pub event: &'a KeyEvent,
    mode: &'a mut Mode,
    undo: &'a mut UndoHistory,
    host: &'a mut dyn Host,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        count: u32,
        event: &'a KeyEvent,
        mode: &'a mut Mode,
        undo: &'a mut UndoHistory,
        host: &'a mut dyn Host,
    ) -> Self {
        Self {
            count,
            event,
            mode,
            undo,
            host,
        }
    }

    pub fn mode(&self) -> &Mode {
        self.mode
    }

    /// Switch modes. Entering insert mode discards pending undo snapshots:
    /// a stretch of free-form typing is not part of the modal undo chain.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Insert {
            self.undo.clear();
        }
        tracing::debug!(from = %self.mode, to = %mode, "mode transition");
        *self.mode = mode;
    }

    pub fn undo_history(&mut self) -> &mut UndoHistory {
        self.undo
    }

    /// Selection state as of the key event, asking the host if the event
    /// did not carry it
    pub fn has_selection(&mut self) -> Result<bool, HostError> {
        match self.event.has_selection {
            Some(has) => Ok(has),
            None => self.host.has_selection(),
        }
    }

    pub fn selected_text(&mut self) -> Result<String, HostError> {
        self.host.selected_text()
    }

    pub fn clipboard_contents(&mut self) -> Result<String, HostError> {
        self.host.clipboard_contents()
    }

    /// Perform an action now, before the rest of the command is built
    pub fn perform(&mut self, action: Action) -> Result<(), HostError> {
        self.host.perform(&action)
    }

    /// Collapse any selection to `(line, column)` and restore the scroll
    /// offset captured with the key event
    ///
    /// The host can only move one end of a selection, so the selection is
    /// first collapsed at the document start. That may scroll the view.
    pub fn set_cursor_position(&self, line: usize, column: usize) -> Vec<Action> {
        vec![
            Action::with_args("setSelection:column:", vec![json!(0), json!(0)]),
            Action::new("moveBackward:"),
            Action::with_args(
                "setSelection:column:",
                vec![json!(line + 1), json!(column + 1)],
            ),
            Action::new("moveForward:"),
            Action::with_args(
                "scrollTo:y:",
                vec![json!(self.event.scroll_x), json!(self.event.scroll_y)],
            ),
        ]
    }

    /// Put the cursor back where it was when the key was pressed
    pub fn restore_cursor_position(&self) -> Vec<Action> {
        self.set_cursor_position(self.event.line, self.event.column)
    }
}
