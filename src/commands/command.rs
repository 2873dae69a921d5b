//! Command enum representing every bindable modal command
//!
//! This is a closed catalog: keymap files name commands by their snake_case
//! identifier, and an unknown name is rejected when the keymap loads. Each
//! command expands into host action tokens through `Command::execute`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::CommandError;
use crate::keymap::Mode;

use super::action::Action;
use super::context::CommandContext;

/// "Half a page" is approximated by this many lines
const HALF_PAGE_LINES: u32 = 6;

/// All commands that can be bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    // ========================================================================
    // Modes
    // ========================================================================
    EnterCommandMode,
    EnterInsertMode,
    EnterVisualMode,
    /// Collapse an active selection
    SelectNone,

    // ========================================================================
    // Movement
    // ========================================================================
    MoveBackward,
    MoveForward,
    MoveDown,
    MoveUp,
    HalfPageDown,
    HalfPageUp,
    MoveWordBackward,
    MoveWordForward,
    MoveToEndOfWord,
    MoveToBeginningOfLine,
    MoveToEndOfLine,
    MoveToBeginningOfDocument,
    MoveToEndOfDocument,

    // ========================================================================
    // Movement + selection
    // ========================================================================
    SelectBackward,
    SelectForward,
    SelectDown,
    SelectUp,
    SelectHalfPageDown,
    SelectHalfPageUp,
    SelectWordBackward,
    SelectWordForward,
    SelectToEndOfWord,
    SelectToBeginningOfLine,
    SelectToEndOfLine,
    SelectToBeginningOfDocument,
    SelectToEndOfDocument,

    // ========================================================================
    // Insertion
    // ========================================================================
    InsertBackward,
    InsertForward,
    InsertAtBeginningOfLine,
    InsertAtEndOfLine,
    InsertNewlineAbove,
    InsertNewlineBelow,

    // ========================================================================
    // Cutting
    // ========================================================================
    CutBackward,
    CutForward,
    CutWordForward,
    CutWordBackward,
    CutLine,
    CutToBeginningOfLine,
    CutToEndOfLine,

    // ========================================================================
    // Copying
    // ========================================================================
    CopySelection,
    CopyForward,
    CopyBackward,
    CopyWordForward,
    CopyWordBackward,
    CopyLine,

    // ========================================================================
    // Tabs, clipboard, history
    // ========================================================================
    NextTab,
    PreviousTab,
    PasteBefore,
    PasteAfter,
    Undo,
}

impl Command {
    pub const ALL: [Command; 54] = [
        Command::EnterCommandMode,
        Command::EnterInsertMode,
        Command::EnterVisualMode,
        Command::SelectNone,
        Command::MoveBackward,
        Command::MoveForward,
        Command::MoveDown,
        Command::MoveUp,
        Command::HalfPageDown,
        Command::HalfPageUp,
        Command::MoveWordBackward,
        Command::MoveWordForward,
        Command::MoveToEndOfWord,
        Command::MoveToBeginningOfLine,
        Command::MoveToEndOfLine,
        Command::MoveToBeginningOfDocument,
        Command::MoveToEndOfDocument,
        Command::SelectBackward,
        Command::SelectForward,
        Command::SelectDown,
        Command::SelectUp,
        Command::SelectHalfPageDown,
        Command::SelectHalfPageUp,
        Command::SelectWordBackward,
        Command::SelectWordForward,
        Command::SelectToEndOfWord,
        Command::SelectToBeginningOfLine,
        Command::SelectToEndOfLine,
        Command::SelectToBeginningOfDocument,
        Command::SelectToEndOfDocument,
        Command::InsertBackward,
        Command::InsertForward,
        Command::InsertAtBeginningOfLine,
        Command::InsertAtEndOfLine,
        Command::InsertNewlineAbove,
        Command::InsertNewlineBelow,
        Command::CutBackward,
        Command::CutForward,
        Command::CutWordForward,
        Command::CutWordBackward,
        Command::CutLine,
        Command::CutToBeginningOfLine,
        Command::CutToEndOfLine,
        Command::CopySelection,
        Command::CopyForward,
        Command::CopyBackward,
        Command::CopyWordForward,
        Command::CopyWordBackward,
        Command::CopyLine,
        Command::NextTab,
        Command::PreviousTab,
        Command::PasteBefore,
        Command::PasteAfter,
        Command::Undo,
    ];

    /// Identifier used in keymap files
    pub fn name(self) -> &'static str {
        match self {
            Command::EnterCommandMode => "enter_command_mode",
            Command::EnterInsertMode => "enter_insert_mode",
            Command::EnterVisualMode => "enter_visual_mode",
            Command::SelectNone => "select_none",
            Command::MoveBackward => "move_backward",
            Command::MoveForward => "move_forward",
            Command::MoveDown => "move_down",
            Command::MoveUp => "move_up",
            Command::HalfPageDown => "half_page_down",
            Command::HalfPageUp => "half_page_up",
            Command::MoveWordBackward => "move_word_backward",
            Command::MoveWordForward => "move_word_forward",
            Command::MoveToEndOfWord => "move_to_end_of_word",
            Command::MoveToBeginningOfLine => "move_to_beginning_of_line",
            Command::MoveToEndOfLine => "move_to_end_of_line",
            Command::MoveToBeginningOfDocument => "move_to_beginning_of_document",
            Command::MoveToEndOfDocument => "move_to_end_of_document",
            Command::SelectBackward => "select_backward",
            Command::SelectForward => "select_forward",
            Command::SelectDown => "select_down",
            Command::SelectUp => "select_up",
            Command::SelectHalfPageDown => "select_half_page_down",
            Command::SelectHalfPageUp => "select_half_page_up",
            Command::SelectWordBackward => "select_word_backward",
            Command::SelectWordForward => "select_word_forward",
            Command::SelectToEndOfWord => "select_to_end_of_word",
            Command::SelectToBeginningOfLine => "select_to_beginning_of_line",
            Command::SelectToEndOfLine => "select_to_end_of_line",
            Command::SelectToBeginningOfDocument => "select_to_beginning_of_document",
            Command::SelectToEndOfDocument => "select_to_end_of_document",
            Command::InsertBackward => "insert_backward",
            Command::InsertForward => "insert_forward",
            Command::InsertAtBeginningOfLine => "insert_at_beginning_of_line",
            Command::InsertAtEndOfLine => "insert_at_end_of_line",
            Command::InsertNewlineAbove => "insert_newline_above",
            Command::InsertNewlineBelow => "insert_newline_below",
            Command::CutBackward => "cut_backward",
            Command::CutForward => "cut_forward",
            Command::CutWordForward => "cut_word_forward",
            Command::CutWordBackward => "cut_word_backward",
            Command::CutLine => "cut_line",
            Command::CutToBeginningOfLine => "cut_to_beginning_of_line",
            Command::CutToEndOfLine => "cut_to_end_of_line",
            Command::CopySelection => "copy_selection",
            Command::CopyForward => "copy_forward",
            Command::CopyBackward => "copy_backward",
            Command::CopyWordForward => "copy_word_forward",
            Command::CopyWordBackward => "copy_word_backward",
            Command::CopyLine => "copy_line",
            Command::NextTab => "next_tab",
            Command::PreviousTab => "previous_tab",
            Command::PasteBefore => "paste_before",
            Command::PasteAfter => "paste_after",
            Command::Undo => "undo",
        }
    }

    /// Expand this command into host actions
    ///
    /// May block on host queries (clipboard, selection) and may perform
    /// some actions immediately when later steps depend on their effect.
    pub fn execute(self, ctx: &mut CommandContext<'_>) -> Result<Vec<Action>, CommandError> {
        let n = ctx.count;
        let actions = match self {
            Command::EnterCommandMode => {
                ctx.set_mode(Mode::Command);
                let mut actions = vec![enter_mode(&Mode::Command)];
                actions.extend(Command::SelectNone.execute(ctx)?);
                actions
            }
            Command::EnterInsertMode => {
                ctx.set_mode(Mode::Insert);
                vec![enter_mode(&Mode::Insert)]
            }
            Command::EnterVisualMode => {
                ctx.set_mode(Mode::Visual);
                vec![enter_mode(&Mode::Visual)]
            }
            Command::SelectNone => {
                if ctx.has_selection()? {
                    vec![act("moveBackward:")]
                } else {
                    vec![]
                }
            }

            Command::MoveBackward => act("moveBackward:").times(n),
            Command::MoveForward => act("moveForward:").times(n),
            Command::MoveDown => act("moveDown:").times(n),
            Command::MoveUp => act("moveUp:").times(n),
            Command::HalfPageDown => act("moveDown:").times(HALF_PAGE_LINES.saturating_mul(n)),
            Command::HalfPageUp => act("moveUp:").times(HALF_PAGE_LINES.saturating_mul(n)),
            Command::MoveWordBackward => act("moveWordBackward:").times(n),
            Command::MoveWordForward => act("moveWordForward:").times(n),
            Command::MoveToEndOfWord => act("moveToEndOfWord:").times(n),
            Command::MoveToBeginningOfLine => vec![act("moveToBeginningOfLine:")],
            Command::MoveToEndOfLine => vec![act("moveToEndOfLine:")],
            Command::MoveToBeginningOfDocument => vec![act("moveToBeginningOfDocument:")],
            Command::MoveToEndOfDocument => vec![act("moveToEndOfDocument:")],

            Command::SelectBackward => act("moveBackwardAndModifySelection:").times(n),
            Command::SelectForward => act("moveForwardAndModifySelection:").times(n),
            Command::SelectDown => act("moveDownAndModifySelection:").times(n),
            Command::SelectUp => act("moveUpAndModifySelection:").times(n),
            Command::SelectHalfPageDown => {
                act("moveDownAndModifySelection:").times(HALF_PAGE_LINES.saturating_mul(n))
            }
            Command::SelectHalfPageUp => {
                act("moveUpAndModifySelection:").times(HALF_PAGE_LINES.saturating_mul(n))
            }
            Command::SelectWordBackward => act("moveWordBackwardAndModifySelection:").times(n),
            Command::SelectWordForward => act("moveWordForwardAndModifySelection:").times(n),
            Command::SelectToEndOfWord => act("moveToEndOfWordAndModifySelection:").times(n),
            Command::SelectToBeginningOfLine => {
                vec![act("moveToBeginningOfLineAndModifySelection:")]
            }
            Command::SelectToEndOfLine => vec![act("moveToEndOfLineAndModifySelection:")],
            Command::SelectToBeginningOfDocument => {
                vec![act("moveToBeginningOfDocumentAndModifySelection:")]
            }
            Command::SelectToEndOfDocument => {
                vec![act("moveToEndOfDocumentAndModifySelection:")]
            }

            Command::InsertBackward => Command::EnterInsertMode.execute(ctx)?,
            Command::InsertForward => then_insert(ctx, vec![act("moveForward:")])?,
            Command::InsertAtBeginningOfLine => {
                then_insert(ctx, vec![act("moveToBeginningOfLine:")])?
            }
            Command::InsertAtEndOfLine => then_insert(ctx, vec![act("moveToEndOfLine:")])?,
            Command::InsertNewlineAbove => then_insert(
                ctx,
                vec![
                    act("moveToBeginningOfLine:"),
                    act("addNewline"),
                    act("moveUp:"),
                ],
            )?,
            Command::InsertNewlineBelow => {
                then_insert(ctx, vec![act("moveToEndOfLine:"), act("addNewline")])?
            }

            Command::CutBackward => {
                if ctx.has_selection()? {
                    vec![
                        act("copySelection"),
                        act("deleteBackward:"),
                        act("moveForward:"),
                    ]
                } else {
                    let mut actions = act("moveBackwardAndModifySelection:").times(n);
                    actions.extend([act("copySelection"), act("deleteBackward:")]);
                    actions
                }
            }
            Command::CutForward => {
                if ctx.has_selection()? {
                    vec![act("copySelection"), act("deleteBackward:")]
                } else {
                    let mut actions = act("moveForwardAndModifySelection:").times(n);
                    actions.extend([act("copySelection"), act("deleteForward:")]);
                    actions
                }
            }
            // Which end of the selection moves first matters: after an undo
            // the cursor should be back where this command started.
            Command::CutWordForward => {
                select_word_forward_including_whitespace(ctx, n)?;
                let mut actions = vec![act("copySelection"), act("deleteBackward:")];
                actions.extend(ctx.restore_cursor_position());
                actions
            }
            Command::CutWordBackward => {
                let mut actions = act("moveWordBackwardAndModifySelection:").times(n);
                actions.extend([act("copySelection"), act("deleteBackward:")]);
                actions
            }
            Command::CutLine => {
                let mut actions = vec![act("moveToBeginningOfLine:")];
                actions.extend(act("moveDownAndModifySelection:").times(n));
                actions.extend([act("copySelection"), act("deleteBackward:")]);
                actions
            }
            Command::CutToBeginningOfLine => vec![
                act("moveToBeginningOfLineAndModifySelection:"),
                act("copySelection"),
                act("deleteForward:"),
            ],
            Command::CutToEndOfLine => {
                let mut actions = vec![
                    act("moveToEndOfLineAndModifySelection:"),
                    act("copySelection"),
                    act("deleteBackward:"),
                ];
                actions.extend(ctx.restore_cursor_position());
                actions
            }

            Command::CopySelection => vec![act("copySelection")],
            Command::CopyForward => {
                let mut actions = vec![act("moveForwardAndModifySelection:"), act("copySelection")];
                actions.extend(ctx.restore_cursor_position());
                actions
            }
            // Vim leaves the cursor one to the left after a backward copy
            Command::CopyBackward => {
                let mut actions = act("moveBackwardAndModifySelection:").times(n);
                actions.extend([
                    act("copySelection"),
                    act("moveForward:"),
                    act("moveBackward:"),
                ]);
                actions
            }
            Command::CopyWordForward => {
                let mut actions = act("moveWordForwardAndModifySelection:").times(n);
                actions.push(act("copySelection"));
                actions.extend(ctx.restore_cursor_position());
                actions
            }
            Command::CopyWordBackward => {
                let mut actions = act("moveWordBackwardAndModifySelection:").times(n);
                actions.push(act("copySelection"));
                actions.extend(ctx.restore_cursor_position());
                actions.push(act("moveWordBackward:"));
                actions
            }
            Command::CopyLine => copy_line(ctx, n)?,

            Command::NextTab => click_menu_item("Navigation > Next File Tab").times(n),
            Command::PreviousTab => click_menu_item("Navigation > Previous File Tab").times(n),

            Command::PasteBefore => paste_before(ctx)?,
            Command::PasteAfter => paste_after(ctx)?,

            Command::Undo => {
                let restored = ctx.undo_history().unwind(n);
                let mut actions = act("undo").times(n);
                if let Some(entry) = restored {
                    actions.extend(ctx.set_cursor_position(entry.line, entry.column));
                }
                actions
            }
        };
        Ok(actions)
    }
}

fn act(selector: &str) -> Action {
    Action::new(selector)
}

fn enter_mode(mode: &Mode) -> Action {
    Action::with_args("enterMode:", vec![json!(mode.as_str())])
}

fn click_menu_item(path: &str) -> Action {
    Action::with_args("clickMenuItem:", vec![json!(path)])
}

/// Run `before`, then switch to insert mode
fn then_insert(
    ctx: &mut CommandContext<'_>,
    mut before: Vec<Action>,
) -> Result<Vec<Action>, CommandError> {
    before.extend(Command::EnterInsertMode.execute(ctx)?);
    Ok(before)
}

/// Extend the selection `words` words forward, then keep swallowing
/// whitespace that follows the last word
///
/// Performed live through the host because each step depends on the text
/// the previous one selected.
fn select_word_forward_including_whitespace(
    ctx: &mut CommandContext<'_>,
    words: u32,
) -> Result<(), CommandError> {
    for _ in 0..words {
        ctx.perform(act("moveWordForwardAndModifySelection:"))?;
    }
    let selection = ctx.selected_text()?;
    let mut previous_len = selection.len();

    loop {
        ctx.perform(act("moveForwardAndModifySelection:"))?;
        let current = ctx.selected_text()?;
        let trailing = current.get(selection.len()..).unwrap_or("");
        let all_whitespace = !trailing.is_empty() && trailing.chars().all(char::is_whitespace);

        if !all_whitespace {
            if !trailing.is_empty() {
                // Took one non-whitespace character too many
                ctx.perform(act("moveBackwardAndModifySelection:"))?;
            }
            break;
        }
        // End of document: the selection stopped growing
        if current.len() == previous_len {
            break;
        }
        previous_len = current.len();
    }
    Ok(())
}

/// Copy whole lines, making sure the clipboard ends in a newline so a later
/// paste is treated as a line paste (the last line of a file has none)
fn copy_line(ctx: &mut CommandContext<'_>, n: u32) -> Result<Vec<Action>, CommandError> {
    let mut selecting = vec![act("moveToBeginningOfLine:")];
    selecting.extend(act("moveDownAndModifySelection:").times(n));
    selecting.push(act("copySelection"));
    for action in selecting {
        ctx.perform(action)?;
    }

    let mut clipboard = ctx.clipboard_contents()?;
    if !clipboard.ends_with('\n') {
        clipboard.push('\n');
        ctx.perform(Action::with_args(
            "setClipboardContents:",
            vec![json!(clipboard)],
        ))?;
    }
    Ok(ctx.restore_cursor_position())
}

fn is_line_paste(clipboard: &str) -> bool {
    clipboard.ends_with('\n')
}

fn starts_with_whitespace(clipboard: &str) -> bool {
    clipboard.chars().next().is_some_and(char::is_whitespace)
}

/// A clipboard ending in a newline is pasted on its own line; the cursor then
/// goes to the first word of the pasted text
fn paste_before(ctx: &mut CommandContext<'_>) -> Result<Vec<Action>, CommandError> {
    let clipboard = ctx.clipboard_contents()?;
    if !is_line_paste(&clipboard) {
        return Ok(vec![act("paste"), act("moveForward:")]);
    }

    let mut actions = vec![act("moveToBeginningOfLine:"), act("paste")];
    actions.extend(ctx.restore_cursor_position());
    actions.push(act("moveToBeginningOfLine:"));
    if starts_with_whitespace(&clipboard) {
        actions.push(act("moveWordForward:"));
    }
    Ok(actions)
}

fn paste_after(ctx: &mut CommandContext<'_>) -> Result<Vec<Action>, CommandError> {
    let clipboard = ctx.clipboard_contents()?;
    if !is_line_paste(&clipboard) {
        let mut actions = if ctx.has_selection()? {
            vec![]
        } else {
            vec![act("moveForward:")]
        };
        actions.extend([act("paste"), act("moveForward:")]);
        return Ok(actions);
    }

    let mut actions = vec![
        act("moveDown:"),
        act("moveToBeginningOfLine:"),
        act("paste"),
    ];
    actions.extend(ctx.restore_cursor_position());
    actions.extend([act("moveDown:"), act("moveToBeginningOfLine:")]);
    if starts_with_whitespace(&clipboard) {
        actions.push(act("moveWordForward:"));
    }
    Ok(actions)
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.name() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::Host;
    use crate::protocol::KeyEvent;
    use crate::undo::{UndoEntry, UndoHistory};
    use serde_json::Value;

    /// Host with a fixed clipboard that records performed actions
    #[derive(Default)]
    struct FakeHost {
        clipboard: String,
        performed: Vec<Action>,
    }

    impl Host for FakeHost {
        fn send(&mut self, action: &Action) -> Result<Value, HostError> {
            match action.selector.as_str() {
                "getClipboardContents" => Ok(json!({ "clipboardContents": self.clipboard })),
                "getSelectedText" => Ok(json!({ "selectedText": "word" })),
                _ => {
                    self.performed.push(action.clone());
                    Ok(json!({}))
                }
            }
        }
    }

    fn run(
        command: Command,
        count: u32,
        event: &KeyEvent,
        host: &mut FakeHost,
        mode: &mut Mode,
        undo: &mut UndoHistory,
    ) -> Vec<Action> {
        let mut ctx = CommandContext::new(count, event, mode, undo, host);
        command.execute(&mut ctx).unwrap()
    }

    fn selectors(actions: &[Action]) -> Vec<&str> {
        actions.iter().map(|a| a.selector.as_str()).collect()
    }

    fn no_selection() -> KeyEvent {
        KeyEvent {
            has_selection: Some(false),
            ..KeyEvent::default()
        }
    }

    #[test]
    fn test_names_round_trip() {
        for command in Command::ALL {
            assert_eq!(command.name().parse::<Command>(), Ok(command));
        }
        assert!("no_such_command".parse::<Command>().is_err());
    }

    #[test]
    fn test_movement_repeats() {
        let event = no_selection();
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        let actions = run(Command::MoveDown, 3, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(selectors(&actions), vec!["moveDown:"; 3]);

        let actions = run(Command::HalfPageUp, 2, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(actions.len(), 12);

        let actions = run(Command::MoveToEndOfLine, 5, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(selectors(&actions), vec!["moveToEndOfLine:"]);
    }

    #[test]
    fn test_cut_forward_without_selection() {
        let event = no_selection();
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        let actions = run(Command::CutForward, 2, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(
            selectors(&actions),
            vec![
                "moveForwardAndModifySelection:",
                "moveForwardAndModifySelection:",
                "copySelection",
                "deleteForward:",
            ]
        );
    }

    #[test]
    fn test_cut_forward_with_selection() {
        let event = KeyEvent {
            has_selection: Some(true),
            ..KeyEvent::default()
        };
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        let actions = run(Command::CutForward, 2, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(selectors(&actions), vec!["copySelection", "deleteBackward:"]);
    }

    #[test]
    fn test_enter_insert_mode_clears_undo() {
        let event = no_selection();
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        undo.push(UndoEntry {
            command: Command::CutLine,
            line: 1,
            column: 1,
        });
        let actions = run(Command::InsertForward, 1, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(mode, Mode::Insert);
        assert!(undo.is_empty());
        assert_eq!(actions[0], act("moveForward:"));
        assert_eq!(actions[1], enter_mode(&Mode::Insert));
    }

    #[test]
    fn test_enter_command_mode_collapses_selection() {
        let event = KeyEvent {
            has_selection: Some(true),
            ..KeyEvent::default()
        };
        let mut host = FakeHost::default();
        let mut mode = Mode::Insert;
        let mut undo = UndoHistory::new();
        let actions = run(Command::EnterCommandMode, 1, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(mode, Mode::Command);
        assert_eq!(
            serde_json::to_value(&actions).unwrap(),
            json!([{ "enterMode:": ["command"] }, "moveBackward:"])
        );
    }

    #[test]
    fn test_undo_restores_last_popped() {
        let event = KeyEvent {
            scroll_y: 40.0,
            ..no_selection()
        };
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        undo.push(UndoEntry {
            command: Command::CutLine,
            line: 2,
            column: 5,
        });
        undo.push(UndoEntry {
            command: Command::CutLine,
            line: 9,
            column: 0,
        });

        let actions = run(Command::Undo, 2, &event, &mut host, &mut mode, &mut undo);
        assert!(undo.is_empty());
        assert_eq!(&selectors(&actions)[..2], &["undo", "undo"]);
        assert_eq!(
            actions[4],
            Action::with_args("setSelection:column:", vec![json!(3), json!(6)])
        );
        assert_eq!(
            actions[6],
            Action::with_args("scrollTo:y:", vec![json!(0.0), json!(40.0)])
        );
    }

    #[test]
    fn test_undo_with_empty_history_only_undoes() {
        let event = no_selection();
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        let actions = run(Command::Undo, 1, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(selectors(&actions), vec!["undo"]);
    }

    #[test]
    fn test_copy_line_appends_newline_to_clipboard() {
        let event = no_selection();
        let mut host = FakeHost {
            clipboard: "last line".to_string(),
            ..FakeHost::default()
        };
        let (mut mode, mut undo) = (Mode::Command, UndoHistory::new());
        let actions = run(Command::CopyLine, 1, &event, &mut host, &mut mode, &mut undo);

        assert_eq!(
            selectors(&host.performed),
            vec![
                "moveToBeginningOfLine:",
                "moveDownAndModifySelection:",
                "copySelection",
                "setClipboardContents:",
            ]
        );
        assert_eq!(host.performed[3].args, vec![json!("last line\n")]);
        assert_eq!(actions.len(), 5);
    }

    #[test]
    fn test_paste_after_line_paste() {
        let event = no_selection();
        let mut host = FakeHost {
            clipboard: "  indented\n".to_string(),
            ..FakeHost::default()
        };
        let (mut mode, mut undo) = (Mode::Command, UndoHistory::new());
        let actions = run(Command::PasteAfter, 1, &event, &mut host, &mut mode, &mut undo);
        let sels = selectors(&actions);
        assert_eq!(&sels[..3], &["moveDown:", "moveToBeginningOfLine:", "paste"]);
        assert_eq!(sels.last(), Some(&"moveWordForward:"));
    }

    #[test]
    fn test_paste_after_inline() {
        let event = no_selection();
        let mut host = FakeHost {
            clipboard: "word".to_string(),
            ..FakeHost::default()
        };
        let (mut mode, mut undo) = (Mode::Command, UndoHistory::new());
        let actions = run(Command::PasteAfter, 1, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(selectors(&actions), vec!["moveForward:", "paste", "moveForward:"]);
    }

    #[test]
    fn test_next_tab_uses_menu_item() {
        let event = no_selection();
        let mut host = FakeHost::default();
        let mut mode = Mode::Command;
        let mut undo = UndoHistory::new();
        let actions = run(Command::NextTab, 2, &event, &mut host, &mut mode, &mut undo);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].args, vec![json!("Navigation > Next File Tab")]);
    }
}
