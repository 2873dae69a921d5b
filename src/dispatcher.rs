//! Per-session key dispatch: queue, counts, sequence matching, execution
//!
//! ```text
//! KeyEvent → Keystroke → key queue → resolve() → KeyAction
//!                                        Execute  → commands → KeyResponse (suppress)
//!                                        AwaitMore → suppress, keep queue
//!                                        NoMatch  → clear queue, suppress or pass through
//! ```
//!
//! Resolution tries every suffix of the queue, longest first, so a stray key
//! before a valid sequence (`qgg`) does not block it. A leading count
//! (`12j`) is split off each suffix before lookup.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::commands::{Action, CommandContext, KeyResponse};
use crate::config::DispatcherConfig;
use crate::error::{CommandError, DispatchError};
use crate::host::Host;
use crate::keymap::{BindingTable, BindingTarget, Keystroke, Mode};
use crate::protocol::KeyEvent;
use crate::undo::{UndoEntry, UndoHistory};

/// Result of resolving the key queue
#[derive(Debug, Clone)]
pub enum KeyAction {
    /// Run this target `count` times
    Execute { target: BindingTarget, count: u32 },
    /// The queue is the start of a longer sequence (or a count in progress)
    AwaitMore,
    /// Nothing matches and nothing could
    NoMatch,
}

/// Split a leading count (`[1-9][0-9]*`) off `seq`
///
/// Returns the count, if any, and the rest. A lone `0` is not a count.
fn split_count(seq: &str) -> (Option<u32>, &str) {
    let digits = seq
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() && (i > 0 || c != '0'))
        .count();
    if digits == 0 {
        return (None, seq);
    }
    let (count, rest) = seq.split_at(digits);
    // Saturate; the caller clamps to the configured ceiling anyway
    (Some(count.parse().unwrap_or(u32::MAX)), rest)
}

/// Number of decimal digits in `n`
fn digit_count(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Keystroke interpreter for one host session
pub struct Dispatcher {
    keymap: Arc<BindingTable>,
    config: DispatcherConfig,
    mode: Mode,
    key_queue: VecDeque<Keystroke>,
    queue_capacity: usize,
    undo: UndoHistory,
}

impl Dispatcher {
    pub fn new(keymap: Arc<BindingTable>, config: DispatcherConfig) -> Self {
        let undo = UndoHistory::with_max_size(config.undo_depth);
        let mut dispatcher = Self {
            keymap,
            config,
            mode: Mode::Command,
            key_queue: VecDeque::new(),
            queue_capacity: 1,
            undo,
        };
        dispatcher.queue_capacity = dispatcher.compute_queue_capacity();
        dispatcher
    }

    /// Dispatcher with default settings
    pub fn with_keymap(keymap: BindingTable) -> Self {
        Self::new(Arc::new(keymap), DispatcherConfig::default())
    }

    /// Longest sequence plus room for a maximal count, capped
    fn compute_queue_capacity(&self) -> usize {
        let wanted =
            self.keymap.longest_sequence().max(1) + digit_count(self.config.repeat_ceiling());
        wanted.min(self.config.max_queue_len.max(1))
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Force a mode, e.g. when the host attaches to a fresh document
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == Mode::Insert {
            self.undo.clear();
        }
        self.key_queue.clear();
        self.mode = mode;
    }

    pub fn keymap(&self) -> &Arc<BindingTable> {
        &self.keymap
    }

    /// Swap in a rebuilt keymap; pending keys are dropped
    pub fn set_keymap(&mut self, keymap: Arc<BindingTable>) {
        self.keymap = keymap;
        self.key_queue.clear();
        self.queue_capacity = self.compute_queue_capacity();
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn key_queue(&self) -> &VecDeque<Keystroke> {
        &self.key_queue
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn undo_history(&self) -> &UndoHistory {
        &self.undo
    }

    /// Append to the queue, dropping the oldest key past capacity
    pub fn push_keystroke(&mut self, keystroke: Keystroke) {
        self.key_queue.push_back(keystroke);
        while self.key_queue.len() > self.queue_capacity {
            self.key_queue.pop_front();
        }
    }

    /// Classify the current queue against the keymap in the current mode
    pub fn resolve(&self) -> KeyAction {
        let rendered: Vec<String> = self.key_queue.iter().map(ToString::to_string).collect();
        let accepts_count = self.mode.accepts_count();
        let split = |suffix: &str| -> (Option<u32>, usize) {
            if accepts_count {
                let (count, rest) = split_count(suffix);
                (count, suffix.len() - rest.len())
            } else {
                (None, 0)
            }
        };

        let suffixes: Vec<String> = (0..rendered.len())
            .map(|start| rendered[start..].concat())
            .collect();

        for suffix in &suffixes {
            let (count, offset) = split(suffix);
            let rest = &suffix[offset..];
            if rest.is_empty() {
                // The tail of the queue is a count still being typed; shorter
                // suffixes are digits of it, not bindings of their own
                break;
            }
            if let Some(target) = self.keymap.lookup(&self.mode, rest) {
                if !target.is_empty() {
                    let count = count.unwrap_or(1).min(self.config.repeat_ceiling());
                    return KeyAction::Execute {
                        target: target.clone(),
                        count,
                    };
                }
            }
        }

        for suffix in &suffixes {
            let (_, offset) = split(suffix);
            if self.keymap.has_prefix(&self.mode, &suffix[offset..]) {
                return KeyAction::AwaitMore;
            }
        }

        KeyAction::NoMatch
    }

    /// Interpret one key event and produce the reply for the host
    ///
    /// Only a broken host connection is an error; everything else resolves
    /// to some response.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        host: &mut dyn Host,
    ) -> Result<KeyResponse, DispatchError> {
        let keystroke = match event.keystroke() {
            Ok(keystroke) => keystroke,
            Err(e) => {
                tracing::warn!("Undecodable key event: {}", e);
                return Ok(KeyResponse::pass_through());
            }
        };

        // Bare modifier presses only matter to the host
        if keystroke.is_modifier_only() {
            return Ok(KeyResponse::pass_through());
        }

        self.push_keystroke(keystroke);
        let action = self.resolve();
        tracing::debug!(
            key = %keystroke,
            mode = %self.mode,
            queue_len = self.key_queue.len(),
            ?action,
            "resolved keystroke"
        );

        match action {
            KeyAction::Execute { target, count } => {
                self.key_queue.clear();
                self.execute(&target, count, event, host)
            }
            KeyAction::AwaitMore => Ok(KeyResponse::suppress(Vec::new())),
            KeyAction::NoMatch => {
                self.key_queue.clear();
                if self.mode == Mode::Insert || keystroke.mods.command() {
                    Ok(KeyResponse::pass_through())
                } else {
                    Ok(KeyResponse::suppress(Vec::new()))
                }
            }
        }
    }

    fn execute(
        &mut self,
        target: &BindingTarget,
        count: u32,
        event: &KeyEvent,
        host: &mut dyn Host,
    ) -> Result<KeyResponse, DispatchError> {
        let saved_mode = self.mode.clone();
        let saved_undo = self.undo.clone();

        match self.run_target(target, count, event, host) {
            Ok(actions) => Ok(KeyResponse::suppress(actions)),
            Err(CommandError::Host(e)) => Err(DispatchError::Host(e)),
            Err(CommandError::Failed(message)) => {
                tracing::warn!("Command failed, dropping key: {}", message);
                self.mode = saved_mode;
                self.undo = saved_undo;
                Ok(KeyResponse::suppress(Vec::new()))
            }
        }
    }

    fn run_target(
        &mut self,
        target: &BindingTarget,
        count: u32,
        event: &KeyEvent,
        host: &mut dyn Host,
    ) -> Result<Vec<Action>, CommandError> {
        match target {
            BindingTarget::Commands(commands) => {
                let mut actions = Vec::new();
                for &command in commands {
                    if self.config.is_mutating(command) {
                        self.undo.push(UndoEntry {
                            command,
                            line: event.line,
                            column: event.column,
                        });
                    }
                    let mut ctx =
                        CommandContext::new(count, event, &mut self.mode, &mut self.undo, host);
                    actions.extend(command.execute(&mut ctx)?);
                }
                Ok(actions)
            }
            BindingTarget::Procedure(procedure) => {
                let mut ctx =
                    CommandContext::new(count, event, &mut self.mode, &mut self.undo, host);
                procedure.call(&mut ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::config::MAX_REPEAT_LIMIT;
    use crate::error::HostError;
    use crate::keymap::{host_flags, KeymapBuilder, Procedure};
    use serde_json::{json, Value};

    /// Host that answers every query and never has a selection
    #[derive(Default)]
    struct QuietHost {
        sent: Vec<Action>,
    }

    impl Host for QuietHost {
        fn send(&mut self, action: &Action) -> Result<Value, HostError> {
            self.sent.push(action.clone());
            Ok(json!({
                "hasSelection": false,
                "selectedText": "",
                "clipboardContents": "",
            }))
        }
    }

    struct DeadHost;

    impl Host for DeadHost {
        fn send(&mut self, _action: &Action) -> Result<Value, HostError> {
            Err(HostError::Disconnected)
        }
    }

    fn keymap() -> BindingTable {
        let mut b = KeymapBuilder::new();
        b.map("j", Command::MoveDown)
            .unwrap()
            .map("x", Command::CutForward)
            .unwrap()
            .map("gg", Command::MoveToBeginningOfDocument)
            .unwrap()
            .map("0", Command::MoveToBeginningOfLine)
            .unwrap()
            .map("u", Command::Undo)
            .unwrap()
            .map("i", Command::EnterInsertMode)
            .unwrap()
            .map("dd", Command::CutLine)
            .unwrap();
        b.mode(&[Mode::Insert], |b| {
            b.map("<esc>", Command::EnterCommandMode)?;
            Ok(())
        })
        .unwrap();
        b.build()
    }

    fn key(c: &str) -> KeyEvent {
        KeyEvent {
            has_selection: Some(false),
            ..KeyEvent::typed(c, 0)
        }
    }

    fn feed(d: &mut Dispatcher, keys: &str) -> KeyResponse {
        let mut host = QuietHost::default();
        let mut last = KeyResponse::pass_through();
        for c in keys.chars() {
            last = d.handle_key(&key(&c.to_string()), &mut host).unwrap();
        }
        last
    }

    #[test]
    fn test_split_count() {
        assert_eq!(split_count("12j"), (Some(12), "j"));
        assert_eq!(split_count("j"), (None, "j"));
        assert_eq!(split_count("0"), (None, "0"));
        assert_eq!(split_count("10"), (Some(10), ""));
        assert_eq!(split_count("99999999999x"), (Some(u32::MAX), "x"));
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(999), 3);
        assert_eq!(digit_count(1000), 4);
    }

    #[test]
    fn test_queue_capacity() {
        let d = Dispatcher::with_keymap(keymap());
        assert_eq!(d.queue_capacity(), 2 + 3);

        let config = DispatcherConfig {
            max_queue_len: 3,
            ..DispatcherConfig::default()
        };
        let d = Dispatcher::new(Arc::new(keymap()), config);
        assert_eq!(d.queue_capacity(), 3);
    }

    #[test]
    fn test_single_key_executes() {
        let mut d = Dispatcher::with_keymap(keymap());
        let response = feed(&mut d, "j");
        assert_eq!(response.selectors(), vec!["moveDown:"]);
        assert!(response.is_suppressed());
        assert!(d.key_queue().is_empty());
    }

    #[test]
    fn test_count_repeats() {
        let mut d = Dispatcher::with_keymap(keymap());
        assert_eq!(feed(&mut d, "3").actions, vec![]);
        let response = feed(&mut d, "j");
        assert_eq!(response.selectors(), vec!["moveDown:"; 3]);
    }

    #[test]
    fn test_count_with_zero_digit() {
        let mut d = Dispatcher::with_keymap(keymap());
        let response = feed(&mut d, "10");
        assert!(response.actions.is_empty());
        assert_eq!(d.key_queue().len(), 2);
        let response = feed(&mut d, "j");
        assert_eq!(response.actions.len(), 10);
    }

    #[test]
    fn test_lone_zero_is_a_binding() {
        let mut d = Dispatcher::with_keymap(keymap());
        let response = feed(&mut d, "0");
        assert_eq!(
            response.selectors(),
            vec!["moveToBeginningOfLine:"]
        );
    }

    #[test]
    fn test_sequence_awaits_then_executes() {
        let mut d = Dispatcher::with_keymap(keymap());
        let response = feed(&mut d, "g");
        assert!(response.is_suppressed());
        assert!(response.actions.is_empty());
        assert_eq!(d.key_queue().len(), 1);

        let response = feed(&mut d, "g");
        assert_eq!(response.selectors(), vec!["moveToBeginningOfDocument:"]);
        assert!(d.key_queue().is_empty());
    }

    #[test]
    fn test_stray_prefix_key_is_skipped() {
        let mut d = Dispatcher::with_keymap(keymap());
        // `dg` is no binding's prefix, but its tail `g` is
        let response = feed(&mut d, "dg");
        assert!(response.actions.is_empty());
        assert_eq!(d.key_queue().len(), 2);
        let response = feed(&mut d, "g");
        assert_eq!(response.selectors(), vec!["moveToBeginningOfDocument:"]);
    }

    #[test]
    fn test_unmatched_in_command_mode_suppressed() {
        let mut d = Dispatcher::with_keymap(keymap());
        let response = feed(&mut d, "z");
        assert!(response.is_suppressed());
        assert!(response.actions.is_empty());
        assert!(d.key_queue().is_empty());
    }

    #[test]
    fn test_unmatched_with_command_modifier_passes_through() {
        let mut d = Dispatcher::with_keymap(keymap());
        let mut host = QuietHost::default();
        let response = d
            .handle_key(&KeyEvent::typed("s", host_flags::COMMAND), &mut host)
            .unwrap();
        assert!(!response.is_suppressed());
    }

    #[test]
    fn test_insert_mode_passes_through_and_ignores_counts() {
        let mut d = Dispatcher::with_keymap(keymap());
        feed(&mut d, "i");
        assert_eq!(d.mode(), &Mode::Insert);

        let response = feed(&mut d, "3");
        assert!(!response.is_suppressed());
        let response = feed(&mut d, "j");
        assert!(!response.is_suppressed());
        assert!(d.key_queue().is_empty());

        let mut host = QuietHost::default();
        let response = d.handle_key(&key("\u{1b}"), &mut host).unwrap();
        assert!(response.is_suppressed());
        assert_eq!(d.mode(), &Mode::Command);
    }

    #[test]
    fn test_modifier_only_event_does_not_touch_queue() {
        let mut d = Dispatcher::with_keymap(keymap());
        feed(&mut d, "g");
        let mut host = QuietHost::default();
        let event = KeyEvent {
            modifier_flags: host_flags::SHIFT,
            ..KeyEvent::default()
        };
        let response = d.handle_key(&event, &mut host).unwrap();
        assert!(!response.is_suppressed());
        assert_eq!(d.key_queue().len(), 1);
    }

    #[test]
    fn test_mutating_command_records_undo() {
        let mut d = Dispatcher::with_keymap(keymap());
        let mut host = QuietHost::default();
        let event = KeyEvent {
            line: 4,
            column: 2,
            ..key("x")
        };
        d.handle_key(&event, &mut host).unwrap();
        assert_eq!(
            d.undo_history().last(),
            Some(&UndoEntry {
                command: Command::CutForward,
                line: 4,
                column: 2
            })
        );

        feed(&mut d, "j");
        assert_eq!(d.undo_history().len(), 1);
    }

    #[test]
    fn test_undo_restores_cursor() {
        let mut d = Dispatcher::with_keymap(keymap());
        let mut host = QuietHost::default();
        let event = KeyEvent {
            line: 4,
            column: 2,
            ..key("x")
        };
        d.handle_key(&event, &mut host).unwrap();

        let response = feed(&mut d, "u");
        assert_eq!(response.selectors()[0], "undo");
        assert!(response.selectors().contains(&"setSelection:column:"));
        assert!(d.undo_history().is_empty());
    }

    #[test]
    fn test_count_clamped_to_max_repeat() {
        let config = DispatcherConfig {
            max_repeat: 5,
            ..DispatcherConfig::default()
        };
        let mut d = Dispatcher::new(Arc::new(keymap()), config);
        let response = feed(&mut d, "9j");
        assert_eq!(response.actions.len(), 5);
    }

    #[test]
    fn test_huge_max_repeat_is_capped() {
        let config = DispatcherConfig {
            max_repeat: u32::MAX,
            max_queue_len: 64,
            ..DispatcherConfig::default()
        };
        let mut table = keymap();
        table
            .register(&[Mode::Command], "<C-d>", Command::HalfPageDown)
            .unwrap();
        let mut d = Dispatcher::new(Arc::new(table), config);
        feed(&mut d, "999999999");
        let ctrl_d = KeyEvent::typed("\u{4}", host_flags::CONTROL);
        let response = d.handle_key(&ctrl_d, &mut QuietHost::default()).unwrap();
        assert_eq!(response.actions.len(), 6 * MAX_REPEAT_LIMIT as usize);
    }

    #[test]
    fn test_host_failure_is_fatal() {
        let mut keymap = keymap();
        keymap
            .register(&[Mode::Command], "p", Command::PasteAfter)
            .unwrap();
        let mut d = Dispatcher::with_keymap(keymap);
        let result = d.handle_key(&key("p"), &mut DeadHost);
        assert!(matches!(result, Err(DispatchError::Host(HostError::Disconnected))));
    }

    #[test]
    fn test_failed_procedure_rolls_back() {
        let mut table = keymap();
        let procedure = Procedure::new("half_done", |ctx| {
            ctx.set_mode(Mode::Insert);
            Err(CommandError::Failed("no".into()))
        });
        table.register(&[Mode::Command], "Q", procedure).unwrap();
        let mut d = Dispatcher::with_keymap(table);
        feed(&mut d, "x");

        let mut host = QuietHost::default();
        let response = d
            .handle_key(&KeyEvent::typed("Q", host_flags::SHIFT), &mut host)
            .unwrap();
        assert!(response.is_suppressed());
        assert!(response.actions.is_empty());
        assert_eq!(d.mode(), &Mode::Command);
        assert_eq!(d.undo_history().len(), 1);
    }

    #[test]
    fn test_procedure_receives_count() {
        let mut table = keymap();
        let procedure = Procedure::new("echo_count", |ctx| {
            Ok(vec![Action::with_args("echo:", vec![json!(ctx.count)])])
        });
        table.register(&[Mode::Command], "e", procedure).unwrap();
        let mut d = Dispatcher::with_keymap(table);
        let response = feed(&mut d, "7e");
        assert_eq!(response.actions[0].args, vec![json!(7)]);
    }

    #[test]
    fn test_set_keymap_clears_queue() {
        let mut d = Dispatcher::with_keymap(keymap());
        feed(&mut d, "g");
        d.set_keymap(Arc::new(BindingTable::new()));
        assert!(d.key_queue().is_empty());
        assert_eq!(d.queue_capacity(), 1 + 3);
    }
}
