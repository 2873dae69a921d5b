//! Synchronous round trip to the host editor
//!
//! Some commands need live editor state partway through building their
//! action list (the clipboard before a paste, the selection while extending
//! over whitespace). Each such request blocks until the host replies; there
//! is no pipelining and nothing is cached between commands.

use serde_json::Value;

use crate::commands::Action;
use crate::error::HostError;

/// State a command can ask the host about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    HasSelection,
    SelectedText,
    ClipboardContents,
}

impl Query {
    /// Selector sent to the host
    pub fn selector(self) -> &'static str {
        match self {
            Query::HasSelection => "hasSelection",
            Query::SelectedText => "getSelectedText",
            Query::ClipboardContents => "getClipboardContents",
        }
    }

    /// Field of the reply object that carries the answer
    pub fn reply_field(self) -> &'static str {
        match self {
            Query::HasSelection => "hasSelection",
            Query::SelectedText => "selectedText",
            Query::ClipboardContents => "clipboardContents",
        }
    }
}

/// The host editor, as seen from inside a command
pub trait Host {
    /// Send one action and block until the host's reply object arrives
    fn send(&mut self, action: &Action) -> Result<Value, HostError>;

    /// Perform an action immediately rather than in the final response
    fn perform(&mut self, action: &Action) -> Result<(), HostError> {
        self.send(action).map(|_| ())
    }

    /// Ask for a piece of editor state
    fn query(&mut self, query: Query) -> Result<Value, HostError> {
        let mut reply = self.send(&Action::new(query.selector()))?;
        if let Some(value) = reply.get_mut(query.reply_field()) {
            return Ok(value.take());
        }
        Err(HostError::MalformedReply(format!(
            "missing {:?} in {}",
            query.reply_field(),
            reply
        )))
    }

    fn has_selection(&mut self) -> Result<bool, HostError> {
        let value = self.query(Query::HasSelection)?;
        value
            .as_bool()
            .ok_or_else(|| HostError::MalformedReply(format!("expected bool, got {}", value)))
    }

    fn selected_text(&mut self) -> Result<String, HostError> {
        query_string(self, Query::SelectedText)
    }

    fn clipboard_contents(&mut self) -> Result<String, HostError> {
        query_string(self, Query::ClipboardContents)
    }
}

fn query_string<H: Host + ?Sized>(host: &mut H, query: Query) -> Result<String, HostError> {
    match host.query(query)? {
        Value::String(s) => Ok(s),
        // A host with nothing on the clipboard may answer null
        Value::Null => Ok(String::new()),
        other => Err(HostError::MalformedReply(format!(
            "expected string for {}, got {}",
            query.reply_field(),
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Replies from a fixed table keyed by selector
    struct TableHost(Vec<(&'static str, Value)>);

    impl Host for TableHost {
        fn send(&mut self, action: &Action) -> Result<Value, HostError> {
            self.0
                .iter()
                .find(|(sel, _)| *sel == action.selector)
                .map(|(_, reply)| reply.clone())
                .ok_or(HostError::Disconnected)
        }
    }

    #[test]
    fn test_typed_queries() {
        let mut host = TableHost(vec![
            ("hasSelection", json!({ "hasSelection": true })),
            ("getSelectedText", json!({ "selectedText": "foo " })),
            ("getClipboardContents", json!({ "clipboardContents": null })),
        ]);
        assert!(host.has_selection().unwrap());
        assert_eq!(host.selected_text().unwrap(), "foo ");
        assert_eq!(host.clipboard_contents().unwrap(), "");
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let mut host = TableHost(vec![("getSelectedText", json!({ "other": 1 }))]);
        assert!(matches!(
            host.selected_text(),
            Err(HostError::MalformedReply(_))
        ));
    }

    #[test]
    fn test_unanswered_query_propagates() {
        let mut host = TableHost(vec![]);
        assert!(matches!(
            host.clipboard_contents(),
            Err(HostError::Disconnected)
        ));
    }
}
