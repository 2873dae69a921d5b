//! The coprocess loop: read a host line, answer it, repeat until EOF

use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::commands::KeyResponse;
use crate::dispatcher::Dispatcher;
use crate::error::{DispatchError, HostError, KeymapError};
use crate::keymap::BindingTable;
use crate::protocol::{
    keybindings_reply, parse_inbound, HostMessage, Inbound, ReloadStatus, Transport,
};

/// Rebuilds the keymap on `reloadKeymap`
pub type KeymapLoader = Box<dyn FnMut() -> Result<BindingTable, KeymapError>>;

/// One host connection
pub struct Session<R, W> {
    dispatcher: Dispatcher,
    transport: Transport<R, W>,
    loader: KeymapLoader,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(dispatcher: Dispatcher, transport: Transport<R, W>, loader: KeymapLoader) -> Self {
        Self {
            dispatcher,
            transport,
            loader,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn transport(&self) -> &Transport<R, W> {
        &self.transport
    }

    /// Serve until the host closes its end
    ///
    /// Returns an error only when the connection broke mid-exchange.
    pub fn run(&mut self) -> Result<(), DispatchError> {
        loop {
            let line = match self.transport.read_line().map_err(HostError::from)? {
                Some(line) => line.to_string(),
                None => {
                    tracing::info!("Host closed input, shutting down");
                    return Ok(());
                }
            };
            self.handle_line(&line)?;
        }
    }

    /// Answer one inbound line
    pub fn handle_line(&mut self, line: &str) -> Result<(), DispatchError> {
        match parse_inbound(line) {
            Ok(Inbound::Key(event)) => {
                let response = self.dispatcher.handle_key(&event, &mut self.transport)?;
                self.write(&response)
            }
            Ok(Inbound::Message(HostMessage::GetKeybindings)) => {
                let reply = keybindings_reply(self.dispatcher.keymap());
                self.write(&reply)
            }
            Ok(Inbound::Message(HostMessage::ReloadKeymap)) => {
                let status = self.reload_keymap();
                self.write(&status)
            }
            Err(e) => {
                // Never leave the host waiting on a reply
                tracing::warn!("Ignoring inbound line: {}", e);
                self.write(&KeyResponse::pass_through())
            }
        }
    }

    fn reload_keymap(&mut self) -> ReloadStatus {
        match (self.loader)() {
            Ok(table) => {
                tracing::info!("Reloaded keymap ({} bindings)", table.len());
                self.dispatcher.set_keymap(Arc::new(table));
                ReloadStatus::Ok
            }
            Err(e) => {
                tracing::warn!("Keymap reload failed, keeping current keymap: {}", e);
                ReloadStatus::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    fn write<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DispatchError> {
        self.transport
            .write_json(value)
            .map_err(|e| DispatchError::Host(HostError::Io(e)))
    }
}
