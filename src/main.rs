use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use vimbridge::cli::CliArgs;
use vimbridge::keymap::load_default_keymap;
use vimbridge::protocol::{keybindings_reply, Transport};
use vimbridge::{Dispatcher, DispatcherConfig, Session};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    vimbridge::tracing::init();

    let config = match &args.config {
        Some(path) => DispatcherConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DispatcherConfig::load(),
    };

    let loaded = load_default_keymap(args.keymap.as_deref());

    if args.check {
        for (path, e) in &loaded.errors {
            eprintln!("{}: {}", path.display(), e);
        }
        if let Some((path, e)) = loaded.errors.into_iter().next() {
            return Err(e).with_context(|| format!("invalid keymap {}", path.display()));
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&keybindings_reply(&loaded.table))?
        );
        return Ok(());
    }

    // Rejected layers were already logged; run with whatever loaded
    let table = loaded.table;
    tracing::info!(
        bindings = table.len(),
        longest = table.longest_sequence(),
        "keymap ready"
    );

    let dispatcher = Dispatcher::new(Arc::new(table), config);
    let transport = Transport::new(io::stdin().lock(), io::stdout().lock());

    let extra = args.keymap.clone();
    let loader = Box::new(move || {
        let loaded = load_default_keymap(extra.as_deref());
        match loaded.errors.into_iter().next() {
            Some((_, e)) => Err(e),
            None => Ok(loaded.table),
        }
    });

    let mut session = Session::new(dispatcher, transport, loader);
    if let Err(e) = session.run() {
        tracing::error!("Host connection lost: {}", e);
        return Err(e).context("host connection failed");
    }
    Ok(())
}
