//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Vim-style modal keystroke interpreter, run as a host editor coprocess
#[derive(Parser, Debug)]
#[command(
    name = "vimbridge",
    version,
    about = "Vim-style modal keystroke interpreter for a host editor"
)]
pub struct CliArgs {
    /// Extra keymap file, applied over the default and user keymaps
    #[arg(short = 'k', long, value_name = "PATH")]
    pub keymap: Option<PathBuf>,

    /// Dispatcher settings file (default: ~/.config/vimbridge/config.yaml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate the keymap, print the bound keys as JSON, and exit
    #[arg(long)]
    pub check: bool,
}
