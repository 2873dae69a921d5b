//! Where vimbridge looks for `config.yaml`, `keymap.yaml` and its logs
//!
//! Unix/macOS use `$XDG_CONFIG_HOME/vimbridge` or `~/.config/vimbridge`;
//! Windows uses `%APPDATA%\vimbridge`.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use crate::error::ConfigError;

const APP_DIR: &str = "vimbridge";

/// Resolve the config directory from an explicit base override and a home
/// directory; the override wins
#[cfg_attr(target_os = "windows", allow(dead_code))]
fn resolve_config_dir(base: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    base.filter(|b| !b.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| h.join(".config")))
        .map(|base| base.join(APP_DIR))
}

pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        resolve_config_dir(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
    }
}

/// Dispatcher settings file
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// User keymap layer
pub fn keymap_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("keymap.yaml"))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf, ConfigError> {
    let logs = logs_dir().ok_or(ConfigError::NoConfigDir)?;
    fs::create_dir_all(&logs)
        .map_err(|e| ConfigError::Io(format!("{}: {}", logs.display(), e)))?;
    Ok(logs)
}
