//! Config and keymap files on disk

use std::io::Write;
use std::path::PathBuf;

use vimbridge::commands::Command;
use vimbridge::error::{ConfigError, KeymapError};
use vimbridge::keymap::{load_default_keymap, load_keymap_file, load_layered_keymap, Mode};
use vimbridge::DispatcherConfig;

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_temp("undo_depth: 10\nmax_repeat: 50\n");
    let config = DispatcherConfig::load_from(file.path()).unwrap();
    assert_eq!(config.undo_depth, 10);
    assert_eq!(config.max_repeat, 50);
    assert_eq!(config.max_queue_len, 32);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = DispatcherConfig::load_from(&dir.path().join("config.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_unknown_config_key_rejected() {
    let file = write_temp("undo_dept: 10\n");
    let err = DispatcherConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_keymap_file() {
    let file = write_temp(
        r#"
map:
  Q: [move_to_beginning_of_line, cut_to_end_of_line]
modes:
  - modes: [visual]
    map:
      "<C-c>": copy_selection
"#,
    );
    let table = load_keymap_file(file.path()).unwrap();
    assert_eq!(
        table.lookup(&Mode::Command, "Q").and_then(|t| t.commands()),
        Some(&[Command::MoveToBeginningOfLine, Command::CutToEndOfLine][..])
    );
    assert!(table.lookup(&Mode::Visual, "<C-c>").is_some());
}

#[test]
fn test_explicit_keymap_layer_wins() {
    let file = write_temp("map:\n  j: move_up\n");
    let loaded = load_default_keymap(Some(file.path()));
    assert!(loaded.is_clean());
    assert_eq!(
        loaded
            .table
            .lookup(&Mode::Command, "j")
            .and_then(|t| t.commands()),
        Some(&[Command::MoveUp][..])
    );
}

#[test]
fn test_bad_layer_keeps_earlier_layers() {
    let first = write_temp("map:\n  j: move_up\n");
    let second = write_temp("map:\n  \"<Q-j>\": move_down\n");
    let layers: Vec<PathBuf> = vec![first.path().into(), second.path().into()];

    let loaded = load_layered_keymap(&layers, None);
    assert_eq!(loaded.errors.len(), 1);
    assert!(matches!(
        loaded.errors[0].1,
        KeymapError::InvalidBindingSpec { .. }
    ));
    assert_eq!(
        loaded
            .table
            .lookup(&Mode::Command, "j")
            .and_then(|t| t.commands()),
        Some(&[Command::MoveUp][..])
    );
}
