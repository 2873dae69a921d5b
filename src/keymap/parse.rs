//! Parsing of human-readable key specs
//!
//! A keystroke spec is either one literal character (`"x"`, `"G"`) or a
//! bracketed chord (`"<C-M-y>"`, `"<esc>"`). A sequence spec is any mix of
//! the two, e.g. `"x<C-a>gg"`.

use crate::error::KeymapError;

use super::types::{KeyCode, Keystroke, Modifiers};

/// Parse a single keystroke spec
pub fn parse_spec(spec: &str) -> Result<Keystroke, KeymapError> {
    if let Some(inner) = spec.strip_prefix('<') {
        let inner = inner
            .strip_suffix('>')
            .ok_or_else(|| KeymapError::invalid_spec(spec, "unterminated '<'"))?;
        if inner.is_empty() || inner.contains('<') || inner.contains('>') {
            return Err(KeymapError::invalid_spec(spec, "malformed chord"));
        }
        return parse_chord(spec, inner);
    }

    let mut chars = spec.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Keystroke::char(c)),
        (None, _) => Err(KeymapError::invalid_spec(spec, "empty keystroke")),
        (Some(_), Some(_)) => Err(KeymapError::invalid_spec(
            spec,
            "a keystroke without <> must be a single character",
        )),
    }
}

/// Parse the inside of `<...>`: zero or more `mod-` prefixes, then the key
fn parse_chord(spec: &str, inner: &str) -> Result<Keystroke, KeymapError> {
    let (mods_part, key_part) = if inner == "-" {
        (None, "-")
    } else if let Some(mods) = inner.strip_suffix("--") {
        // "C--" binds the literal '-'
        (Some(mods), "-")
    } else {
        match inner.rsplit_once('-') {
            Some((mods, key)) => (Some(mods), key),
            None => (None, inner),
        }
    };

    let mut mods = Modifiers::NONE;
    for name in mods_part.into_iter().flat_map(|part| part.split('-')) {
        if name.is_empty() {
            return Err(KeymapError::invalid_spec(spec, "empty modifier"));
        }
        let modifier = Modifiers::from_spec_name(name).ok_or_else(|| {
            KeymapError::invalid_spec(spec, format!("unknown modifier {:?}", name))
        })?;
        mods = mods | modifier;
    }

    let mut chars = key_part.chars();
    let key = match (chars.next(), chars.next()) {
        (Some(c), None) => KeyCode::Char(c),
        _ => KeyCode::from_name(key_part).ok_or_else(|| {
            KeymapError::invalid_spec(spec, format!("unknown key {:?}", key_part))
        })?,
    };

    Ok(Keystroke::new(key, mods))
}

/// Split a multi-key spec into keystrokes, left to right
///
/// A `<...>` run is one chord; every other character is its own keystroke.
pub fn parse_sequence_spec(spec: &str) -> Result<Vec<Keystroke>, KeymapError> {
    let mut keystrokes = Vec::new();
    let mut rest = spec;

    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let end = rest
                .find('>')
                .ok_or_else(|| KeymapError::invalid_spec(spec, "unterminated '<'"))?;
            keystrokes.push(parse_spec(&rest[..=end])?);
            rest = &rest[end + 1..];
        } else {
            keystrokes.push(Keystroke::char(c));
            rest = &rest[c.len_utf8()..];
        }
    }

    if keystrokes.is_empty() {
        return Err(KeymapError::invalid_spec(spec, "empty sequence"));
    }
    Ok(keystrokes)
}

/// Concatenate canonical forms: the binding-table lookup key
pub fn join_canonical(sequence: &[Keystroke]) -> String {
    sequence.iter().map(|k| k.to_string()).collect()
}
