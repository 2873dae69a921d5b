//! Core types for the keymap system: Keystroke, Modifiers, KeyCode
//!
//! A `Keystroke` is the canonical form of one physical key press. Its
//! `Display` impl is the canonical string used both as a binding-table key
//! fragment and for host-facing display.

use std::fmt;

/// Host modifier bits (Cocoa `NSEvent.modifierFlags`)
pub mod host_flags {
    pub const ALPHA_SHIFT: u32 = 1 << 16;
    pub const SHIFT: u32 = 1 << 17;
    pub const CONTROL: u32 = 1 << 18;
    pub const ALTERNATE: u32 = 1 << 19;
    pub const COMMAND: u32 = 1 << 20;
    pub const NUMERIC_PAD: u32 = 1 << 21;
    pub const HELP: u32 = 1 << 22;
    pub const FUNCTION: u32 = 1 << 23;
}

/// Modifier keys as a bitfield for efficient storage and comparison
///
/// Bit order is the canonical render order: `A C M S fn numpad`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const ALT: Modifiers = Modifiers(0b00_0001);
    pub const CONTROL: Modifiers = Modifiers(0b00_0010);
    pub const COMMAND: Modifiers = Modifiers(0b00_0100);
    pub const SHIFT: Modifiers = Modifiers(0b00_1000);
    pub const FUNCTION: Modifiers = Modifiers(0b01_0000);
    pub const NUMPAD: Modifiers = Modifiers(0b10_0000);

    /// Every modifier paired with its spec name, in canonical order
    const NAMED: [(Modifiers, &'static str, u32); 6] = [
        (Modifiers::ALT, "A", host_flags::ALTERNATE),
        (Modifiers::CONTROL, "C", host_flags::CONTROL),
        (Modifiers::COMMAND, "M", host_flags::COMMAND),
        (Modifiers::SHIFT, "S", host_flags::SHIFT),
        (Modifiers::FUNCTION, "fn", host_flags::FUNCTION),
        (Modifiers::NUMPAD, "numpad", host_flags::NUMERIC_PAD),
    ];

    /// Map the host's modifier bitmask to a modifier set
    ///
    /// Alpha-shift (caps lock) and help bits carry no binding meaning and are
    /// ignored.
    pub fn from_host_flags(flags: u32) -> Self {
        Self::NAMED
            .iter()
            .filter(|(_, _, bit)| flags & bit != 0)
            .fold(Modifiers::NONE, |acc, (m, _, _)| acc | *m)
    }

    /// Inverse of `from_host_flags`
    pub fn to_host_flags(self, include_shift: bool) -> u32 {
        Self::NAMED
            .iter()
            .filter(|(m, _, _)| self.contains(*m))
            .filter(|(m, _, _)| include_shift || *m != Modifiers::SHIFT)
            .fold(0, |acc, (_, _, bit)| acc | bit)
    }

    /// Parse a modifier name as written inside a `<...>` chord
    pub fn from_spec_name(name: &str) -> Option<Self> {
        match name {
            "A" | "a" => Some(Modifiers::ALT),
            "C" | "c" => Some(Modifiers::CONTROL),
            // `D` is Vim's spelling of the macOS command key
            "M" | "m" | "D" | "d" => Some(Modifiers::COMMAND),
            "S" | "s" => Some(Modifiers::SHIFT),
            _ => match name.to_ascii_lowercase().as_str() {
                "fn" => Some(Modifiers::FUNCTION),
                "numpad" => Some(Modifiers::NUMPAD),
                _ => None,
            },
        }
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & Self::ALT.0 != 0
    }

    #[inline]
    pub const fn control(self) -> bool {
        self.0 & Self::CONTROL.0 != 0
    }

    /// Check if the host's primary accelerator (command) is held
    #[inline]
    pub const fn command(self) -> bool {
        self.0 & Self::COMMAND.0 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & Self::SHIFT.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Remove every modifier in `other`
    #[inline]
    pub const fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Spec names of the held modifiers, in canonical order
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(m, _, _)| self.contains(*m))
            .map(|(_, name, _)| name)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

/// A key code representing a printable character or a named key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyCode {
    /// A character key (letters normalized to lowercase)
    Char(char),

    Enter,
    Tab,
    Space,
    Escape,
    Backspace,
    Delete,

    Up,
    Down,
    Left,
    Right,

    Home,
    End,
    PageUp,
    PageDown,

    /// No key at all: a bare modifier press
    None,
}

// Cocoa function-key characters (NSUpArrowFunctionKey and friends)
const UP_ARROW: char = '\u{F700}';
const DOWN_ARROW: char = '\u{F701}';
const LEFT_ARROW: char = '\u{F702}';
const RIGHT_ARROW: char = '\u{F703}';
const DELETE_FUNCTION: char = '\u{F728}';
const HOME_FUNCTION: char = '\u{F729}';
const END_FUNCTION: char = '\u{F72B}';
const PAGE_UP_FUNCTION: char = '\u{F72C}';
const PAGE_DOWN_FUNCTION: char = '\u{F72D}';

impl KeyCode {
    /// Readable name used inside `<...>`, for named keys only
    pub fn name(self) -> Option<&'static str> {
        match self {
            KeyCode::Char('<') => Some("lt"),
            KeyCode::Char(_) | KeyCode::None => None,
            KeyCode::Enter => Some("enter"),
            KeyCode::Tab => Some("tab"),
            KeyCode::Space => Some("space"),
            KeyCode::Escape => Some("esc"),
            KeyCode::Backspace => Some("backspace"),
            KeyCode::Delete => Some("del"),
            KeyCode::Up => Some("up"),
            KeyCode::Down => Some("down"),
            KeyCode::Left => Some("left"),
            KeyCode::Right => Some("right"),
            KeyCode::Home => Some("home"),
            KeyCode::End => Some("end"),
            KeyCode::PageUp => Some("pageup"),
            KeyCode::PageDown => Some("pagedown"),
        }
    }

    /// Parse a readable key name (case-insensitive)
    pub fn from_name(name: &str) -> Option<KeyCode> {
        let key = match name.to_ascii_lowercase().as_str() {
            "enter" | "cr" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Space,
            "esc" | "escape" => KeyCode::Escape,
            "backspace" | "bs" => KeyCode::Backspace,
            "del" | "delete" => KeyCode::Delete,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "lt" => KeyCode::Char('<'),
            _ => return None,
        };
        Some(key)
    }

    /// Map a raw host character to a key code
    ///
    /// With `control` held, ASCII control characters are mapped back to the
    /// letter that produced them (tab, enter and backspace keep their names).
    pub fn from_host_char(c: char, control: bool) -> KeyCode {
        match c {
            '\r' | '\n' => KeyCode::Enter,
            '\t' => KeyCode::Tab,
            ' ' => KeyCode::Space,
            '\u{1b}' => KeyCode::Escape,
            '\u{8}' | '\u{7f}' => KeyCode::Backspace,
            UP_ARROW => KeyCode::Up,
            DOWN_ARROW => KeyCode::Down,
            LEFT_ARROW => KeyCode::Left,
            RIGHT_ARROW => KeyCode::Right,
            DELETE_FUNCTION => KeyCode::Delete,
            HOME_FUNCTION => KeyCode::Home,
            END_FUNCTION => KeyCode::End,
            PAGE_UP_FUNCTION => KeyCode::PageUp,
            PAGE_DOWN_FUNCTION => KeyCode::PageDown,
            '\u{1}'..='\u{1a}' if control => KeyCode::Char((b'a' + (c as u8 - 1)) as char),
            c => KeyCode::Char(c),
        }
    }

    /// The character the host uses for this key
    pub fn host_char(self) -> Option<char> {
        let c = match self {
            KeyCode::Char(c) => c,
            KeyCode::Enter => '\r',
            KeyCode::Tab => '\t',
            KeyCode::Space => ' ',
            KeyCode::Escape => '\u{1b}',
            KeyCode::Backspace => '\u{7f}',
            KeyCode::Delete => DELETE_FUNCTION,
            KeyCode::Up => UP_ARROW,
            KeyCode::Down => DOWN_ARROW,
            KeyCode::Left => LEFT_ARROW,
            KeyCode::Right => RIGHT_ARROW,
            KeyCode::Home => HOME_FUNCTION,
            KeyCode::End => END_FUNCTION,
            KeyCode::PageUp => PAGE_UP_FUNCTION,
            KeyCode::PageDown => PAGE_DOWN_FUNCTION,
            KeyCode::None => return None,
        };
        Some(c)
    }

    /// Keys the host reports from its function-key range. Their events carry
    /// `fn`/`numpad` bits that are a hardware artifact, not user intent.
    pub fn is_function_key(self) -> bool {
        matches!(
            self,
            KeyCode::Up
                | KeyCode::Down
                | KeyCode::Left
                | KeyCode::Right
                | KeyCode::Delete
                | KeyCode::Home
                | KeyCode::End
                | KeyCode::PageUp
                | KeyCode::PageDown
        )
    }
}

/// Upper-case form of `c`, if it has a distinct single-char one
fn upper_case(c: char) -> Option<char> {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) if u != c => Some(u),
        _ => None,
    }
}

/// Lower-case form of `c`, if it has a distinct single-char one
fn lower_case(c: char) -> Option<char> {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) if l != c => Some(l),
        _ => None,
    }
}

/// A single keystroke: a key with modifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    /// Create a normalized keystroke
    ///
    /// An upper-case character becomes its lower-case form plus shift. Shift
    /// on a character without case is dropped, since the host has already
    /// applied it to the character (`$` rather than shift+`4`). Characters
    /// that stand for a named key (space, tab, escape) become that key.
    pub fn new(key: KeyCode, mods: Modifiers) -> Self {
        let key = match key {
            KeyCode::Char(c) => KeyCode::from_host_char(c, false),
            key => key,
        };
        match key {
            KeyCode::Char(c) => {
                if let Some(lower) = lower_case(c) {
                    Self {
                        key: KeyCode::Char(lower),
                        mods: mods | Modifiers::SHIFT,
                    }
                } else if upper_case(c).is_none() {
                    Self {
                        key,
                        mods: mods.without(Modifiers::SHIFT),
                    }
                } else {
                    Self { key, mods }
                }
            }
            _ => Self { key, mods },
        }
    }

    /// Create a keystroke with no modifiers (implicit shift still applies)
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::NONE)
    }

    /// Decode a raw host key event
    ///
    /// A missing character yields a bare modifier press (`KeyCode::None`),
    /// which is used for chord detection only and never matches a binding.
    pub fn decode(character: Option<char>, host_flags: u32) -> Self {
        let mut mods = Modifiers::from_host_flags(host_flags);
        let Some(c) = character else {
            return Self {
                key: KeyCode::None,
                mods,
            };
        };

        let key = KeyCode::from_host_char(c, mods.control());
        if key.is_function_key() {
            mods = mods.without(Modifiers::FUNCTION | Modifiers::NUMPAD);
        }
        Self::new(key, mods)
    }

    /// Whether this is a bare modifier press
    pub fn is_modifier_only(&self) -> bool {
        self.key == KeyCode::None
    }

    /// Convert back to the host's modifier bitmask
    ///
    /// Pass `include_shift = false` when the host encodes case through the
    /// character itself.
    pub fn to_modifier_bitmask(&self, include_shift: bool) -> u32 {
        self.mods.to_host_flags(include_shift)
    }

    /// Key as the host would display it: shifted letters upper-cased, named
    /// keys as their host character
    pub fn display_key(&self) -> String {
        match self.key {
            KeyCode::Char(c) if self.mods.shift() => upper_case(c).unwrap_or(c).to_string(),
            key => key.host_char().map(String::from).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (token, explicit) = match (self.key.name(), self.key) {
            (Some(name), _) => (name.to_string(), self.mods),
            (None, KeyCode::Char(c)) => {
                let shown = if self.mods.shift() {
                    upper_case(c).unwrap_or(c)
                } else {
                    c
                };
                (shown.to_string(), self.mods.without(Modifiers::SHIFT))
            }
            (None, _) => (String::new(), self.mods),
        };

        if explicit.is_empty() {
            return match self.key.name() {
                Some(_) => write!(f, "<{}>", token),
                None => f.write_str(&token),
            };
        }

        f.write_str("<")?;
        for name in explicit.names() {
            write!(f, "{}-", name)?;
        }
        write!(f, "{}>", token)
    }
}
