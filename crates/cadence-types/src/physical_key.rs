use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// A single physical key on the keyboard.
///
/// Left/right modifier variants are folded by the keyboard backend, so a
/// chord only ever names `Ctrl`, `Shift` or `Alt`. Declaration order is the
/// sort order, which puts modifiers first when a chord is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PhysicalKey {
    Ctrl,
    Shift,
    Alt,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Minus,
    Equals,
    Comma,
    Period,
    Slash,
}

impl PhysicalKey {
    pub const ALL: &'static [PhysicalKey] = &[
        PhysicalKey::Ctrl,
        PhysicalKey::Shift,
        PhysicalKey::Alt,
        PhysicalKey::A,
        PhysicalKey::B,
        PhysicalKey::C,
        PhysicalKey::D,
        PhysicalKey::E,
        PhysicalKey::F,
        PhysicalKey::G,
        PhysicalKey::H,
        PhysicalKey::I,
        PhysicalKey::J,
        PhysicalKey::K,
        PhysicalKey::L,
        PhysicalKey::M,
        PhysicalKey::N,
        PhysicalKey::O,
        PhysicalKey::P,
        PhysicalKey::Q,
        PhysicalKey::R,
        PhysicalKey::S,
        PhysicalKey::T,
        PhysicalKey::U,
        PhysicalKey::V,
        PhysicalKey::W,
        PhysicalKey::X,
        PhysicalKey::Y,
        PhysicalKey::Z,
        PhysicalKey::Num0,
        PhysicalKey::Num1,
        PhysicalKey::Num2,
        PhysicalKey::Num3,
        PhysicalKey::Num4,
        PhysicalKey::Num5,
        PhysicalKey::Num6,
        PhysicalKey::Num7,
        PhysicalKey::Num8,
        PhysicalKey::Num9,
        PhysicalKey::F1,
        PhysicalKey::F2,
        PhysicalKey::F3,
        PhysicalKey::F4,
        PhysicalKey::F5,
        PhysicalKey::F6,
        PhysicalKey::F7,
        PhysicalKey::F8,
        PhysicalKey::F9,
        PhysicalKey::F10,
        PhysicalKey::F11,
        PhysicalKey::F12,
        PhysicalKey::Up,
        PhysicalKey::Down,
        PhysicalKey::Left,
        PhysicalKey::Right,
        PhysicalKey::PageUp,
        PhysicalKey::PageDown,
        PhysicalKey::Home,
        PhysicalKey::End,
        PhysicalKey::Insert,
        PhysicalKey::Delete,
        PhysicalKey::Space,
        PhysicalKey::Enter,
        PhysicalKey::Escape,
        PhysicalKey::Tab,
        PhysicalKey::Backspace,
        PhysicalKey::Minus,
        PhysicalKey::Equals,
        PhysicalKey::Comma,
        PhysicalKey::Period,
        PhysicalKey::Slash,
    ];

    /// Canonical name used in configuration files and chord strings.
    pub fn name(self) -> &'static str {
        match self {
            PhysicalKey::Ctrl => "Ctrl",
            PhysicalKey::Shift => "Shift",
            PhysicalKey::Alt => "Alt",
            PhysicalKey::A => "A",
            PhysicalKey::B => "B",
            PhysicalKey::C => "C",
            PhysicalKey::D => "D",
            PhysicalKey::E => "E",
            PhysicalKey::F => "F",
            PhysicalKey::G => "G",
            PhysicalKey::H => "H",
            PhysicalKey::I => "I",
            PhysicalKey::J => "J",
            PhysicalKey::K => "K",
            PhysicalKey::L => "L",
            PhysicalKey::M => "M",
            PhysicalKey::N => "N",
            PhysicalKey::O => "O",
            PhysicalKey::P => "P",
            PhysicalKey::Q => "Q",
            PhysicalKey::R => "R",
            PhysicalKey::S => "S",
            PhysicalKey::T => "T",
            PhysicalKey::U => "U",
            PhysicalKey::V => "V",
            PhysicalKey::W => "W",
            PhysicalKey::X => "X",
            PhysicalKey::Y => "Y",
            PhysicalKey::Z => "Z",
            PhysicalKey::Num0 => "0",
            PhysicalKey::Num1 => "1",
            PhysicalKey::Num2 => "2",
            PhysicalKey::Num3 => "3",
            PhysicalKey::Num4 => "4",
            PhysicalKey::Num5 => "5",
            PhysicalKey::Num6 => "6",
            PhysicalKey::Num7 => "7",
            PhysicalKey::Num8 => "8",
            PhysicalKey::Num9 => "9",
            PhysicalKey::F1 => "F1",
            PhysicalKey::F2 => "F2",
            PhysicalKey::F3 => "F3",
            PhysicalKey::F4 => "F4",
            PhysicalKey::F5 => "F5",
            PhysicalKey::F6 => "F6",
            PhysicalKey::F7 => "F7",
            PhysicalKey::F8 => "F8",
            PhysicalKey::F9 => "F9",
            PhysicalKey::F10 => "F10",
            PhysicalKey::F11 => "F11",
            PhysicalKey::F12 => "F12",
            PhysicalKey::Up => "Up",
            PhysicalKey::Down => "Down",
            PhysicalKey::Left => "Left",
            PhysicalKey::Right => "Right",
            PhysicalKey::PageUp => "PageUp",
            PhysicalKey::PageDown => "PageDown",
            PhysicalKey::Home => "Home",
            PhysicalKey::End => "End",
            PhysicalKey::Insert => "Insert",
            PhysicalKey::Delete => "Delete",
            PhysicalKey::Space => "Space",
            PhysicalKey::Enter => "Enter",
            PhysicalKey::Escape => "Escape",
            PhysicalKey::Tab => "Tab",
            PhysicalKey::Backspace => "Backspace",
            PhysicalKey::Minus => "Minus",
            PhysicalKey::Equals => "Equals",
            PhysicalKey::Comma => "Comma",
            PhysicalKey::Period => "Period",
            PhysicalKey::Slash => "Slash",
        }
    }

    /// Look up a key by name. Case-insensitive; accepts a few common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let alias = match name.to_ascii_lowercase().as_str() {
            "control" => Some(PhysicalKey::Ctrl),
            "esc" => Some(PhysicalKey::Escape),
            "return" => Some(PhysicalKey::Enter),
            "del" => Some(PhysicalKey::Delete),
            "pgup" => Some(PhysicalKey::PageUp),
            "pgdn" | "pgdown" => Some(PhysicalKey::PageDown),
            _ => None,
        };
        alias.or_else(|| {
            Self::ALL
                .iter()
                .copied()
                .find(|key| key.name().eq_ignore_ascii_case(name))
        })
    }

    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            PhysicalKey::Ctrl | PhysicalKey::Shift | PhysicalKey::Alt
        )
    }
}

impl fmt::Display for PhysicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PhysicalKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| anyhow!("unknown key name: {:?}", s))
    }
}

impl TryFrom<String> for PhysicalKey {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PhysicalKey> for String {
    fn from(key: PhysicalKey) -> Self {
        key.name().to_string()
    }
}
