// Keyswap Key Action
// Direction of a key event

use std::fmt;

/// Direction of a key event.
///
/// Discriminants follow the evdev `value` field: 0 up, 1 down, 2 autorepeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum KeyAction {
    Up = 0,
    Down = 1,
    Repeat = 2,
}

impl KeyAction {
    /// Down or autorepeat
    pub fn is_down(self) -> bool {
        matches!(self, KeyAction::Down | KeyAction::Repeat)
    }

    pub fn is_up(self) -> bool {
        matches!(self, KeyAction::Up)
    }

    /// Map an evdev event value
    pub fn from_evdev_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(KeyAction::Up),
            1 => Some(KeyAction::Down),
            2 => Some(KeyAction::Repeat),
            _ => None,
        }
    }

    pub fn evdev_value(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Up => write!(f, "up"),
            KeyAction::Down => write!(f, "down"),
            KeyAction::Repeat => write!(f, "repeat"),
        }
    }
}
