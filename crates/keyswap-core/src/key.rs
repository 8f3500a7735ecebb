// Keyswap Key Type
// Represents a single key code: Linux input-event-codes plus common-modifier aliases

use std::fmt;
use std::str::FromStr;

include!(concat!(env!("OUT_DIR"), "/key_codes.rs"));

/// Size of the dense key space. Every `Key` the engine handles is below this.
pub const KEY_COUNT: usize = 0x300;

impl Key {
    /// True for keys that index into the dense key space
    pub const fn in_range(self) -> bool {
        (self.0 as usize) < KEY_COUNT
    }

    /// True for the side-agnostic modifier aliases (`CTRL`, `SHIFT`, `ALT`, `META`)
    pub const fn is_common_modifier(self) -> bool {
        matches!(self.0, 0x2f0..=0x2f3)
    }

    /// True for codes a physical keyboard can produce
    pub const fn is_physical(self) -> bool {
        self.0 != 0 && self.0 < 0x2f0
    }
}

/// Try to parse a key name to a key code
///
/// Accepts the canonical names (`LEFT_CTRL`, `A`, `KEY_1`) case-insensitively,
/// plus the usual aliases (`Ctrl`, `Win`, `LShift`, `Esc`, `1`, `Del`).
pub fn key_from_name(name: &str) -> Option<Key> {
    let upper = name.trim().to_uppercase();
    if let Some(code) = canonical_code(&upper) {
        return Some(Key(code));
    }
    let code = match upper.as_str() {
        "ESCAPE" => 1,
        "1" => 2,
        "2" => 3,
        "3" => 4,
        "4" => 5,
        "5" => 6,
        "6" => 7,
        "7" => 8,
        "8" => 9,
        "9" => 10,
        "0" => 11,
        "RETURN" => 28,
        "LCTRL" | "LCONTROL" | "L_CONTROL" => 29,
        "RCTRL" | "RCONTROL" | "R_CONTROL" => 97,
        "LSHIFT" | "L_SHIFT" => 42,
        "RSHIFT" | "R_SHIFT" => 54,
        "LALT" | "L_ALT" | "LOPT" => 56,
        "RALT" | "R_ALT" | "ROPT" | "ALTGR" => 100,
        "LWIN" | "LSUPER" | "LMETA" | "LCMD" | "L_META" => 125,
        "RWIN" | "RSUPER" | "RMETA" | "RCMD" | "R_META" => 126,
        "CONTROL" => 0x2f0,
        "OPT" | "OPTION" => 0x2f2,
        "WIN" | "SUPER" | "CMD" | "COMMAND" => 0x2f3,
        "DEL" => 111,
        "INS" => 110,
        "PGUP" => 104,
        "PGDN" => 109,
        "PRINT" | "PRTSCR" => 99,
        "NONE" | "DISABLE" => 0x2ff,
        _ => return None,
    };
    Some(Key(code))
}
