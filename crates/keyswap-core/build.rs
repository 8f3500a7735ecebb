use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// (name, code) pairs. Physical codes follow Linux input-event-codes.h; the
/// 0x2F0 block holds the side-agnostic modifier aliases and the disable sentinel.
const KEY_TABLE: &[(&str, u16)] = &[
    ("RESERVED", 0),
    ("ESC", 1),
    ("KEY_1", 2),
    ("KEY_2", 3),
    ("KEY_3", 4),
    ("KEY_4", 5),
    ("KEY_5", 6),
    ("KEY_6", 7),
    ("KEY_7", 8),
    ("KEY_8", 9),
    ("KEY_9", 10),
    ("KEY_0", 11),
    ("MINUS", 12),
    ("EQUAL", 13),
    ("BACKSPACE", 14),
    ("TAB", 15),
    ("Q", 16),
    ("W", 17),
    ("E", 18),
    ("R", 19),
    ("T", 20),
    ("Y", 21),
    ("U", 22),
    ("I", 23),
    ("O", 24),
    ("P", 25),
    ("LEFT_BRACE", 26),
    ("RIGHT_BRACE", 27),
    ("ENTER", 28),
    ("LEFT_CTRL", 29),
    ("A", 30),
    ("S", 31),
    ("D", 32),
    ("F", 33),
    ("G", 34),
    ("H", 35),
    ("J", 36),
    ("K", 37),
    ("L", 38),
    ("SEMICOLON", 39),
    ("APOSTROPHE", 40),
    ("GRAVE", 41),
    ("LEFT_SHIFT", 42),
    ("BACKSLASH", 43),
    ("Z", 44),
    ("X", 45),
    ("C", 46),
    ("V", 47),
    ("B", 48),
    ("N", 49),
    ("M", 50),
    ("COMMA", 51),
    ("DOT", 52),
    ("SLASH", 53),
    ("RIGHT_SHIFT", 54),
    ("KPASTERISK", 55),
    ("LEFT_ALT", 56),
    ("SPACE", 57),
    ("CAPSLOCK", 58),
    ("F1", 59),
    ("F2", 60),
    ("F3", 61),
    ("F4", 62),
    ("F5", 63),
    ("F6", 64),
    ("F7", 65),
    ("F8", 66),
    ("F9", 67),
    ("F10", 68),
    ("NUMLOCK", 69),
    ("SCROLLLOCK", 70),
    ("KP7", 71),
    ("KP8", 72),
    ("KP9", 73),
    ("KPMINUS", 74),
    ("KP4", 75),
    ("KP5", 76),
    ("KP6", 77),
    ("KPPLUS", 78),
    ("KP1", 79),
    ("KP2", 80),
    ("KP3", 81),
    ("KP0", 82),
    ("KPDOT", 83),
    ("KEY_102ND", 86),
    ("F11", 87),
    ("F12", 88),
    ("KPENTER", 96),
    ("RIGHT_CTRL", 97),
    ("KPSLASH", 98),
    ("SYSRQ", 99),
    ("RIGHT_ALT", 100),
    ("HOME", 102),
    ("UP", 103),
    ("PAGE_UP", 104),
    ("LEFT", 105),
    ("RIGHT", 106),
    ("END", 107),
    ("DOWN", 108),
    ("PAGE_DOWN", 109),
    ("INSERT", 110),
    ("DELETE", 111),
    ("MUTE", 113),
    ("VOLUMEDOWN", 114),
    ("VOLUMEUP", 115),
    ("KPEQUAL", 117),
    ("PAUSE", 119),
    ("LEFT_META", 125),
    ("RIGHT_META", 126),
    ("COMPOSE", 127),
    ("MENU", 139),
    ("NEXTSONG", 163),
    ("PLAYPAUSE", 164),
    ("PREVIOUSSONG", 165),
    ("STOPCD", 166),
    ("F13", 183),
    ("F14", 184),
    ("F15", 185),
    ("F16", 186),
    ("F17", 187),
    ("F18", 188),
    ("F19", 189),
    ("F20", 190),
    ("F21", 191),
    ("F22", 192),
    ("F23", 193),
    ("F24", 194),
    ("CTRL", 0x2f0),
    ("SHIFT", 0x2f1),
    ("ALT", 0x2f2),
    ("META", 0x2f3),
    ("DISABLED", 0x2ff),
];

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("key_codes.rs");
    let mut f = File::create(&dest_path).unwrap();

    writeln!(
        f,
        r#"
/// Represents a single keyboard key code.
///
/// This is a newtype wrapper around u16 for type safety.
/// Physical values match Linux input-event-codes.h definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Key(pub u16);

impl Key {{
    /// Get the raw numeric code value
    pub const fn code(self) -> u16 {{
        self.0
    }}

    /// Get the name of this key
    pub fn name(self) -> &'static str {{
        key_name(self.0)
    }}
"#
    )
    .unwrap();

    for (name, code) in KEY_TABLE {
        writeln!(f, "    pub const {}: Key = Key({});", name, code).unwrap();
    }
    writeln!(f, "}}").unwrap();

    writeln!(f, "\n/// Canonical name for a key code\npub fn key_name(code: u16) -> &'static str {{\n    match code {{").unwrap();
    for (name, code) in KEY_TABLE {
        writeln!(f, "        {} => \"{}\",", code, name).unwrap();
    }
    writeln!(f, "        _ => \"UNKNOWN\",\n    }}\n}}").unwrap();

    writeln!(f, "\nfn canonical_code(name: &str) -> Option<u16> {{\n    match name {{").unwrap();
    for (name, code) in KEY_TABLE {
        writeln!(f, "        \"{}\" => Some({}),", name, code).unwrap();
    }
    writeln!(f, "        _ => None,\n    }}\n}}").unwrap();

    writeln!(
        f,
        r#"
impl From<u16> for Key {{
    fn from(code: u16) -> Self {{
        Key(code)
    }}
}}

impl From<Key> for u16 {{
    fn from(key: Key) -> Self {{
        key.0
    }}
}}

impl fmt::Display for Key {{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {{
        write!(f, "{{}}", self.name())
    }}
}}

impl FromStr for Key {{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {{
        key_from_name(s).ok_or_else(|| format!("Unknown key: {{}}", s))
    }}
}}
"#
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}
