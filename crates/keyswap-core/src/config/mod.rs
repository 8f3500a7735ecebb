// Keyswap Config API
// Persisted remap configuration

pub mod key_parser;
pub mod parser;

pub use key_parser::{format_key_list, parse_key, parse_key_list, parse_shortcut, parse_target};
pub use parser::{AppShortcutEntry, ConfigError, KeyList, RemapConfig, ShortcutEntry, SingleKeyEntry};
