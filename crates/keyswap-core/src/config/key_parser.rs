// Keyswap Config API - Key List Parser
// Parses key lists like "Ctrl+Shift+A" into keys, shortcuts and targets

use std::sync::OnceLock;

use regex::Regex;

use super::parser::ConfigError;
use crate::key::key_from_name;
use crate::shortcut::display_key;
use crate::{Key, RemapTarget, Shortcut};

fn key_list_re() -> &'static Regex {
    static KEY_LIST_RE: OnceLock<Regex> = OnceLock::new();
    KEY_LIST_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_]+(?:\s*\+\s*[A-Za-z0-9_]+)*$")
            .expect("key list regex must compile")
    })
}

/// Parse one key name (canonical names and common aliases, any case)
pub fn parse_key(name: &str) -> Result<Key, ConfigError> {
    let trimmed = name.trim();
    key_from_name(trimmed).ok_or_else(|| ConfigError::InvalidKey(trimmed.to_string()))
}

/// Parse a `+`-joined key list such as `"Ctrl+Shift+A"` or `"LWin + L"`
pub fn parse_key_list(list: &str) -> Result<Vec<Key>, ConfigError> {
    let trimmed = list.trim();
    if !key_list_re().is_match(trimmed) {
        return Err(ConfigError::InvalidShortcut(trimmed.to_string()));
    }
    trimmed.split('+').map(parse_key).collect()
}

/// Build a shortcut from parsed keys
pub fn parse_shortcut(keys: &[Key]) -> Result<Shortcut, ConfigError> {
    Shortcut::from_keys(keys.iter().copied())
        .map_err(|e| ConfigError::InvalidShortcut(format!("{}: {}", format_key_list(keys), e)))
}

/// Build a remap target: one key (possibly `DISABLED`) or a shortcut
pub fn parse_target(keys: &[Key]) -> Result<RemapTarget, ConfigError> {
    match keys {
        [] => Err(ConfigError::InvalidShortcut(String::new())),
        [key] => Ok(RemapTarget::from(*key)),
        _ => parse_shortcut(keys).map(RemapTarget::Shortcut),
    }
}

/// Display form of a key list, e.g. `"Ctrl+LShift+A"`
pub fn format_key_list(keys: &[Key]) -> String {
    keys.iter()
        .map(|k| display_key(*k))
        .collect::<Vec<_>>()
        .join("+")
}
