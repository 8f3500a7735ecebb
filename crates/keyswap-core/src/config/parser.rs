// Keyswap Config Parser - TOML with Serde
// Loads and saves the persisted remap configuration

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::key_parser::{parse_key, parse_key_list};
use crate::tables::RemapTables;
use crate::validate::{Column, RemapBuffer, RemapRow};
use crate::{Key, RemapTarget, Shortcut};

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid shortcut: {0}")]
    InvalidShortcut(String),
}

/// A key list: `["CTRL", "A"]` or `"Ctrl+A"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyList {
    Names(Vec<String>),
    Joined(String),
}

impl KeyList {
    pub fn parse(&self) -> Result<Vec<Key>, ConfigError> {
        match self {
            KeyList::Names(names) => names.iter().map(|name| parse_key(name)).collect(),
            KeyList::Joined(list) => parse_key_list(list),
        }
    }

    fn from_keys(keys: impl IntoIterator<Item = Key>) -> Self {
        KeyList::Names(keys.into_iter().map(|k| k.name().to_string()).collect())
    }

    fn from_target(target: &RemapTarget) -> Self {
        match target {
            RemapTarget::Disabled => KeyList::Joined(Key::DISABLED.name().to_string()),
            _ => Self::from_keys(target.keys()),
        }
    }
}

/// `[[single_key]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SingleKeyEntry {
    pub source: KeyList,
    pub target: KeyList,
}

/// `[[global_shortcut]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShortcutEntry {
    pub source: KeyList,
    pub target: KeyList,
}

/// `[[app_shortcut]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppShortcutEntry {
    pub app: String,
    pub source: KeyList,
    pub target: KeyList,
}

/// Root of the persisted configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemapConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub single_key: Vec<SingleKeyEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_shortcut: Vec<ShortcutEntry>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub app_shortcut: Vec<AppShortcutEntry>,
}

impl RemapConfig {
    /// Parse configuration from a TOML file
    pub fn from_toml_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::TomlSerialize(e.to_string()))
    }

    /// Write the configuration, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml()?)?;
        log::debug!("saved {} remap(s) to {}", self.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.single_key.len() + self.global_shortcut.len() + self.app_shortcut.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the entries into an editor buffer.
    ///
    /// Only key names and the source shape of each section are checked here;
    /// everything else is left to the validator so it can report per row.
    pub fn to_buffer(&self) -> Result<RemapBuffer, ConfigError> {
        let mut buffer = RemapBuffer::new();
        for entry in &self.single_key {
            let source = entry.source.parse()?;
            if source.len() != 1 {
                return Err(ConfigError::InvalidShortcut(format!(
                    "single-key source must be one key, got {:?}",
                    entry.source
                )));
            }
            buffer.push(RemapRow::new(
                Column::from_keys(&source),
                Column::from_keys(&entry.target.parse()?),
            ));
        }
        for entry in &self.global_shortcut {
            buffer.push(shortcut_row(&entry.source, &entry.target)?);
        }
        for entry in &self.app_shortcut {
            buffer.push(shortcut_row(&entry.source, &entry.target)?.with_app(entry.app.clone()));
        }
        Ok(buffer)
    }

    /// Snapshot committed tables with canonical key names
    pub fn from_tables(tables: &RemapTables) -> Self {
        let shortcut_entry = |source: &Shortcut, target: &RemapTarget| ShortcutEntry {
            source: KeyList::from_keys(source.keys()),
            target: KeyList::from_target(target),
        };
        Self {
            single_key: tables
                .single_key
                .iter()
                .map(|(source, target)| SingleKeyEntry {
                    source: KeyList::from_keys([*source]),
                    target: KeyList::from_target(target),
                })
                .collect(),
            global_shortcut: tables
                .global_shortcuts
                .iter()
                .map(|(source, target)| shortcut_entry(source, target))
                .collect(),
            app_shortcut: tables
                .app_shortcuts
                .iter()
                .flat_map(|(app, remaps)| {
                    remaps.iter().map(move |(source, target)| AppShortcutEntry {
                        app: app.clone(),
                        source: KeyList::from_keys(source.keys()),
                        target: KeyList::from_target(target),
                    })
                })
                .collect(),
        }
    }

    /// `<config dir>/keyswap/remaps.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("keyswap").join("remaps.toml"))
    }
}

fn shortcut_row(source: &KeyList, target: &KeyList) -> Result<RemapRow, ConfigError> {
    let keys = source.parse()?;
    if keys.len() < 2 {
        return Err(ConfigError::InvalidShortcut(format!(
            "shortcut source needs at least two keys, got {:?}",
            source
        )));
    }
    Ok(RemapRow::new(
        Column::from_keys(&keys),
        Column::from_keys(&target.parse()?),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{build_tables, validate_buffer};

    const SAMPLE: &str = r#"
[[single_key]]
source = "CAPSLOCK"
target = ["LEFT_CTRL"]

[[single_key]]
source = "INSERT"
target = "DISABLED"

[[global_shortcut]]
source = ["CTRL", "A"]
target = ["ALT", "V"]

[[app_shortcut]]
app = "firefox"
source = "Ctrl+T"
target = "Ctrl+N"
"#;

    #[test]
    fn test_parse_sample() {
        let config = RemapConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.len(), 4);
        assert_eq!(config.app_shortcut[0].app, "firefox");

        let buffer = config.to_buffer().unwrap();
        assert_eq!(buffer.len(), 4);
        assert!(validate_buffer(&buffer).is_ok());

        let tables = build_tables(&buffer);
        assert_eq!(
            tables.single_key_target(Key::CAPSLOCK),
            Some(&RemapTarget::Key(Key::LEFT_CTRL))
        );
        assert_eq!(tables.single_key_target(Key::INSERT), Some(&RemapTarget::Disabled));
        assert!(tables.app_shortcuts_for("Firefox").is_some());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RemapConfig::from_toml("[[single_key]]\nsource = \"A\"\ntarget = \"B\"\nextra = 1\n");
        assert!(matches!(err, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_bad_key_name() {
        let config = RemapConfig::from_toml("[[single_key]]\nsource = \"A\"\ntarget = \"NOPE\"\n").unwrap();
        assert!(matches!(config.to_buffer(), Err(ConfigError::InvalidKey(name)) if name == "NOPE"));
    }

    #[test]
    fn test_source_shape_checked() {
        let config =
            RemapConfig::from_toml("[[single_key]]\nsource = \"Ctrl+A\"\ntarget = \"B\"\n").unwrap();
        assert!(matches!(config.to_buffer(), Err(ConfigError::InvalidShortcut(_))));

        let config =
            RemapConfig::from_toml("[[global_shortcut]]\nsource = \"A\"\ntarget = \"B\"\n").unwrap();
        assert!(matches!(config.to_buffer(), Err(ConfigError::InvalidShortcut(_))));
    }

    #[test]
    fn test_malformed_rows_reach_the_validator() {
        let config =
            RemapConfig::from_toml("[[global_shortcut]]\nsource = \"Ctrl+A+B\"\ntarget = \"C\"\n")
                .unwrap();
        let report = validate_buffer(&config.to_buffer().unwrap());
        assert!(!report.is_ok());
    }

    #[test]
    fn test_from_tables_uses_canonical_names() {
        let config = RemapConfig::from_toml(SAMPLE).unwrap();
        let tables = build_tables(&config.to_buffer().unwrap());
        let saved = RemapConfig::from_tables(&tables);

        assert_eq!(
            saved.single_key[0].target,
            KeyList::Names(vec!["LEFT_CTRL".to_string()])
        );
        assert_eq!(saved.single_key[1].target, KeyList::Joined("DISABLED".to_string()));
        assert_eq!(
            saved.global_shortcut[0].source,
            KeyList::Names(vec!["CTRL".to_string(), "A".to_string()])
        );
        assert_eq!(build_tables(&saved.to_buffer().unwrap()), tables);
    }

    #[test]
    fn test_empty_config_serializes_empty() {
        let config = RemapConfig::default();
        assert!(config.to_toml().unwrap().trim().is_empty());
        assert_eq!(RemapConfig::from_toml("").unwrap(), config);
    }
}
