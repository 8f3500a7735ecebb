// Keyswap Shortcut Matcher
// Exact-match decision for a proposed pressed-key set

use crate::modifier::is_modifier;
use crate::tables::{RemapTables, ShortcutRemaps};
use crate::{Key, RemapTarget, Shortcut};

/// Which collection produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableClass {
    AppSpecific,
    Global,
    SingleKey,
}

/// Result of a successful lookup
#[derive(Debug, Clone, PartialEq)]
pub enum RemapMatch {
    Shortcut {
        class: TableClass,
        source: Shortcut,
        target: RemapTarget,
    },
    SingleKey {
        source: Key,
        target: RemapTarget,
    },
}

impl RemapMatch {
    pub fn class(&self) -> TableClass {
        match self {
            RemapMatch::Shortcut { class, .. } => *class,
            RemapMatch::SingleKey { .. } => TableClass::SingleKey,
        }
    }

    pub fn target(&self) -> &RemapTarget {
        match self {
            RemapMatch::Shortcut { target, .. } | RemapMatch::SingleKey { target, .. } => target,
        }
    }
}

/// How a key release relates to an active shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// The shortcut's action key went up: the match is released
    ActionKey,
    /// One of its modifiers went up: the set no longer fully matches
    Modifier,
    /// Not part of the shortcut
    Unrelated,
}

/// First configured shortcut whose key set exactly equals `pressed`.
///
/// Registration order breaks ties; validated tables never contain two
/// entries that match the same set.
pub fn find_shortcut<'a>(
    pressed: &[Key],
    remaps: &'a ShortcutRemaps,
) -> Option<(&'a Shortcut, &'a RemapTarget)> {
    remaps.iter().find(|(source, _)| source.matches_pressed(pressed))
}

/// Look `pressed` up in the shortcuts of the foreground application
pub fn match_app_shortcut(pressed: &[Key], app: &str, tables: &RemapTables) -> Option<RemapMatch> {
    let remaps = tables.app_shortcuts_for(app)?;
    find_shortcut(pressed, remaps).map(|(source, target)| RemapMatch::Shortcut {
        class: TableClass::AppSpecific,
        source: *source,
        target: *target,
    })
}

/// Look `pressed` up in the global shortcuts
pub fn match_global_shortcut(pressed: &[Key], tables: &RemapTables) -> Option<RemapMatch> {
    find_shortcut(pressed, &tables.global_shortcuts).map(|(source, target)| {
        RemapMatch::Shortcut {
            class: TableClass::Global,
            source: *source,
            target: *target,
        }
    })
}

/// Look a single key up
pub fn match_single_key(key: Key, tables: &RemapTables) -> Option<RemapMatch> {
    tables
        .single_key_target(key)
        .map(|target| RemapMatch::SingleKey {
            source: key,
            target: *target,
        })
}

/// Classify the release of `key` against a triggered shortcut
pub fn release_kind(source: &Shortcut, key: Key) -> ReleaseKind {
    if source.action_key() == Some(key) {
        ReleaseKind::ActionKey
    } else if is_modifier(key) && source.contains(key) {
        ReleaseKind::Modifier
    } else {
        ReleaseKind::Unrelated
    }
}
