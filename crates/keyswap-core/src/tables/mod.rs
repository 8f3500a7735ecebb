// Keyswap Remap Tables
// The committed single-key, global-shortcut and app-specific collections

mod store;

pub use store::RemapTableStore;

use indexmap::IndexMap;
use strum::IntoEnumIterator;

use crate::modifier::{common_of, ModifierFamily};
use crate::{Key, RemapTarget, Shortcut};

/// Shortcut remaps in registration order
pub type ShortcutRemaps = IndexMap<Shortcut, RemapTarget>;

/// One committed remap configuration.
///
/// Application names are stored lowercased; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemapTables {
    pub single_key: IndexMap<Key, RemapTarget>,
    pub global_shortcuts: ShortcutRemaps,
    pub app_shortcuts: IndexMap<String, ShortcutRemaps>,
}

impl RemapTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a single-key remap
    pub fn insert_single_key(&mut self, source: Key, target: RemapTarget) -> Option<RemapTarget> {
        self.single_key.insert(source, target)
    }

    /// Add (or replace) a global shortcut remap
    pub fn insert_global_shortcut(
        &mut self,
        source: Shortcut,
        target: RemapTarget,
    ) -> Option<RemapTarget> {
        self.global_shortcuts.insert(source, target)
    }

    /// Add (or replace) a shortcut remap scoped to `app`
    pub fn insert_app_shortcut(
        &mut self,
        app: &str,
        source: Shortcut,
        target: RemapTarget,
    ) -> Option<RemapTarget> {
        self.app_shortcuts
            .entry(app.to_lowercase())
            .or_default()
            .insert(source, target)
    }

    /// Target for a single key: the exact entry first, then the entry of the
    /// key's common modifier alias
    pub fn single_key_target(&self, key: Key) -> Option<&RemapTarget> {
        self.single_key.get(&key).or_else(|| {
            common_of(key)
                .filter(|common| *common != key)
                .and_then(|common| self.single_key.get(&common))
        })
    }

    /// Shortcut remaps for a foreground application, matched case-insensitively
    pub fn app_shortcuts_for(&self, app: &str) -> Option<&ShortcutRemaps> {
        self.app_shortcuts
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(app))
            .map(|(_, remaps)| remaps)
    }

    pub fn has_app_shortcuts(&self) -> bool {
        self.app_shortcuts.values().any(|remaps| !remaps.is_empty())
    }

    /// Total number of remaps across the three collections
    pub fn len(&self) -> usize {
        self.single_key.len()
            + self.global_shortcuts.len()
            + self.app_shortcuts.values().map(|m| m.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collapse left/right single-key pairs with identical targets into one
    /// common-modifier entry, so the runtime tracks one entry per family.
    ///
    /// Idempotent. Returns the number of families collapsed.
    pub fn pre_process(&mut self) -> usize {
        let mut collapsed = 0;
        for family in ModifierFamily::iter() {
            let common = family.common_key();
            if self.single_key.contains_key(&common) {
                continue;
            }
            let (left, right) = (family.left_key(), family.right_key());
            let target = match (self.single_key.get(&left), self.single_key.get(&right)) {
                (Some(l), Some(r)) if l == r => *l,
                _ => continue,
            };
            self.single_key.shift_remove(&left);
            self.single_key.shift_remove(&right);
            self.single_key.insert(common, target);
            collapsed += 1;
        }
        if collapsed > 0 {
            log::debug!("pre-process collapsed {} left/right modifier pair(s)", collapsed);
        }
        collapsed
    }
}
