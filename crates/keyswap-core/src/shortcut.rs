// Keyswap Shortcut Type
// An unordered set of 1-3 keys with at most one action key, plus remap targets

use std::fmt;

use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};

use crate::modifier::{classify, ModifierFamily, ModifierSide};
use crate::Key;

/// Maximum number of keys in a shortcut
pub const MAX_SHORTCUT_KEYS: usize = 3;

/// Minimum number of keys in a complete shortcut
pub const MIN_SHORTCUT_KEYS: usize = 2;

/// Errors raised while building a shortcut key by key
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutError {
    #[error("a shortcut holds at most {MAX_SHORTCUT_KEYS} keys")]
    TooManyKeys,

    #[error("a shortcut holds exactly one action key")]
    SecondActionKey,

    #[error("modifier family {0} is already part of the shortcut")]
    RepeatedModifier(ModifierFamily),

    #[error("key code {0} cannot be part of a shortcut")]
    InvalidKey(u16),
}

/// A key combination stored canonically: one optional side per modifier
/// family plus an optional action key.
///
/// Canonical storage makes equality and hashing independent of the order in
/// which keys were added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shortcut {
    modifiers: [Option<ModifierSide>; ModifierFamily::COUNT],
    action: Option<Key>,
}

impl Shortcut {
    /// Create an empty shortcut
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a shortcut from keys, rejecting anything `add_key` rejects
    pub fn from_keys(keys: impl IntoIterator<Item = Key>) -> Result<Self, ShortcutError> {
        let mut shortcut = Self::new();
        for key in keys {
            shortcut.add_key(key)?;
        }
        Ok(shortcut)
    }

    /// Add one key. A fourth key, a second action key or a second key from the
    /// same modifier family is rejected and leaves the shortcut unchanged.
    pub fn add_key(&mut self, key: Key) -> Result<(), ShortcutError> {
        if key.code() == 0 || !key.in_range() {
            return Err(ShortcutError::InvalidKey(key.code()));
        }
        if self.len() >= MAX_SHORTCUT_KEYS {
            return Err(ShortcutError::TooManyKeys);
        }
        match classify(key) {
            Some((family, side)) => {
                let slot = &mut self.modifiers[family.index()];
                if slot.is_some() {
                    return Err(ShortcutError::RepeatedModifier(family));
                }
                *slot = Some(side);
            }
            None => {
                if self.action.is_some() {
                    return Err(ShortcutError::SecondActionKey);
                }
                self.action = Some(key);
            }
        }
        Ok(())
    }

    /// Number of keys in the shortcut
    pub fn len(&self) -> usize {
        self.modifier_count() + usize::from(self.action.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.iter().filter(|m| m.is_some()).count()
    }

    /// The action key, if one was added
    pub fn action_key(&self) -> Option<Key> {
        self.action
    }

    /// Side of `family` required by this shortcut
    pub fn modifier_side(&self, family: ModifierFamily) -> Option<ModifierSide> {
        self.modifiers[family.index()]
    }

    /// Iterate over the modifier keys, in display order
    pub fn modifier_keys(&self) -> impl Iterator<Item = Key> + '_ {
        ModifierFamily::iter()
            .filter_map(move |family| self.modifier_side(family).map(|side| family.key_for(side)))
    }

    /// All keys: modifiers in display order, then the action key
    pub fn keys(&self) -> SmallVec<[Key; MAX_SHORTCUT_KEYS]> {
        let mut keys: SmallVec<[Key; MAX_SHORTCUT_KEYS]> = self.modifier_keys().collect();
        keys.extend(self.action);
        keys
    }

    /// A complete shortcut has at least two keys and exactly one action key
    pub fn is_valid(&self) -> bool {
        self.action.is_some() && self.len() >= MIN_SHORTCUT_KEYS
    }

    /// True if `key` is one of this shortcut's keys, with common aliases
    /// standing in for either side.
    pub fn contains(&self, key: Key) -> bool {
        match classify(key) {
            Some((family, side)) => match self.modifier_side(family) {
                Some(ModifierSide::Either) => true,
                Some(required) => required == side,
                None => false,
            },
            None => self.action == Some(key),
        }
    }

    /// True if some pressed key set would match both shortcuts
    pub fn overlaps(&self, other: &Shortcut) -> bool {
        if self.action != other.action {
            return false;
        }
        ModifierFamily::iter().all(|family| {
            match (self.modifier_side(family), other.modifier_side(family)) {
                (None, None) => true,
                (Some(a), Some(b)) => {
                    a == b || a == ModifierSide::Either || b == ModifierSide::Either
                }
                _ => false,
            }
        })
    }

    /// Exact canonical match against a set of pressed physical keys.
    ///
    /// Every required family must be held on an accepted side, no other
    /// modifier family may be held, and the only pressed action key must be
    /// this shortcut's action key. Supersets and subsets never match.
    pub fn matches_pressed(&self, pressed: &[Key]) -> bool {
        let mut held = [(false, false); ModifierFamily::COUNT];
        let mut action_seen = false;
        for &key in pressed {
            match classify(key) {
                Some((family, side)) => {
                    let entry = &mut held[family.index()];
                    match side {
                        ModifierSide::Left => entry.0 = true,
                        ModifierSide::Right => entry.1 = true,
                        ModifierSide::Either => {
                            entry.0 = true;
                            entry.1 = true;
                        }
                    }
                }
                None => {
                    if Some(key) != self.action {
                        return false;
                    }
                    action_seen = true;
                }
            }
        }
        if self.action.is_some() && !action_seen {
            return false;
        }
        ModifierFamily::iter().all(|family| {
            let (left, right) = held[family.index()];
            match self.modifier_side(family) {
                None => !left && !right,
                Some(ModifierSide::Left) => left && !right,
                Some(ModifierSide::Right) => right && !left,
                Some(ModifierSide::Either) => left || right,
            }
        })
    }

    /// Replace the side of `family`, used when collapsing left/right pairs
    pub fn with_side(mut self, family: ModifierFamily, side: ModifierSide) -> Self {
        self.modifiers[family.index()] = Some(side);
        self
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.keys().iter().map(|k| display_key(*k)).collect();
        write!(f, "{}", parts.join("+"))
    }
}

/// Short display form used in shortcut strings
pub fn display_key(key: Key) -> String {
    match classify(key) {
        Some((family, ModifierSide::Either)) => family.label().to_string(),
        Some((family, ModifierSide::Left)) => format!("L{}", family.label()),
        Some((family, ModifierSide::Right)) => format!("R{}", family.label()),
        None => key.name().to_string(),
    }
}

/// What a remap produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemapTarget {
    Key(Key),
    Shortcut(Shortcut),
    /// Suppress the source with no replacement
    Disabled,
}

impl RemapTarget {
    /// Keys emitted for this target: modifiers first, action key last
    pub fn keys(&self) -> SmallVec<[Key; MAX_SHORTCUT_KEYS]> {
        match self {
            RemapTarget::Key(key) => smallvec::smallvec![*key],
            RemapTarget::Shortcut(shortcut) => shortcut.keys(),
            RemapTarget::Disabled => SmallVec::new(),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, RemapTarget::Disabled)
    }
}

impl From<Key> for RemapTarget {
    fn from(key: Key) -> Self {
        if key == Key::DISABLED {
            RemapTarget::Disabled
        } else {
            RemapTarget::Key(key)
        }
    }
}

impl From<Shortcut> for RemapTarget {
    fn from(shortcut: Shortcut) -> Self {
        RemapTarget::Shortcut(shortcut)
    }
}

impl fmt::Display for RemapTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemapTarget::Key(key) => write!(f, "{}", display_key(*key)),
            RemapTarget::Shortcut(shortcut) => write!(f, "{}", shortcut),
            RemapTarget::Disabled => write!(f, "Disabled"),
        }
    }
}
