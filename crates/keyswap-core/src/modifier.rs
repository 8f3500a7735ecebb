// Keyswap Modifier System
// Modifier families (Ctrl, Shift, Alt, Meta) and their left/right/common projections

use std::fmt;

use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

use crate::Key;

/// A modifier family. Each family has a left key, a right key and a common alias.
///
/// Declaration order is the order modifiers are written out in a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, IntoStaticStr)]
pub enum ModifierFamily {
    Meta,
    Ctrl,
    Alt,
    Shift,
}

/// Which instance of a family a key (or a shortcut slot) refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierSide {
    Left,
    Right,
    /// Either side; written with the common alias key
    Either,
}

impl ModifierFamily {
    /// Dense index, usable for per-family arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn left_key(self) -> Key {
        match self {
            ModifierFamily::Meta => Key::LEFT_META,
            ModifierFamily::Ctrl => Key::LEFT_CTRL,
            ModifierFamily::Alt => Key::LEFT_ALT,
            ModifierFamily::Shift => Key::LEFT_SHIFT,
        }
    }

    pub const fn right_key(self) -> Key {
        match self {
            ModifierFamily::Meta => Key::RIGHT_META,
            ModifierFamily::Ctrl => Key::RIGHT_CTRL,
            ModifierFamily::Alt => Key::RIGHT_ALT,
            ModifierFamily::Shift => Key::RIGHT_SHIFT,
        }
    }

    pub const fn common_key(self) -> Key {
        match self {
            ModifierFamily::Meta => Key::META,
            ModifierFamily::Ctrl => Key::CTRL,
            ModifierFamily::Alt => Key::ALT,
            ModifierFamily::Shift => Key::SHIFT,
        }
    }

    /// Key that represents `side` of this family
    pub const fn key_for(self, side: ModifierSide) -> Key {
        match side {
            ModifierSide::Left => self.left_key(),
            ModifierSide::Right => self.right_key(),
            ModifierSide::Either => self.common_key(),
        }
    }

    /// Display label used in shortcut strings
    pub fn label(self) -> &'static str {
        match self {
            ModifierFamily::Meta => "Win",
            ModifierFamily::Ctrl => "Ctrl",
            ModifierFamily::Alt => "Alt",
            ModifierFamily::Shift => "Shift",
        }
    }
}

impl fmt::Display for ModifierFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Family and side of a modifier key, or `None` for action keys
pub const fn classify(key: Key) -> Option<(ModifierFamily, ModifierSide)> {
    use ModifierFamily::*;
    use ModifierSide::*;
    let class = match key {
        Key::LEFT_META => (Meta, Left),
        Key::RIGHT_META => (Meta, Right),
        Key::META => (Meta, Either),
        Key::LEFT_CTRL => (Ctrl, Left),
        Key::RIGHT_CTRL => (Ctrl, Right),
        Key::CTRL => (Ctrl, Either),
        Key::LEFT_ALT => (Alt, Left),
        Key::RIGHT_ALT => (Alt, Right),
        Key::ALT => (Alt, Either),
        Key::LEFT_SHIFT => (Shift, Left),
        Key::RIGHT_SHIFT => (Shift, Right),
        Key::SHIFT => (Shift, Either),
        _ => return None,
    };
    Some(class)
}

/// Family of a modifier key
pub const fn family_of(key: Key) -> Option<ModifierFamily> {
    match classify(key) {
        Some((family, _)) => Some(family),
        None => None,
    }
}

/// Side of a modifier key
pub const fn side_of(key: Key) -> Option<ModifierSide> {
    match classify(key) {
        Some((_, side)) => Some(side),
        None => None,
    }
}

/// Check if a key is a pure modifier (left, right or common)
#[inline]
pub const fn is_modifier(key: Key) -> bool {
    classify(key).is_some()
}

/// Check if a key can terminate a shortcut
#[inline]
pub const fn is_action_key(key: Key) -> bool {
    !is_modifier(key) && key.0 != 0
}

/// The common alias of a modifier key (identity for common aliases)
pub const fn common_of(key: Key) -> Option<Key> {
    match family_of(key) {
        Some(family) => Some(family.common_key()),
        None => None,
    }
}

/// Common-modifier projection of a left/right pair.
///
/// Returns the key that describes the family state: the common alias when both
/// sides agree, the pressed side when only one is, nothing when neither is.
pub const fn projection(family: ModifierFamily, left: bool, right: bool) -> Option<Key> {
    match (left, right) {
        (true, true) => Some(family.common_key()),
        (true, false) => Some(family.left_key()),
        (false, true) => Some(family.right_key()),
        (false, false) => None,
    }
}

/// True if `a` and `b` could stand for the same physical modifier.
///
/// Same key, or one of them is the common alias of the other's family.
pub fn sides_overlap(a: Key, b: Key) -> bool {
    match (classify(a), classify(b)) {
        (Some((fa, sa)), Some((fb, sb))) => {
            fa == fb && (sa == sb || sa == ModifierSide::Either || sb == ModifierSide::Either)
        }
        _ => a == b,
    }
}
