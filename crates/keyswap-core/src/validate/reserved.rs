// Keyswap Reserved Combinations
// Key sets the operating system keeps for itself and that may never be remapped

use std::fmt;

use super::ValidationError;
use crate::modifier::ModifierFamily;
use crate::{Key, Shortcut};

/// A system-reserved key combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedCombination {
    /// Win+L
    LockWorkstation,
    /// Ctrl+Alt+Del
    SecureAttention,
}

impl ReservedCombination {
    pub fn error(self) -> ValidationError {
        match self {
            ReservedCombination::LockWorkstation => ValidationError::ReservedLockCombination,
            ReservedCombination::SecureAttention => {
                ValidationError::ReservedSecureAttentionCombination
            }
        }
    }
}

impl fmt::Display for ReservedCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReservedCombination::LockWorkstation => write!(f, "Win+L"),
            ReservedCombination::SecureAttention => write!(f, "Ctrl+Alt+Del"),
        }
    }
}

/// The reserved combination `keys` resolve to, if any.
///
/// Order and side are irrelevant: any Win key with L, or any Ctrl and any Alt
/// with Delete. Extra modifiers make the set a different shortcut.
pub fn reserved_combination(keys: &[Key]) -> Option<ReservedCombination> {
    let shortcut = Shortcut::from_keys(keys.iter().copied()).ok()?;
    let has = |family| shortcut.modifier_side(family).is_some();
    match (shortcut.action_key()?, shortcut.modifier_count()) {
        (Key::L, 1) if has(ModifierFamily::Meta) => Some(ReservedCombination::LockWorkstation),
        (Key::DELETE, 2) if has(ModifierFamily::Ctrl) && has(ModifierFamily::Alt) => {
            Some(ReservedCombination::SecureAttention)
        }
        _ => None,
    }
}
