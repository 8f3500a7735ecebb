// Keyswap Remap Validation
// Per-edit and per-commit consistency checks over the editable remap buffer

mod buffer;
mod commit;
mod reserved;
mod slot;

pub use buffer::{Column, ColumnKind, ColumnValue, RemapBuffer, RemapRow};
pub use commit::{build_tables, commit, validate_buffer, RowError, ValidationReport};
pub use reserved::{reserved_combination, ReservedCombination};
pub use slot::{validate_slot, SlotEdit};

use crate::Key;

/// Outcome of a validation check.
///
/// Every variant is recovered by the editor: the edit is rejected and the
/// buffer stays at its last valid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    #[error("no error")]
    NoError,

    #[error("a shortcut must start with a modifier")]
    StartsWithModifier,

    #[error("a shortcut needs at least two keys")]
    NeedsAtLeastTwoKeys,

    #[error("a shortcut needs exactly one action key")]
    NeedsExactlyOneActionKey,

    #[error("a shortcut cannot hold more than one action key")]
    TooManyActionKeys,

    #[error("this modifier is already part of the shortcut")]
    RepeatedModifier,

    #[error("this modifier conflicts with another side of the same modifier")]
    ConflictingModifierSides,

    #[error("disable can only be chosen as a single-key target")]
    DisableAsActionKey,

    #[error("this source is already remapped")]
    SameSourcePreviouslyMapped,

    #[error("a key or shortcut cannot be remapped to itself")]
    MapsToSelf,

    #[error("the remaps could not be committed")]
    CommitFailed,

    #[error("Win+L is reserved for locking the workstation")]
    ReservedLockCombination,

    #[error("Ctrl+Alt+Del is reserved by the system")]
    ReservedSecureAttentionCombination,
}

/// Broad class of a validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    None,
    Structural,
    Duplication,
    Reserved,
}

impl ValidationError {
    pub fn is_error(self) -> bool {
        self != ValidationError::NoError
    }

    pub fn category(self) -> ErrorCategory {
        match self {
            ValidationError::NoError => ErrorCategory::None,
            ValidationError::StartsWithModifier
            | ValidationError::NeedsAtLeastTwoKeys
            | ValidationError::NeedsExactlyOneActionKey
            | ValidationError::TooManyActionKeys
            | ValidationError::RepeatedModifier
            | ValidationError::ConflictingModifierSides
            | ValidationError::DisableAsActionKey => ErrorCategory::Structural,
            ValidationError::SameSourcePreviouslyMapped
            | ValidationError::MapsToSelf
            | ValidationError::CommitFailed => ErrorCategory::Duplication,
            ValidationError::ReservedLockCombination
            | ValidationError::ReservedSecureAttentionCombination => ErrorCategory::Reserved,
        }
    }
}

/// How the editor should adjust the visible slot count after an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotDirective {
    #[default]
    NoAction,
    /// Append an empty slot
    AddSlot,
    /// Remove the edited slot
    DeleteSlot,
    /// Drop every slot after the edited one
    ClearUnusedSlots,
}

impl SlotDirective {
    /// Apply the directive to a slot vector after `slot` received its new value
    pub fn apply(self, slots: &mut Vec<Option<Key>>, slot: usize) {
        match self {
            SlotDirective::NoAction => {}
            SlotDirective::AddSlot => slots.push(None),
            SlotDirective::DeleteSlot => {
                if slot < slots.len() {
                    slots.remove(slot);
                }
            }
            SlotDirective::ClearUnusedSlots => slots.truncate(slot + 1),
        }
    }
}
