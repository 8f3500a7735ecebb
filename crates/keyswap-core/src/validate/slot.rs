// Keyswap Slot Validation
// Accept or reject one drop-down edit, and say how the column should resize

use super::buffer::{ColumnKind, ColumnValue, RemapBuffer};
use super::reserved::reserved_combination;
use super::{SlotDirective, ValidationError};
use crate::modifier::{family_of, is_action_key, is_modifier};
use crate::shortcut::MAX_SHORTCUT_KEYS;
use crate::{Key, Shortcut};

/// One user interaction with one slot of one column
#[derive(Debug, Clone, Copy)]
pub struct SlotEdit<'a> {
    pub row: usize,
    pub column: ColumnKind,
    pub slot: usize,
    /// New value for the slot; `None` selects "none"
    pub proposed: Option<Key>,
    /// The column's slots before the edit
    pub slots: &'a [Option<Key>],
    /// The column may still be a single key rather than a shortcut
    pub mixed: bool,
}

impl SlotEdit<'_> {
    fn is_last(&self) -> bool {
        self.slot + 1 == self.slots.len()
    }

    /// Selected keys in every slot but the edited one
    fn others(&self) -> impl Iterator<Item = Key> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.slot)
            .filter_map(|(_, key)| *key)
    }

    fn later(&self) -> &[Option<Key>] {
        &self.slots[self.slot + 1..]
    }

    fn earlier(&self) -> &[Option<Key>] {
        &self.slots[..self.slot]
    }
}

type Verdict = (ValidationError, SlotDirective);

const OK: Verdict = (ValidationError::NoError, SlotDirective::NoAction);

fn reject(error: ValidationError) -> Verdict {
    (error, SlotDirective::NoAction)
}

fn accept(directive: SlotDirective) -> Verdict {
    (ValidationError::NoError, directive)
}

/// Validate one slot edit against its column and the rest of the buffer.
///
/// Pure: the result depends only on the arguments. A rejected edit always
/// carries `SlotDirective::NoAction`; the caller keeps the buffer as it was.
/// An edit outside the column's slots is rejected with `CommitFailed`.
pub fn validate_slot(edit: &SlotEdit<'_>, buffer: &RemapBuffer) -> Verdict {
    if edit.slot >= edit.slots.len() {
        return reject(ValidationError::CommitFailed);
    }

    let verdict = match edit.proposed {
        Some(key) if is_modifier(key) => check_modifier(edit, key),
        Some(key) => check_action_key(edit, key),
        None => check_none(edit),
    };
    if verdict.0.is_error() {
        return verdict;
    }

    let mut after = edit.slots.to_vec();
    after[edit.slot] = edit.proposed;
    verdict.1.apply(&mut after, edit.slot);

    match check_resolved(edit, &after, buffer) {
        ValidationError::NoError => verdict,
        error => reject(error),
    }
}

fn check_action_key(edit: &SlotEdit<'_>, key: Key) -> Verdict {
    let n = edit.slots.len();

    if key == Key::DISABLED {
        if edit.slot != 0 || !edit.mixed || edit.column != ColumnKind::Target {
            return reject(ValidationError::DisableAsActionKey);
        }
        return if n > 1 {
            accept(SlotDirective::ClearUnusedSlots)
        } else {
            OK
        };
    }

    if n == 1 {
        return if edit.mixed {
            OK
        } else {
            reject(ValidationError::StartsWithModifier)
        };
    }

    if edit.is_last() {
        return if edit.others().any(is_action_key) {
            reject(ValidationError::TooManyActionKeys)
        } else {
            OK
        };
    }
    if edit.earlier().iter().flatten().any(|k| is_action_key(*k)) {
        return reject(ValidationError::TooManyActionKeys);
    }

    let later = edit.later();
    if later.iter().all(Option::is_none) {
        if edit.slot == 0 && !edit.mixed {
            return reject(ValidationError::StartsWithModifier);
        }
        return accept(SlotDirective::ClearUnusedSlots);
    }
    if later.iter().flatten().any(|k| is_action_key(*k)) {
        return reject(ValidationError::TooManyActionKeys);
    }
    // Only modifiers follow: tolerated while a mixed column is being rebuilt
    if edit.slot == 0 && edit.mixed {
        OK
    } else {
        reject(ValidationError::StartsWithModifier)
    }
}

fn check_modifier(edit: &SlotEdit<'_>, key: Key) -> Verdict {
    if edit.others().any(|other| other == key) {
        return reject(ValidationError::RepeatedModifier);
    }
    if edit.others().any(|other| family_of(other) == family_of(key)) {
        return reject(ValidationError::ConflictingModifierSides);
    }
    if !edit.is_last() {
        return OK;
    }
    if edit.slots.len() < MAX_SHORTCUT_KEYS {
        accept(SlotDirective::AddSlot)
    } else {
        reject(ValidationError::NeedsExactlyOneActionKey)
    }
}

fn check_none(edit: &SlotEdit<'_>) -> Verdict {
    let n = edit.slots.len();
    let remaining = edit.others().count();

    if edit.is_last() {
        if n == 1 {
            return if edit.mixed {
                OK
            } else {
                reject(ValidationError::StartsWithModifier)
            };
        }
        if edit.mixed && n == 2 {
            return accept(SlotDirective::DeleteSlot);
        }
        return if remaining < 2 {
            reject(ValidationError::NeedsAtLeastTwoKeys)
        } else {
            reject(ValidationError::NeedsExactlyOneActionKey)
        };
    }

    match n {
        2 if edit.mixed => accept(SlotDirective::DeleteSlot),
        2 => reject(ValidationError::NeedsAtLeastTwoKeys),
        _ if edit.later().iter().all(Option::is_none) => accept(SlotDirective::ClearUnusedSlots),
        _ => accept(SlotDirective::DeleteSlot),
    }
}

/// Checks on the column as it would read after the edit
fn check_resolved(
    edit: &SlotEdit<'_>,
    after: &[Option<Key>],
    buffer: &RemapBuffer,
) -> ValidationError {
    let keys: Vec<Key> = after.iter().flatten().copied().collect();
    if let Some(reserved) = reserved_combination(&keys) {
        return reserved.error();
    }

    let Some(value) = resolve(&keys, edit.mixed) else {
        return ValidationError::NoError;
    };
    let Some(row) = buffer.row(edit.row) else {
        return ValidationError::NoError;
    };

    if row.column(edit.column.counterpart()).value() == Some(value) {
        return ValidationError::MapsToSelf;
    }

    if edit.column == ColumnKind::Source {
        for (index, other) in buffer.rows.iter().enumerate() {
            if index == edit.row || !row.shares_scope(other, &value) {
                continue;
            }
            let Some(existing) = other.source.value() else {
                continue;
            };
            if existing == value {
                return ValidationError::SameSourcePreviouslyMapped;
            }
            if existing.overlaps(&value) {
                return ValidationError::ConflictingModifierSides;
            }
        }
    }
    ValidationError::NoError
}

/// Resolved value of a key list, if it forms a complete column
fn resolve(keys: &[Key], mixed: bool) -> Option<ColumnValue> {
    match keys {
        [] => None,
        [key] if mixed => Some(ColumnValue::Key(*key)),
        [_] => None,
        _ => Shortcut::from_keys(keys.iter().copied())
            .ok()
            .filter(Shortcut::is_valid)
            .map(ColumnValue::Shortcut),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Column, RemapRow};

    fn check(slots: &[Option<Key>], slot: usize, proposed: Option<Key>, mixed: bool) -> Verdict {
        let buffer = RemapBuffer::new();
        let edit = SlotEdit {
            row: 0,
            column: ColumnKind::Source,
            slot,
            proposed,
            slots,
            mixed,
        };
        validate_slot(&edit, &buffer)
    }

    #[test]
    fn test_action_key_in_last_slot() {
        let slots = [Some(Key::LEFT_CTRL), None];
        assert_eq!(check(&slots, 1, Some(Key::A), false), OK);

        let slots = [Some(Key::A), None];
        assert_eq!(
            check(&slots, 1, Some(Key::B), true),
            reject(ValidationError::TooManyActionKeys)
        );
    }

    #[test]
    fn test_action_key_single_slot() {
        assert_eq!(
            check(&[None], 0, Some(Key::A), false),
            reject(ValidationError::StartsWithModifier)
        );
        assert_eq!(check(&[None], 0, Some(Key::A), true), OK);
    }

    #[test]
    fn test_action_key_early_clears_empty_tail() {
        let slots = [Some(Key::LEFT_CTRL), None];
        assert_eq!(
            check(&slots, 0, Some(Key::A), true),
            accept(SlotDirective::ClearUnusedSlots)
        );
        assert_eq!(
            check(&slots, 0, Some(Key::A), false),
            reject(ValidationError::StartsWithModifier)
        );
        let slots = [Some(Key::LEFT_CTRL), Some(Key::LEFT_SHIFT), None];
        assert_eq!(
            check(&slots, 1, Some(Key::A), false),
            accept(SlotDirective::ClearUnusedSlots)
        );
    }

    #[test]
    fn test_action_key_before_another_action_key() {
        let slots = [Some(Key::LEFT_CTRL), None, Some(Key::A)];
        assert_eq!(
            check(&slots, 1, Some(Key::B), false),
            reject(ValidationError::TooManyActionKeys)
        );
    }

    #[test]
    fn test_action_key_before_modifiers() {
        let slots = [None, Some(Key::LEFT_CTRL)];
        assert_eq!(check(&slots, 0, Some(Key::A), true), OK);
        assert_eq!(
            check(&slots, 0, Some(Key::A), false),
            reject(ValidationError::StartsWithModifier)
        );
    }

    #[test]
    fn test_modifier_rules() {
        let slots = [Some(Key::LEFT_CTRL), None];
        assert_eq!(
            check(&slots, 1, Some(Key::LEFT_CTRL), false),
            reject(ValidationError::RepeatedModifier)
        );
        assert_eq!(
            check(&slots, 1, Some(Key::CTRL), false),
            reject(ValidationError::ConflictingModifierSides)
        );
        assert_eq!(
            check(&slots, 1, Some(Key::RIGHT_CTRL), false),
            reject(ValidationError::ConflictingModifierSides)
        );
        assert_eq!(
            check(&slots, 1, Some(Key::LEFT_SHIFT), false),
            accept(SlotDirective::AddSlot)
        );

        let slots = [Some(Key::LEFT_CTRL), Some(Key::LEFT_SHIFT), None];
        assert_eq!(
            check(&slots, 2, Some(Key::LEFT_ALT), false),
            reject(ValidationError::NeedsExactlyOneActionKey)
        );
        // Changing an earlier modifier keeps the slot count
        let slots = [Some(Key::LEFT_CTRL), Some(Key::A)];
        assert_eq!(check(&slots, 0, Some(Key::LEFT_ALT), false), OK);
    }

    #[test]
    fn test_none_in_last_slot() {
        assert_eq!(check(&[Some(Key::A)], 0, None, true), OK);
        assert_eq!(
            check(&[Some(Key::LEFT_CTRL)], 0, None, false),
            reject(ValidationError::StartsWithModifier)
        );

        let slots = [Some(Key::LEFT_CTRL), Some(Key::A)];
        assert_eq!(check(&slots, 1, None, true), accept(SlotDirective::DeleteSlot));
        assert_eq!(
            check(&slots, 1, None, false),
            reject(ValidationError::NeedsAtLeastTwoKeys)
        );

        let slots = [Some(Key::LEFT_CTRL), Some(Key::LEFT_SHIFT), Some(Key::A)];
        assert_eq!(
            check(&slots, 2, None, false),
            reject(ValidationError::NeedsExactlyOneActionKey)
        );
    }

    #[test]
    fn test_none_in_middle_slot() {
        let slots = [Some(Key::LEFT_CTRL), Some(Key::A)];
        assert_eq!(check(&slots, 0, None, true), accept(SlotDirective::DeleteSlot));
        assert_eq!(
            check(&slots, 0, None, false),
            reject(ValidationError::NeedsAtLeastTwoKeys)
        );

        let slots = [Some(Key::LEFT_CTRL), Some(Key::LEFT_SHIFT), Some(Key::A)];
        assert_eq!(check(&slots, 1, None, false), accept(SlotDirective::DeleteSlot));

        let slots = [Some(Key::LEFT_CTRL), Some(Key::A), None];
        assert_eq!(
            check(&slots, 1, None, false),
            accept(SlotDirective::ClearUnusedSlots)
        );
    }

    #[test]
    fn test_disabled_only_as_single_key_target() {
        let buffer = RemapBuffer::new();
        let slots = [None, None];
        let mut edit = SlotEdit {
            row: 0,
            column: ColumnKind::Target,
            slot: 0,
            proposed: Some(Key::DISABLED),
            slots: &slots,
            mixed: true,
        };
        assert_eq!(
            validate_slot(&edit, &buffer),
            accept(SlotDirective::ClearUnusedSlots)
        );
        edit.slot = 1;
        assert_eq!(
            validate_slot(&edit, &buffer),
            reject(ValidationError::DisableAsActionKey)
        );
        edit.slot = 0;
        edit.column = ColumnKind::Source;
        assert_eq!(
            validate_slot(&edit, &buffer),
            reject(ValidationError::DisableAsActionKey)
        );
    }

    #[test]
    fn test_reserved_lock_combination() {
        let slots = [Some(Key::LEFT_META), None];
        assert_eq!(
            check(&slots, 1, Some(Key::L), false),
            reject(ValidationError::ReservedLockCombination)
        );
        let slots = [Some(Key::CTRL), Some(Key::LEFT_ALT), None];
        assert_eq!(
            check(&slots, 2, Some(Key::DELETE), false),
            reject(ValidationError::ReservedSecureAttentionCombination)
        );
    }

    #[test]
    fn test_maps_to_self() {
        let mut buffer = RemapBuffer::new();
        buffer.push(RemapRow::new(
            Column::from_keys(&[Key::CTRL, Key::A]),
            Column::new(),
        ));
        let slots = [Some(Key::CTRL), None];
        let edit = SlotEdit {
            row: 0,
            column: ColumnKind::Target,
            slot: 1,
            proposed: Some(Key::A),
            slots: &slots,
            mixed: true,
        };
        assert_eq!(validate_slot(&edit, &buffer), reject(ValidationError::MapsToSelf));
    }

    #[test]
    fn test_duplicate_and_overlapping_sources() {
        let mut buffer = RemapBuffer::new();
        buffer.push(RemapRow::new(
            Column::from_keys(&[Key::CTRL, Key::A]),
            Column::from_key(Key::B),
        ));
        buffer.push(RemapRow::new(Column::new(), Column::from_key(Key::C)));
        buffer.push(RemapRow::new(Column::new(), Column::from_key(Key::C)).with_app("firefox"));

        let slots = [Some(Key::CTRL), None];
        let mut edit = SlotEdit {
            row: 1,
            column: ColumnKind::Source,
            slot: 1,
            proposed: Some(Key::A),
            slots: &slots,
            mixed: false,
        };
        assert_eq!(
            validate_slot(&edit, &buffer),
            reject(ValidationError::SameSourcePreviouslyMapped)
        );

        let slots = [Some(Key::LEFT_CTRL), None];
        edit.slots = &slots;
        assert_eq!(
            validate_slot(&edit, &buffer),
            reject(ValidationError::ConflictingModifierSides)
        );

        // A different application scope may reuse the source
        edit.row = 2;
        assert_eq!(validate_slot(&edit, &buffer), OK);
    }

    #[test]
    fn test_out_of_range_slot() {
        assert_eq!(
            check(&[None], 3, Some(Key::A), true),
            reject(ValidationError::CommitFailed)
        );
    }
}
