// Keyswap Remap Buffer
// The editable, uncommitted rows an editor builds remaps in

use super::{validate_slot, SlotDirective, SlotEdit, ValidationError};
use crate::modifier::{is_action_key, sides_overlap};
use crate::shortcut::MAX_SHORTCUT_KEYS;
use crate::{Key, RemapTarget, Shortcut};

/// Which side of a row a column is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Source,
    Target,
}

impl ColumnKind {
    pub fn counterpart(self) -> Self {
        match self {
            ColumnKind::Source => ColumnKind::Target,
            ColumnKind::Target => ColumnKind::Source,
        }
    }
}

/// Resolved value of a complete column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnValue {
    Key(Key),
    Shortcut(Shortcut),
}

impl ColumnValue {
    /// True if some pressed key set would match both values
    pub fn overlaps(&self, other: &ColumnValue) -> bool {
        match (self, other) {
            (ColumnValue::Key(a), ColumnValue::Key(b)) => sides_overlap(*a, *b),
            (ColumnValue::Shortcut(a), ColumnValue::Shortcut(b)) => a.overlaps(b),
            _ => false,
        }
    }

    pub fn keys(&self) -> Vec<Key> {
        match self {
            ColumnValue::Key(key) => vec![*key],
            ColumnValue::Shortcut(shortcut) => shortcut.keys().into_vec(),
        }
    }

    pub fn to_target(self) -> RemapTarget {
        match self {
            ColumnValue::Key(key) => RemapTarget::from(key),
            ColumnValue::Shortcut(shortcut) => RemapTarget::Shortcut(shortcut),
        }
    }
}

/// One column of a row: up to three drop-down slots, `None` meaning unselected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Column {
    pub slots: Vec<Option<Key>>,
}

impl Column {
    /// A column with one empty slot
    pub fn new() -> Self {
        Self { slots: vec![None] }
    }

    pub fn from_key(key: Key) -> Self {
        Self {
            slots: vec![Some(key)],
        }
    }

    pub fn from_keys(keys: &[Key]) -> Self {
        Self {
            slots: keys.iter().copied().map(Some).collect(),
        }
    }

    /// Selected keys, in slot order
    pub fn keys(&self) -> Vec<Key> {
        self.slots.iter().flatten().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Complete when it holds one key in a mixed column, or otherwise
    /// 2-3 keys forming a shortcut with exactly one action key
    pub fn is_complete(&self, mixed: bool) -> bool {
        let keys = self.keys();
        match keys.len() {
            0 => false,
            1 => mixed,
            n if n > MAX_SHORTCUT_KEYS => false,
            _ => keys.iter().all(|k| *k != Key::DISABLED)
                && Shortcut::from_keys(keys.iter().copied()).is_ok_and(|s| s.is_valid()),
        }
    }

    /// Resolved value, if the column is complete as a mixed column
    pub fn value(&self) -> Option<ColumnValue> {
        if !self.is_complete(true) {
            return None;
        }
        let keys = self.keys();
        match keys.as_slice() {
            [key] => Some(ColumnValue::Key(*key)),
            _ => Shortcut::from_keys(keys).ok().map(ColumnValue::Shortcut),
        }
    }

    /// Number of selected action keys
    pub fn action_key_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|k| is_action_key(**k))
            .count()
    }
}

/// One editor row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemapRow {
    pub source: Column,
    pub target: Column,
    /// Target application; `None` or empty means global
    pub app: Option<String>,
}

impl RemapRow {
    pub fn new(source: Column, target: Column) -> Self {
        Self {
            source,
            target,
            app: None,
        }
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn column(&self, kind: ColumnKind) -> &Column {
        match kind {
            ColumnKind::Source => &self.source,
            ColumnKind::Target => &self.target,
        }
    }

    pub fn column_mut(&mut self, kind: ColumnKind) -> &mut Column {
        match kind {
            ColumnKind::Source => &mut self.source,
            ColumnKind::Target => &mut self.target,
        }
    }

    /// Application scope, trimmed; `None` for global rows
    pub fn scope(&self) -> Option<&str> {
        self.app
            .as_deref()
            .map(str::trim)
            .filter(|app| !app.is_empty())
    }

    /// True if the two rows compete for the same events. Single-key remaps
    /// are always global; shortcut scopes compare case-insensitively.
    pub fn shares_scope(&self, other: &RemapRow, source: &ColumnValue) -> bool {
        if matches!(source, ColumnValue::Key(_)) {
            return true;
        }
        match (self.scope(), other.scope()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }
}

/// The rows an editor is working on
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemapBuffer {
    pub rows: Vec<RemapRow>,
}

impl RemapBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: RemapRow) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub fn row(&self, index: usize) -> Option<&RemapRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Validate one slot edit and apply it when accepted.
    ///
    /// On rejection the buffer is left exactly as it was.
    pub fn edit(
        &mut self,
        row: usize,
        column: ColumnKind,
        slot: usize,
        proposed: Option<Key>,
        mixed: bool,
    ) -> (ValidationError, SlotDirective) {
        let Some(current) = self.rows.get(row) else {
            return (ValidationError::CommitFailed, SlotDirective::NoAction);
        };
        let slots = current.column(column).slots.clone();
        let edit = SlotEdit {
            row,
            column,
            slot,
            proposed,
            slots: &slots,
            mixed,
        };
        let (error, directive) = validate_slot(&edit, self);
        if error.is_error() {
            return (error, directive);
        }
        let target = &mut self.rows[row].column_mut(column).slots;
        target[slot] = proposed;
        directive.apply(target, slot);
        (error, directive)
    }
}
