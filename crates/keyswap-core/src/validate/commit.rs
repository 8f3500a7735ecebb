// Keyswap Commit Validation
// Whole-buffer checks and conversion of an accepted buffer into remap tables

use std::fmt;

use super::buffer::{Column, ColumnKind, ColumnValue, RemapBuffer};
use super::reserved::reserved_combination;
use super::ValidationError;
use crate::modifier::common_of;
use crate::shortcut::{ShortcutError, MAX_SHORTCUT_KEYS};
use crate::tables::RemapTables;
use crate::{Key, Shortcut};

/// A problem found in one row at commit time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub column: ColumnKind,
    pub error: ValidationError,
    /// Structural reason behind a `CommitFailed`
    pub reason: Option<ValidationError>,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = match self.column {
            ColumnKind::Source => "source",
            ColumnKind::Target => "target",
        };
        write!(f, "row {} {}: {}", self.row + 1, column, self.error)?;
        if let Some(reason) = self.reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}

/// Result of checking a whole buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} remap row(s) failed validation", .errors.len())]
pub struct ValidationReport {
    pub errors: Vec<RowError>,
    /// Keys remapped away that nothing maps back to. Informational only.
    pub orphaned: Vec<Key>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first_error(&self) -> Option<&RowError> {
        self.errors.first()
    }

    /// Errors reported for one row
    pub fn errors_for(&self, row: usize) -> impl Iterator<Item = &RowError> {
        self.errors.iter().filter(move |e| e.row == row)
    }

    fn push(&mut self, row: usize, column: ColumnKind, error: ValidationError) {
        self.errors.push(RowError {
            row,
            column,
            error,
            reason: None,
        });
    }
}

/// Why a non-empty column cannot be committed
fn structural_reason(column: &Column, kind: ColumnKind) -> Option<ValidationError> {
    let keys = column.keys();
    match keys.as_slice() {
        [] => Some(ValidationError::NeedsAtLeastTwoKeys),
        [Key::DISABLED] if kind == ColumnKind::Source => Some(ValidationError::DisableAsActionKey),
        [_] => None,
        _ if keys.contains(&Key::DISABLED) => Some(ValidationError::DisableAsActionKey),
        _ if keys.len() > MAX_SHORTCUT_KEYS => Some(ValidationError::NeedsExactlyOneActionKey),
        _ => match Shortcut::from_keys(keys.iter().copied()) {
            Err(ShortcutError::SecondActionKey) => Some(ValidationError::TooManyActionKeys),
            Err(ShortcutError::RepeatedModifier(_)) => {
                if has_duplicate(&keys) {
                    Some(ValidationError::RepeatedModifier)
                } else {
                    Some(ValidationError::ConflictingModifierSides)
                }
            }
            Err(_) => Some(ValidationError::NeedsExactlyOneActionKey),
            Ok(shortcut) if shortcut.action_key().is_none() => {
                Some(ValidationError::NeedsExactlyOneActionKey)
            }
            Ok(_) => None,
        },
    }
}

fn has_duplicate(keys: &[Key]) -> bool {
    keys.iter()
        .enumerate()
        .any(|(i, key)| keys[i + 1..].contains(key))
}

/// Check every row of `buffer` as a unit.
///
/// Rows with both columns empty are skipped. An incomplete row is reported as
/// `CommitFailed` with its structural reason; complete rows are then checked
/// for self-maps, reserved combinations and duplicate or overlapping sources
/// within one application scope.
pub fn validate_buffer(buffer: &RemapBuffer) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut resolved: Vec<(usize, ColumnValue, ColumnValue)> = Vec::with_capacity(buffer.len());

    for (index, row) in buffer.rows.iter().enumerate() {
        if row.is_empty() {
            continue;
        }
        let mut complete = true;
        for kind in [ColumnKind::Source, ColumnKind::Target] {
            if let Some(reason) = structural_reason(row.column(kind), kind) {
                report.errors.push(RowError {
                    row: index,
                    column: kind,
                    error: ValidationError::CommitFailed,
                    reason: Some(reason),
                });
                complete = false;
            }
        }
        if !complete {
            continue;
        }
        if let (Some(source), Some(target)) = (row.source.value(), row.target.value()) {
            resolved.push((index, source, target));
        }
    }

    for (position, (index, source, target)) in resolved.iter().enumerate() {
        let row = &buffer.rows[*index];
        if source == target {
            report.push(*index, ColumnKind::Target, ValidationError::MapsToSelf);
            continue;
        }
        if let Some(reserved) = reserved_combination(&source.keys()) {
            report.push(*index, ColumnKind::Source, reserved.error());
            continue;
        }
        if let Some(reserved) = reserved_combination(&target.keys()) {
            report.push(*index, ColumnKind::Target, reserved.error());
            continue;
        }
        for (earlier, earlier_source, _) in &resolved[..position] {
            if !row.shares_scope(&buffer.rows[*earlier], source) {
                continue;
            }
            if earlier_source == source {
                report.push(*index, ColumnKind::Source, ValidationError::SameSourcePreviouslyMapped);
                break;
            }
            if earlier_source.overlaps(source) {
                report.push(*index, ColumnKind::Source, ValidationError::ConflictingModifierSides);
                break;
            }
        }
    }

    report.orphaned = orphaned_keys(&resolved);
    report
}

/// Sources of single-key remaps that no single-key row produces again
fn orphaned_keys(resolved: &[(usize, ColumnValue, ColumnValue)]) -> Vec<Key> {
    let produced: Vec<Key> = resolved
        .iter()
        .filter_map(|(_, source, target)| match (source, target) {
            (ColumnValue::Key(_), ColumnValue::Key(key)) if *key != Key::DISABLED => Some(*key),
            _ => None,
        })
        .collect();

    resolved
        .iter()
        .filter_map(|(_, source, _)| match source {
            ColumnValue::Key(key) => Some(*key),
            ColumnValue::Shortcut(_) => None,
        })
        .filter(|source| {
            !produced
                .iter()
                .any(|target| target == source || common_of(*source) == Some(*target))
        })
        .collect()
}

/// Convert a buffer into remap tables without checking it.
///
/// Incomplete rows are skipped. Single-key sources are always global.
pub fn build_tables(buffer: &RemapBuffer) -> RemapTables {
    let mut tables = RemapTables::new();
    for row in &buffer.rows {
        let (Some(source), Some(target)) = (row.source.value(), row.target.value()) else {
            continue;
        };
        let target = target.to_target();
        match (source, row.scope()) {
            (ColumnValue::Key(key), scope) => {
                if let Some(app) = scope {
                    log::warn!("single-key remap {} ignores application scope {}", key, app);
                }
                tables.insert_single_key(key, target);
            }
            (ColumnValue::Shortcut(shortcut), None) => {
                tables.insert_global_shortcut(shortcut, target);
            }
            (ColumnValue::Shortcut(shortcut), Some(app)) => {
                tables.insert_app_shortcut(app, shortcut, target);
            }
        }
    }
    tables
}

/// Validate `buffer` and convert it into remap tables.
///
/// On failure nothing is built and the report lists every offending row.
pub fn commit(buffer: &RemapBuffer) -> Result<RemapTables, ValidationReport> {
    let report = validate_buffer(buffer);
    if !report.is_ok() {
        log::warn!("rejected remap commit: {}", report);
        return Err(report);
    }
    if !report.orphaned.is_empty() {
        log::info!("orphaned keys after commit: {:?}", report.orphaned);
    }
    Ok(build_tables(buffer))
}
