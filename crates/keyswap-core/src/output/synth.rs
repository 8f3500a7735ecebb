// Keyswap Event Synthesizer
// Computes the replacement input for triggers, releases and single-key remaps

use smallvec::SmallVec;

use super::event::KeyEvent;
use crate::modifier::{classify, is_modifier, ModifierSide};
use crate::shortcut::MAX_SHORTCUT_KEYS;
use crate::{Key, KeyAction, RemapTarget, Shortcut};

/// Events emitted for one hook callback, in order
pub type EventBatch = SmallVec<[KeyEvent; 8]>;

/// Concrete keys, at most one shortcut's worth
pub type KeyList = SmallVec<[Key; MAX_SHORTCUT_KEYS]>;

/// Output state of a triggered shortcut, kept until it is released
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveShortcut {
    pub source: Shortcut,
    pub target: RemapTarget,
    /// Physical action key that completed the match
    pub trigger_key: Key,
    /// Held source modifiers the trigger lifted
    pub lifted: KeyList,
    /// Destination keys the engine pressed, in press order
    pub pressed: KeyList,
}

impl ActiveShortcut {
    /// Key to re-send on autorepeat of the trigger key
    pub fn repeat_key(&self) -> Option<Key> {
        self.pressed.last().copied()
    }
}

/// Concrete keys for a target. A common modifier resolves to the side the
/// user is already holding, else to its left key.
pub fn resolve_target(target: &RemapTarget, held: &[Key]) -> KeyList {
    target
        .keys()
        .into_iter()
        .map(|key| match classify(key) {
            Some((family, ModifierSide::Either)) => held
                .iter()
                .copied()
                .find(|h| matches!(classify(*h), Some((f, _)) if f == family))
                .unwrap_or_else(|| family.left_key()),
            _ => key,
        })
        .collect()
}

/// Events for a shortcut trigger.
///
/// `held_modifiers` are the source modifiers physically down; the action key
/// that completed the match is suppressed by the caller. Source modifiers that
/// are not part of the destination go up first, then destination keys that are
/// not already down go down, modifiers before the action key.
pub fn trigger_shortcut(
    source: &Shortcut,
    target: &RemapTarget,
    trigger_key: Key,
    held_modifiers: &[Key],
) -> (EventBatch, ActiveShortcut) {
    let destination = resolve_target(target, held_modifiers);
    let mut batch = EventBatch::new();
    let mut lifted = KeyList::new();
    let mut pressed = KeyList::new();

    for &held in held_modifiers {
        if !destination.contains(&held) {
            batch.push(KeyEvent::synthetic(held, KeyAction::Up));
            lifted.push(held);
        }
    }
    for &key in destination.iter().filter(|k| is_modifier(**k)) {
        if !held_modifiers.contains(&key) {
            batch.push(KeyEvent::synthetic(key, KeyAction::Down));
            pressed.push(key);
        }
    }
    for &key in destination.iter().filter(|k| !is_modifier(**k)) {
        batch.push(KeyEvent::synthetic(key, KeyAction::Down));
        pressed.push(key);
    }

    let active = ActiveShortcut {
        source: *source,
        target: *target,
        trigger_key,
        lifted,
        pressed,
    };
    (batch, active)
}

/// Events ending an active shortcut.
///
/// Destination keys the engine pressed go up (action key first). Then every
/// lifted source modifier that is still physically held goes down again, so
/// the visible keyboard state matches the user's hands.
pub fn release_shortcut(active: &ActiveShortcut, still_held: &[Key]) -> EventBatch {
    let mut batch: EventBatch = active
        .pressed
        .iter()
        .rev()
        .map(|key| KeyEvent::synthetic(*key, KeyAction::Up))
        .collect();
    for &modifier in &active.lifted {
        if still_held.contains(&modifier) {
            batch.push(KeyEvent::synthetic(modifier, KeyAction::Down));
        }
    }
    batch
}

/// Autorepeat of a held shortcut: re-send the destination's last key
pub fn repeat_shortcut(active: &ActiveShortcut) -> EventBatch {
    active
        .repeat_key()
        .map(|key| KeyEvent::synthetic(key, KeyAction::Repeat))
        .into_iter()
        .collect()
}

/// Events for a single-key remap going down.
///
/// `held` are the keys applications already see as down. Destination keys
/// among them are left alone, so the returned list holds only the keys this
/// remap pressed and must release. A disabled key yields nothing.
pub fn press_target(target: &RemapTarget, held: &[Key]) -> (EventBatch, KeyList) {
    let keys: KeyList = resolve_target(target, held)
        .into_iter()
        .filter(|key| !held.contains(key))
        .collect();
    let batch = keys
        .iter()
        .map(|key| KeyEvent::synthetic(*key, KeyAction::Down))
        .collect();
    (batch, keys)
}

/// Autorepeat of a single-key remap
pub fn repeat_target(pressed: &[Key]) -> EventBatch {
    pressed
        .last()
        .map(|key| KeyEvent::synthetic(*key, KeyAction::Repeat))
        .into_iter()
        .collect()
}

/// Events for a single-key remap going up, in reverse press order
pub fn release_target(pressed: &[Key]) -> EventBatch {
    pressed
        .iter()
        .rev()
        .map(|key| KeyEvent::synthetic(*key, KeyAction::Up))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sc(keys: &[Key]) -> Shortcut {
        Shortcut::from_keys(keys.iter().copied()).unwrap()
    }

    fn keys_of(batch: &EventBatch) -> Vec<(Key, KeyAction)> {
        assert!(batch.iter().all(|e| e.is_synthetic()));
        batch.iter().map(|e| (e.key, e.action)).collect()
    }

    #[test]
    fn test_trigger_lifts_source_and_presses_destination() {
        let source = sc(&[Key::CTRL, Key::A]);
        let target = RemapTarget::Shortcut(sc(&[Key::ALT, Key::V]));
        let (batch, active) = trigger_shortcut(&source, &target, Key::A, &[Key::LEFT_CTRL]);
        assert_eq!(
            keys_of(&batch),
            vec![
                (Key::LEFT_CTRL, KeyAction::Up),
                (Key::LEFT_ALT, KeyAction::Down),
                (Key::V, KeyAction::Down),
            ]
        );
        assert_eq!(active.lifted.as_slice(), &[Key::LEFT_CTRL]);
        assert_eq!(active.pressed.as_slice(), &[Key::LEFT_ALT, Key::V]);
        assert_eq!(active.repeat_key(), Some(Key::V));
    }

    #[test]
    fn test_trigger_keeps_shared_modifier_down() {
        let source = sc(&[Key::CTRL, Key::A]);
        let target = RemapTarget::Shortcut(sc(&[Key::CTRL, Key::V]));
        let (batch, active) = trigger_shortcut(&source, &target, Key::A, &[Key::RIGHT_CTRL]);
        // Common Ctrl in the destination resolves to the held right Ctrl
        assert_eq!(keys_of(&batch), vec![(Key::V, KeyAction::Down)]);
        assert!(active.lifted.is_empty());
    }

    #[test]
    fn test_trigger_to_single_key() {
        let source = sc(&[Key::LEFT_META, Key::LEFT_SHIFT, Key::S]);
        let target = RemapTarget::Key(Key::SYSRQ);
        let (batch, _) =
            trigger_shortcut(&source, &target, Key::S, &[Key::LEFT_META, Key::LEFT_SHIFT]);
        assert_eq!(
            keys_of(&batch),
            vec![
                (Key::LEFT_META, KeyAction::Up),
                (Key::LEFT_SHIFT, KeyAction::Up),
                (Key::SYSRQ, KeyAction::Down),
            ]
        );
    }

    #[test]
    fn test_release_restores_held_modifiers() {
        let source = sc(&[Key::CTRL, Key::A]);
        let target = RemapTarget::Shortcut(sc(&[Key::ALT, Key::V]));
        let (_, active) = trigger_shortcut(&source, &target, Key::A, &[Key::LEFT_CTRL]);

        let batch = release_shortcut(&active, &[Key::LEFT_CTRL]);
        assert_eq!(
            keys_of(&batch),
            vec![
                (Key::V, KeyAction::Up),
                (Key::LEFT_ALT, KeyAction::Up),
                (Key::LEFT_CTRL, KeyAction::Down),
            ]
        );

        let batch = release_shortcut(&active, &[]);
        assert_eq!(
            keys_of(&batch),
            vec![(Key::V, KeyAction::Up), (Key::LEFT_ALT, KeyAction::Up)]
        );
    }

    #[test]
    fn test_single_key_targets() {
        let (batch, pressed) = press_target(&RemapTarget::Key(Key::B), &[]);
        assert_eq!(keys_of(&batch), vec![(Key::B, KeyAction::Down)]);
        assert_eq!(keys_of(&release_target(&pressed)), vec![(Key::B, KeyAction::Up)]);
        assert_eq!(keys_of(&repeat_target(&pressed)), vec![(Key::B, KeyAction::Repeat)]);

        let target = RemapTarget::Shortcut(sc(&[Key::CTRL, Key::C]));
        let (batch, pressed) = press_target(&target, &[]);
        assert_eq!(
            keys_of(&batch),
            vec![(Key::LEFT_CTRL, KeyAction::Down), (Key::C, KeyAction::Down)]
        );
        assert_eq!(
            keys_of(&release_target(&pressed)),
            vec![(Key::C, KeyAction::Up), (Key::LEFT_CTRL, KeyAction::Up)]
        );
    }

    #[test]
    fn test_single_key_skips_held_destination_keys() {
        let target = RemapTarget::Shortcut(sc(&[Key::CTRL, Key::C]));
        let (batch, pressed) = press_target(&target, &[Key::RIGHT_CTRL]);
        assert_eq!(keys_of(&batch), vec![(Key::C, KeyAction::Down)]);
        assert_eq!(keys_of(&release_target(&pressed)), vec![(Key::C, KeyAction::Up)]);

        let (batch, pressed) = press_target(&RemapTarget::Key(Key::B), &[Key::B]);
        assert!(batch.is_empty());
        assert!(release_target(&pressed).is_empty());
    }

    #[test]
    fn test_disabled_target_emits_nothing() {
        let (batch, pressed) = press_target(&RemapTarget::Disabled, &[]);
        assert!(batch.is_empty());
        assert!(pressed.is_empty());
        assert!(release_target(&pressed).is_empty());
        assert!(repeat_target(&pressed).is_empty());
    }
}
