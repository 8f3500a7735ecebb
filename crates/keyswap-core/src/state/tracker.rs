// Keyswap Key State Tracker
// Dense pressed-key table fed by non-synthetic hook events

use smallvec::SmallVec;

use crate::key::KEY_COUNT;
use crate::modifier::{classify, projection, ModifierFamily, ModifierSide};
use crate::output::KeyEvent;
use crate::Key;

/// Pressed-key set, sized for the common case of a handful of held keys
pub type PressedKeys = SmallVec<[Key; 8]>;

/// Tracks which keys are physically held.
///
/// Only events that did not come from the engine are recorded, so the table
/// reflects the user's hands rather than the remapped output.
///
/// # Thread confinement
///
/// The tracker is owned by the dispatcher and must only be mutated from the
/// hook-callback thread. Other threads only ever see a cloned copy handed out
/// by the hook thread; such reads are informational and never on the event path.
#[derive(Debug, Clone)]
pub struct KeyStateTracker {
    pressed: Box<[bool; KEY_COUNT]>,
    count: usize,
}

impl Default for KeyStateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStateTracker {
    pub fn new() -> Self {
        Self {
            pressed: Box::new([false; KEY_COUNT]),
            count: 0,
        }
    }

    /// Mark a key as held. Out-of-range codes are ignored.
    pub fn press(&mut self, key: Key) {
        if let Some(slot) = self.pressed.get_mut(key.code() as usize) {
            if !*slot {
                *slot = true;
                self.count += 1;
            }
        }
    }

    /// Mark a key as released
    pub fn release(&mut self, key: Key) {
        if let Some(slot) = self.pressed.get_mut(key.code() as usize) {
            if *slot {
                *slot = false;
                self.count -= 1;
            }
        }
    }

    /// Record a hook event. Synthetic events are ignored.
    pub fn apply(&mut self, event: &KeyEvent) {
        if event.is_synthetic() {
            return;
        }
        if event.action.is_down() {
            self.press(event.key);
        } else {
            self.release(event.key);
        }
    }

    /// True if the key is held. A common alias is held when either side is.
    pub fn is_pressed(&self, key: Key) -> bool {
        match classify(key) {
            Some((family, ModifierSide::Either)) => self.is_modifier_pressed(family),
            _ => self.raw(key),
        }
    }

    fn raw(&self, key: Key) -> bool {
        self.pressed
            .get(key.code() as usize)
            .copied()
            .unwrap_or(false)
    }

    /// True if either side (or the common alias) of `family` is held
    pub fn is_modifier_pressed(&self, family: ModifierFamily) -> bool {
        self.raw(family.left_key()) || self.raw(family.right_key()) || self.raw(family.common_key())
    }

    /// Projection of a family's state onto one key: the pressed side, or
    /// the common alias when both sides are held
    pub fn pressed_modifier(&self, family: ModifierFamily) -> Option<Key> {
        if self.raw(family.common_key()) {
            return Some(family.common_key());
        }
        projection(family, self.raw(family.left_key()), self.raw(family.right_key()))
    }

    /// Every held key, in key-code order
    pub fn pressed_keys(&self) -> PressedKeys {
        let mut keys = PressedKeys::new();
        if self.count == 0 {
            return keys;
        }
        for (code, held) in self.pressed.iter().enumerate() {
            if *held {
                keys.push(Key(code as u16));
                if keys.len() == self.count {
                    break;
                }
            }
        }
        keys
    }

    /// The held set with `key` added, without committing it
    pub fn proposed_with(&self, key: Key) -> PressedKeys {
        let mut keys = self.pressed_keys();
        if !self.raw(key) {
            keys.push(key);
        }
        keys
    }

    /// Number of held keys
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Forget every held key
    pub fn clear(&mut self) {
        self.pressed.fill(false);
        self.count = 0;
    }
}
