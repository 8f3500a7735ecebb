// Keyswap Key Events
// The event record shared by hook input and synthesized output

use crate::{Key, KeyAction};

/// Auxiliary-data tag carried by every event the engine synthesizes.
///
/// The dispatcher passes tagged events through untouched; to every other
/// consumer they look like real input.
pub const SYNTHETIC_MARKER: usize = 0x4b53_5750;

/// A keyboard event as seen by the hook, or as emitted by the synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub action: KeyAction,
    /// Platform auxiliary data; `SYNTHETIC_MARKER` for engine output
    pub extra_info: usize,
}

impl KeyEvent {
    /// A physical (untagged) event
    pub fn new(key: Key, action: KeyAction) -> Self {
        Self {
            key,
            action,
            extra_info: 0,
        }
    }

    pub fn down(key: Key) -> Self {
        Self::new(key, KeyAction::Down)
    }

    pub fn up(key: Key) -> Self {
        Self::new(key, KeyAction::Up)
    }

    /// A tagged event produced by the engine
    pub fn synthetic(key: Key, action: KeyAction) -> Self {
        Self {
            key,
            action,
            extra_info: SYNTHETIC_MARKER,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.extra_info == SYNTHETIC_MARKER
    }
}

/// Output boundary for synthesized input.
///
/// Implementations forward the batch to the platform (uinput, SendInput) or
/// record it in tests. A batch is emitted in order.
pub trait InputSink {
    fn send(&mut self, events: &[KeyEvent]);
}

impl<T: InputSink + ?Sized> InputSink for Box<T> {
    fn send(&mut self, events: &[KeyEvent]) {
        (**self).send(events)
    }
}
