// Keyswap Mock Output
// In-memory sink and a simulated keyboard host for driving the engine without a device

use std::sync::Arc;

use parking_lot::Mutex;

use super::event::{InputSink, KeyEvent};
use crate::engine::RemapEngine;
use crate::hook::{FixedForegroundApp, HookDecision, Host};
use crate::state::KeyStateTracker;
use crate::tables::{RemapTableStore, RemapTables};
use crate::{Key, KeyAction};

/// Sink that records every batch instead of injecting it.
///
/// Clones share one buffer, so a test can hand one clone to the engine and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<KeyEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<KeyEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl InputSink for RecordingSink {
    fn send(&mut self, events: &[KeyEvent]) {
        self.events.lock().extend_from_slice(events);
    }
}

/// A keyboard plus the applications listening to it.
///
/// Physical events go through the engine; whatever it passes through or
/// synthesizes is delivered to the observable key state. Synthesized events
/// are first fed back through the engine the way an OS hook would see them
/// again, so feedback handling is exercised too.
pub struct SimulatedKeyboard {
    engine: RemapEngine,
    sink: RecordingSink,
    observed: KeyStateTracker,
    delivered: Vec<KeyEvent>,
}

impl SimulatedKeyboard {
    /// A keyboard with no remaps
    pub fn new() -> Self {
        Self::with_tables(RemapTables::new())
    }

    /// A keyboard publishing `tables` from the start
    pub fn with_tables(tables: RemapTables) -> Self {
        let sink = RecordingSink::new();
        let store = Arc::new(RemapTableStore::with_tables(tables));
        let engine = RemapEngine::with_store(store, Host::new(sink.clone()));
        Self {
            engine,
            sink,
            observed: KeyStateTracker::new(),
            delivered: Vec::new(),
        }
    }

    /// Report `app` as the foreground application
    pub fn with_foreground(mut self, app: &str) -> Self {
        self.engine.host_mut().foreground = Box::new(FixedForegroundApp::new(app));
        self
    }

    pub fn engine(&self) -> &RemapEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RemapEngine {
        &mut self.engine
    }

    pub fn press(&mut self, key: Key) -> HookDecision {
        self.send(KeyEvent::down(key))
    }

    pub fn release(&mut self, key: Key) -> HookDecision {
        self.send(KeyEvent::up(key))
    }

    pub fn repeat(&mut self, key: Key) -> HookDecision {
        self.send(KeyEvent::new(key, KeyAction::Repeat))
    }

    /// Press then release
    pub fn tap(&mut self, key: Key) {
        self.press(key);
        self.release(key);
    }

    /// Hand one physical event to the engine and deliver the outcome
    pub fn send(&mut self, event: KeyEvent) -> HookDecision {
        let decision = self.engine.handle_key_event(&event);
        if decision == HookDecision::PassThrough {
            self.deliver(event);
        }
        for synthetic in self.sink.take() {
            let echoed = self.engine.handle_key_event(&synthetic);
            debug_assert_eq!(echoed, HookDecision::PassThrough);
            self.deliver(synthetic);
        }
        decision
    }

    fn deliver(&mut self, event: KeyEvent) {
        if event.action.is_down() {
            self.observed.press(event.key);
        } else {
            self.observed.release(event.key);
        }
        self.delivered.push(event);
    }

    /// Whether applications currently see `key` as down
    pub fn is_down(&self, key: Key) -> bool {
        self.observed.is_pressed(key)
    }

    /// Every key applications see as down, in key-code order
    pub fn observed_keys(&self) -> Vec<Key> {
        self.observed.pressed_keys().into_vec()
    }

    /// The engine's view of the physical keys
    pub fn physical(&self) -> &KeyStateTracker {
        self.engine.dispatcher().tracker()
    }

    /// Events delivered to applications since the last call
    pub fn take_delivered(&mut self) -> Vec<KeyEvent> {
        std::mem::take(&mut self.delivered)
    }
}

impl Default for SimulatedKeyboard {
    fn default() -> Self {
        Self::new()
    }
}
