// Keyswap Hook Dispatcher
// Synchronous per-event decision: pass through, or suppress and synthesize

mod host;

pub use host::{FixedForegroundApp, ForegroundApp, Host, NoForegroundApp};

use smallvec::SmallVec;

use crate::matcher::{
    match_app_shortcut, match_global_shortcut, match_single_key, release_kind, ReleaseKind,
    RemapMatch,
};
use crate::modifier::is_modifier;
use crate::output::synth::{self, ActiveShortcut, EventBatch, KeyList};
use crate::output::KeyEvent;
use crate::state::KeyStateTracker;
use crate::tables::RemapTables;
use crate::{Key, KeyAction};

/// What the hook should do with the event it was handed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    /// Deliver the original event unchanged
    PassThrough,
    /// Drop the original event; any replacement has already been sent
    Handled,
}

/// Per-hook-thread remapping state.
///
/// Owns the key state tracker, so it must live on the thread that receives
/// hook callbacks. Every entry point returns without blocking: the only
/// shared data it reads is the table snapshot passed in by the caller.
#[derive(Debug, Default)]
pub struct Dispatcher {
    tracker: KeyStateTracker,
    active: Option<ActiveShortcut>,
    /// Physical keys whose remaining events are dropped until they go up
    swallowed: SmallVec<[Key; 4]>,
    /// Single-key remaps currently held: source key and the keys it pressed
    held_singles: SmallVec<[(Key, KeyList); 4]>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Physical key state as seen by the hook
    pub fn tracker(&self) -> &KeyStateTracker {
        &self.tracker
    }

    /// The shortcut currently triggered, if any
    pub fn active_shortcut(&self) -> Option<&ActiveShortcut> {
        self.active.as_ref()
    }

    /// Decide what happens to one hook event.
    ///
    /// Events carrying the synthetic marker pass through untouched. A key-down
    /// is looked up with the proposed set (held keys plus the new one) against
    /// app-specific shortcuts, global shortcuts and single-key remaps, in that
    /// order, and only then recorded in the tracker.
    pub fn handle_event(
        &mut self,
        event: &KeyEvent,
        tables: &RemapTables,
        host: &mut Host,
    ) -> HookDecision {
        if event.is_synthetic() {
            log::trace!("pass synthetic {} {}", event.key, event.action);
            return HookDecision::PassThrough;
        }
        log::trace!("hook {} {}", event.key, event.action);

        match event.action {
            KeyAction::Repeat => self.handle_repeat(event.key, host),
            // A second down for a held key is autorepeat, never a new press
            KeyAction::Down if self.tracker.is_pressed(event.key) => {
                self.handle_repeat(event.key, host)
            }
            KeyAction::Down => {
                let decision = self.handle_down(event.key, tables, host);
                self.tracker.apply(event);
                decision
            }
            KeyAction::Up => {
                self.tracker.apply(event);
                self.handle_up(event.key, host)
            }
        }
    }

    fn handle_down(&mut self, key: Key, tables: &RemapTables, host: &mut Host) -> HookDecision {
        if self.swallowed.contains(&key) {
            return HookDecision::Handled;
        }
        if self.active.is_some() {
            // Any other key ends the remap before it is looked up
            self.end_active(host);
        }
        if let Some(decision) = self.handle_app_shortcut(key, tables, host) {
            return decision;
        }
        if let Some(decision) = self.handle_global_shortcut(key, tables, host) {
            return decision;
        }
        if let Some(decision) = self.handle_single_key(key, tables, host) {
            return decision;
        }
        HookDecision::PassThrough
    }

    /// App-specific entry point. The foreground application is only asked
    /// for when the key can complete a shortcut and app remaps exist.
    pub fn handle_app_shortcut(
        &mut self,
        key: Key,
        tables: &RemapTables,
        host: &mut Host,
    ) -> Option<HookDecision> {
        if is_modifier(key) || !tables.has_app_shortcuts() {
            return None;
        }
        let app = host.foreground_application_name()?;
        let proposed = self.tracker.proposed_with(key);
        let found = match_app_shortcut(&proposed, &app, tables)?;
        log::trace!("foreground application {}", app);
        Some(self.trigger(found, key, host))
    }

    /// Global-shortcut entry point
    pub fn handle_global_shortcut(
        &mut self,
        key: Key,
        tables: &RemapTables,
        host: &mut Host,
    ) -> Option<HookDecision> {
        if is_modifier(key) {
            return None;
        }
        let proposed = self.tracker.proposed_with(key);
        let found = match_global_shortcut(&proposed, tables)?;
        Some(self.trigger(found, key, host))
    }

    /// Single-key entry point
    pub fn handle_single_key(
        &mut self,
        key: Key,
        tables: &RemapTables,
        host: &mut Host,
    ) -> Option<HookDecision> {
        if self.held_singles.iter().any(|(source, _)| *source == key) {
            return Some(self.handle_repeat(key, host));
        }
        let RemapMatch::SingleKey { target, .. } = match_single_key(key, tables)? else {
            return None;
        };
        log::debug!("single key {} -> {}", key, target);
        let held = self.output_held(key);
        let (batch, pressed) = synth::press_target(&target, &held);
        emit(host, &batch);
        self.held_singles.push((key, pressed));
        Some(HookDecision::Handled)
    }

    fn trigger(&mut self, found: RemapMatch, key: Key, host: &mut Host) -> HookDecision {
        let RemapMatch::Shortcut {
            class,
            source,
            target,
        } = found
        else {
            return HookDecision::PassThrough;
        };
        log::debug!("{:?} shortcut {} -> {}", class, source, target);
        let held = self.held_modifiers(key);
        let (batch, active) = synth::trigger_shortcut(&source, &target, key, &held);
        emit(host, &batch);
        self.active = Some(active);
        HookDecision::Handled
    }

    fn handle_up(&mut self, key: Key, host: &mut Host) -> HookDecision {
        if let Some(pos) = self.swallowed.iter().position(|k| *k == key) {
            self.swallowed.remove(pos);
            return HookDecision::Handled;
        }

        let released = self
            .active
            .as_ref()
            .map(|active| (release_kind(&active.source, key), active.lifted.contains(&key)));
        match released {
            Some((ReleaseKind::ActionKey, _)) => {
                self.release_active(host);
                return HookDecision::Handled;
            }
            Some((ReleaseKind::Modifier, lifted)) => {
                self.end_active(host);
                // A lifted modifier is already up on the output side
                return if lifted {
                    HookDecision::Handled
                } else {
                    HookDecision::PassThrough
                };
            }
            _ => {}
        }

        if let Some(pos) = self.held_singles.iter().position(|(k, _)| *k == key) {
            let (_, pressed) = self.held_singles.remove(pos);
            emit(host, &synth::release_target(&pressed));
            return HookDecision::Handled;
        }
        HookDecision::PassThrough
    }

    fn handle_repeat(&mut self, key: Key, host: &mut Host) -> HookDecision {
        if self.swallowed.contains(&key) {
            return HookDecision::Handled;
        }
        if let Some(active) = &self.active {
            if active.trigger_key == key {
                emit(host, &synth::repeat_shortcut(active));
                return HookDecision::Handled;
            }
        }
        if let Some((_, pressed)) = self.held_singles.iter().find(|(k, _)| *k == key) {
            emit(host, &synth::repeat_target(pressed));
            return HookDecision::Handled;
        }
        HookDecision::PassThrough
    }

    /// Release the active shortcut after its action key went up
    fn release_active(&mut self, host: &mut Host) {
        if let Some(active) = self.active.take() {
            let still_held = self.tracker.pressed_keys();
            log::debug!("release shortcut {}", active.source);
            emit(host, &synth::release_shortcut(&active, &still_held));
        }
    }

    /// End the active shortcut while its action key is still held. The
    /// action key's remaining events are swallowed until it goes up.
    fn end_active(&mut self, host: &mut Host) {
        if let Some(active) = self.active.take() {
            let still_held = self.tracker.pressed_keys();
            log::debug!("interrupt shortcut {}", active.source);
            emit(host, &synth::release_shortcut(&active, &still_held));
            if self.tracker.is_pressed(active.trigger_key) {
                self.swallowed.push(active.trigger_key);
            }
        }
    }

    /// Physically held keys besides `key` whose down reached applications:
    /// swallowed keys and single-key sources are excluded
    fn output_held(&self, key: Key) -> SmallVec<[Key; 8]> {
        self.tracker
            .pressed_keys()
            .into_iter()
            .filter(|k| *k != key && !self.swallowed.contains(k))
            .filter(|k| !self.held_singles.iter().any(|(source, _)| source == k))
            .collect()
    }

    /// Modifiers among [`Self::output_held`]
    fn held_modifiers(&self, key: Key) -> SmallVec<[Key; 8]> {
        let mut held = self.output_held(key);
        held.retain(|k| is_modifier(*k));
        held
    }

    /// Drop all state, e.g. after the input device was re-grabbed
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.active = None;
        self.swallowed.clear();
        self.held_singles.clear();
    }
}

fn emit(host: &mut Host, batch: &EventBatch) {
    if !batch.is_empty() {
        host.sink.send(batch);
    }
}
