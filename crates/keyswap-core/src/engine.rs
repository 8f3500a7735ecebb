// Keyswap Remap Engine
// One owned instance tying the table store, the dispatcher and the host together

use std::sync::Arc;

use crate::hook::{Dispatcher, HookDecision, Host};
use crate::output::KeyEvent;
use crate::tables::{RemapTableStore, RemapTables};
use crate::validate::{build_tables, validate_buffer, RemapBuffer, ValidationReport};

/// The remapping engine.
///
/// Constructed once at startup and handed to the hook by reference. The hook
/// thread calls [`RemapEngine::handle_key_event`]; a configuration thread
/// commits through a cloned [`RemapEngine::store`] handle or [`RemapEngine::apply`].
#[derive(Debug)]
pub struct RemapEngine {
    store: Arc<RemapTableStore>,
    dispatcher: Dispatcher,
    host: Host,
}

impl RemapEngine {
    /// An engine with empty tables
    pub fn new(host: Host) -> Self {
        Self::with_store(Arc::new(RemapTableStore::new()), host)
    }

    /// An engine reading from an existing store
    pub fn with_store(store: Arc<RemapTableStore>, host: Host) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(),
            host,
        }
    }

    /// Hook trampoline target: decide one event.
    ///
    /// Reads the current table snapshot once and never blocks beyond that.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> HookDecision {
        let tables = self.store.snapshot();
        self.dispatcher.handle_event(event, &tables, &mut self.host)
    }

    /// Deliver an event the hook passed through. Hosts that swallow every
    /// device event (an evdev grab) must re-emit pass-through input themselves.
    pub fn forward(&mut self, event: &KeyEvent) {
        self.host.sink.send(std::slice::from_ref(event));
    }

    /// Validate `buffer` and publish it when it is accepted.
    ///
    /// Returns the report either way; on rejection the active tables are
    /// left untouched.
    pub fn apply(&self, buffer: &RemapBuffer) -> Result<ValidationReport, ValidationReport> {
        apply_buffer(&self.store, buffer)
    }

    /// Publish already-validated tables
    pub fn publish(&self, tables: RemapTables) {
        self.store.swap(tables);
    }

    /// Shared handle to the table store
    pub fn store(&self) -> Arc<RemapTableStore> {
        Arc::clone(&self.store)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn host_mut(&mut self) -> &mut Host {
        &mut self.host
    }

    /// Forget all key state, e.g. after the devices were re-grabbed
    pub fn reset(&mut self) {
        self.dispatcher.reset();
    }
}

/// Validate `buffer` and publish it into `store` when accepted
pub fn apply_buffer(
    store: &RemapTableStore,
    buffer: &RemapBuffer,
) -> Result<ValidationReport, ValidationReport> {
    let report = validate_buffer(buffer);
    if !report.is_ok() {
        log::warn!("remap buffer rejected: {}", report);
        return Err(report);
    }
    if !report.orphaned.is_empty() {
        log::info!("orphaned keys: {:?}", report.orphaned);
    }
    store.swap(build_tables(buffer));
    Ok(report)
}
