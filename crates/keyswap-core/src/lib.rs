// Keyswap Core Library
// Real-time key and shortcut remapping engine with an offline remap validator

pub mod action;
pub mod config;
pub mod engine;
pub mod hook;
pub mod input;
pub mod key;
pub mod matcher;
pub mod modifier;
pub mod output;
pub mod shortcut;
pub mod state;
pub mod tables;
pub mod validate;

#[cfg(feature = "pure-rust")]
pub mod event;

pub use action::KeyAction;
pub use config::{ConfigError, RemapConfig};
pub use engine::{apply_buffer, RemapEngine};
pub use hook::{Dispatcher, FixedForegroundApp, ForegroundApp, HookDecision, Host, NoForegroundApp};
pub use input::{DeviceCapabilities, DeviceFilter};
pub use key::Key;
pub use matcher::{
    match_app_shortcut, match_global_shortcut, match_single_key, release_kind, ReleaseKind,
    RemapMatch, TableClass,
};
pub use modifier::{ModifierFamily, ModifierSide};
pub use output::{InputSink, KeyEvent, RecordingSink, SimulatedKeyboard, SYNTHETIC_MARKER};
pub use shortcut::{RemapTarget, Shortcut, ShortcutError};
pub use state::KeyStateTracker;
pub use tables::{RemapTableStore, RemapTables};
pub use validate::{
    commit, validate_buffer, validate_slot, Column, ColumnKind, RemapBuffer, RemapRow,
    SlotDirective, SlotEdit, ValidationError, ValidationReport,
};

#[cfg(feature = "pure-rust")]
pub use event::{EventLoop, EventLoopError, EventLoopResult};
#[cfg(feature = "pure-rust")]
pub use output::{UInputError, VirtualKeyboard};
