// Keyswap Output Layer
// Synthesized events and the sinks that deliver them

mod event;
mod mock;
pub mod synth;

#[cfg(feature = "pure-rust")]
mod uinput;

pub use event::{InputSink, KeyEvent, SYNTHETIC_MARKER};
pub use mock::{RecordingSink, SimulatedKeyboard};
pub use synth::{ActiveShortcut, EventBatch};

#[cfg(feature = "pure-rust")]
pub use uinput::{UInputError, VirtualKeyboard};
