// Keyswap Event Handling
// evdev grab loop driving the engine

pub mod r#loop;

pub use r#loop::{key_event_from_raw, DeviceInfo, EventLoop, EventLoopError, EventLoopResult};
