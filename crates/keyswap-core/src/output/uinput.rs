// Keyswap uinput Output Layer
// Virtual keyboard that delivers synthesized and forwarded events to the kernel

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent};

use super::event::{InputSink, KeyEvent};
use crate::input::VIRTUAL_DEVICE_PREFIX;

/// Errors from the uinput device
#[derive(Debug, thiserror::Error)]
pub enum UInputError {
    #[error("Failed to create virtual device: {0}")]
    DeviceCreation(String),

    #[error("Failed to write event: {0}")]
    WriteError(String),
}

/// Highest physical key code the virtual keyboard advertises
const MAX_VIRTUAL_KEY: u16 = 0x2ff;

/// A uinput keyboard. Every batch is written as KEY events followed by a
/// single SYN_REPORT.
pub struct VirtualKeyboard {
    device: VirtualDevice,
    written: u64,
}

impl VirtualKeyboard {
    /// Create the device; requires write access to `/dev/uinput`
    pub fn new() -> Result<Self, UInputError> {
        let mut keys = AttributeSet::new();
        for code in 1..MAX_VIRTUAL_KEY {
            keys.insert(evdev::Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .map_err(|e: std::io::Error| UInputError::DeviceCreation(e.to_string()))?
            .name(&format!("{} Keyboard", VIRTUAL_DEVICE_PREFIX))
            .with_keys(&keys)
            .map_err(|e: std::io::Error| UInputError::DeviceCreation(e.to_string()))?
            .build()
            .map_err(|e: std::io::Error| UInputError::DeviceCreation(e.to_string()))?;

        log::info!("created virtual keyboard");
        Ok(Self { device, written: 0 })
    }

    /// Write a batch, skipping keys no physical keyboard could produce
    pub fn write(&mut self, events: &[KeyEvent]) -> Result<(), UInputError> {
        let mut raw: Vec<InputEvent> = events
            .iter()
            .filter(|event| {
                let physical = event.key.is_physical();
                if !physical {
                    log::warn!("dropping non-physical key {} from output", event.key);
                }
                physical
            })
            .map(|event| {
                InputEvent::new(EventType::KEY, event.key.code(), event.action.evdev_value())
            })
            .collect();
        if raw.is_empty() {
            return Ok(());
        }
        raw.push(InputEvent::new(EventType::SYNCHRONIZATION, 0, 0));

        self.device
            .emit(&raw)
            .map_err(|e: std::io::Error| UInputError::WriteError(e.to_string()))?;
        self.written += (raw.len() - 1) as u64;
        Ok(())
    }

    /// Key events written so far
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl std::fmt::Debug for VirtualKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualKeyboard")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl InputSink for VirtualKeyboard {
    fn send(&mut self, events: &[KeyEvent]) {
        if let Err(e) = self.write(events) {
            log::warn!("uinput write failed: {}", e);
        }
    }
}
