// Keyswap Event Loop
// Grabs keyboards through evdev and feeds their key events to the engine

use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};

use evdev::{Device, EventType, InputEvent};

use crate::hook::HookDecision;
use crate::input::{DeviceCapabilities, DeviceFilter};
use crate::output::KeyEvent;
use crate::{Key, KeyAction, RemapEngine};

/// Result type for event loop operations
pub type EventLoopResult<T> = Result<T, EventLoopError>;

/// Errors that can occur in the event loop
#[derive(Debug, thiserror::Error)]
pub enum EventLoopError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An input device as listed for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: String,
    pub path: String,
    pub is_keyboard: bool,
}

/// Poll timeout, so the loop notices a shutdown request without input
const POLL_TIMEOUT_MS: i32 = 200;

/// Convert one raw evdev event. Anything other than a key event is dropped.
pub fn key_event_from_raw(event: &InputEvent) -> Option<KeyEvent> {
    if event.event_type() != EventType::KEY {
        return None;
    }
    let action = KeyAction::from_evdev_value(event.value())?;
    Some(KeyEvent::new(Key(event.code()), action))
}

fn capabilities(device: &Device) -> DeviceCapabilities {
    DeviceCapabilities::new(
        device.supported_events().contains(EventType::KEY),
        device
            .supported_keys()
            .map(|keys| keys.iter().map(|k| k.code()).collect())
            .unwrap_or_default(),
    )
}

/// The grabbed keyboards.
///
/// While grabbed, no other reader sees their events: everything the engine
/// passes through is re-emitted on the virtual keyboard via
/// [`RemapEngine::forward`].
pub struct EventLoop {
    devices: Vec<Device>,
    poll_fds: Vec<libc::pollfd>,
    grabbed: bool,
}

impl EventLoop {
    /// Every input device that reports key events
    pub fn list_devices() -> Vec<DeviceInfo> {
        evdev::enumerate()
            .filter_map(|(path, device)| {
                let caps = capabilities(&device);
                caps.has_ev_key.then(|| DeviceInfo {
                    name: device.name().unwrap_or("Unknown").to_string(),
                    path: path.display().to_string(),
                    is_keyboard: caps.is_keyboard(),
                })
            })
            .collect()
    }

    /// Open and grab every device `filter` accepts
    pub fn grab(filter: &DeviceFilter) -> EventLoopResult<Self> {
        let mut devices: Vec<Device> = evdev::enumerate()
            .filter(|(path, device)| {
                filter.accepts(
                    device.name().unwrap_or("Unknown"),
                    path.to_str().unwrap_or_default(),
                    &capabilities(device),
                )
            })
            .map(|(_, device)| device)
            .collect();

        if devices.is_empty() {
            return Err(EventLoopError::DeviceNotFound(
                "No keyboard devices found".to_string(),
            ));
        }

        // A previous instance may have died holding the grab
        for device in &mut devices {
            let _ = device.ungrab();
        }
        for device in &mut devices {
            device.grab()?;
            log::info!("grabbed {}", device.name().unwrap_or("Unknown"));
        }

        let poll_fds = devices
            .iter()
            .map(|d| libc::pollfd {
                fd: d.as_raw_fd(),
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();
        Ok(Self {
            devices,
            poll_fds,
            grabbed: true,
        })
    }

    pub fn device_names(&self) -> Vec<String> {
        self.devices
            .iter()
            .map(|d| d.name().unwrap_or("Unknown").to_string())
            .collect()
    }

    /// Wait up to `timeout_ms` for key events from any grabbed device.
    ///
    /// A signal interrupting the wait yields an empty batch.
    pub fn poll(&mut self, timeout_ms: i32) -> EventLoopResult<Vec<KeyEvent>> {
        let mut events = Vec::new();

        let ready = unsafe {
            libc::poll(
                self.poll_fds.as_mut_ptr(),
                self.poll_fds.len() as libc::nfds_t,
                timeout_ms,
            )
        };
        if ready < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == std::io::ErrorKind::Interrupted {
                return Ok(events);
            }
            return Err(EventLoopError::Io(err));
        }
        if ready == 0 {
            return Ok(events);
        }

        for (device, fd) in self.devices.iter_mut().zip(&self.poll_fds) {
            if fd.revents & libc::POLLIN == 0 {
                continue;
            }
            match device.fetch_events() {
                Ok(raw) => events.extend(raw.filter_map(|e| key_event_from_raw(&e))),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => return Err(EventLoopError::Io(e)),
            }
        }
        Ok(events)
    }

    /// Dispatch events until `shutdown` is set (by a signal handler).
    ///
    /// Pass-through events are forwarded unchanged; handled ones were already
    /// replaced by the engine's own output.
    pub fn run(&mut self, engine: &mut RemapEngine, shutdown: &AtomicBool) -> EventLoopResult<()> {
        while !shutdown.load(Ordering::SeqCst) {
            for event in self.poll(POLL_TIMEOUT_MS)? {
                if engine.handle_key_event(&event) == HookDecision::PassThrough {
                    engine.forward(&event);
                }
            }
        }
        log::info!("event loop stopped");
        Ok(())
    }

    pub fn ungrab_all(&mut self) {
        if self.grabbed {
            for device in &mut self.devices {
                let _ = device.ungrab();
            }
            self.grabbed = false;
        }
    }
}

// A keyboard left grabbed after exit or panic stays dead until replugged
impl Drop for EventLoop {
    fn drop(&mut self) {
        self.ungrab_all();
    }
}
