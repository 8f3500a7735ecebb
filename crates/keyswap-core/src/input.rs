// Keyswap Input Layer
// Choosing which input devices the event loop grabs

use crate::Key;

/// Name prefix of the virtual keyboard the output layer creates
pub const VIRTUAL_DEVICE_PREFIX: &str = "Keyswap (virtual)";

// Q W E R T Y, then A Z SPACE
const KEYBOARD_PROBE: [Key; 9] = [
    Key::Q,
    Key::W,
    Key::E,
    Key::R,
    Key::T,
    Key::Y,
    Key::A,
    Key::Z,
    Key::SPACE,
];

/// The parts of a device's capabilities that decide whether it is a keyboard
#[derive(Debug, Clone, Default)]
pub struct DeviceCapabilities {
    pub has_ev_key: bool,
    pub supported_keys: Vec<u16>,
}

impl DeviceCapabilities {
    pub fn new(has_ev_key: bool, supported_keys: Vec<u16>) -> Self {
        Self {
            has_ev_key,
            supported_keys,
        }
    }

    /// A keyboard reports EV_KEY plus the letter row and space bar.
    /// Mice and media remotes report EV_KEY too, but not these.
    pub fn is_keyboard(&self) -> bool {
        self.has_ev_key
            && KEYBOARD_PROBE
                .iter()
                .all(|key| self.supported_keys.contains(&key.code()))
    }
}

/// True for devices this program created itself
pub fn is_virtual_device(name: &str) -> bool {
    name.starts_with(VIRTUAL_DEVICE_PREFIX)
}

/// Which devices to grab: either an explicit list of names or paths, or
/// every real keyboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilter {
    names: Vec<String>,
}

impl DeviceFilter {
    /// Autodetect keyboards
    pub fn autodetect() -> Self {
        Self::default()
    }

    /// Only the named devices (matched by name or by `/dev/input` path)
    pub fn named(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_autodetect(&self) -> bool {
        self.names.is_empty()
    }

    /// Decide one device. Our own virtual keyboard is never grabbed, even
    /// when named, since reading it back would loop synthesized output.
    pub fn accepts(&self, name: &str, path: &str, capabilities: &DeviceCapabilities) -> bool {
        if is_virtual_device(name) {
            return false;
        }
        if self.is_autodetect() {
            return capabilities.is_keyboard();
        }
        self.names.iter().any(|wanted| wanted == name || wanted == path)
    }
}
