// Keyswap Host Capabilities
// The narrow set of services the dispatcher needs from its platform

use std::fmt;

use crate::output::InputSink;

/// Source of the foreground application name.
///
/// Queried on the hook thread at most once per key-down, and only when
/// app-specific remaps are configured, so implementations must answer from
/// cached state rather than a round trip to the window manager.
pub trait ForegroundApp: Send {
    fn foreground_application_name(&self) -> Option<String>;
}

/// Provider for hosts without window tracking; app-specific remaps never fire
#[derive(Debug, Clone, Copy, Default)]
pub struct NoForegroundApp;

impl ForegroundApp for NoForegroundApp {
    fn foreground_application_name(&self) -> Option<String> {
        None
    }
}

/// Provider that always reports the same application
#[derive(Debug, Clone, Default)]
pub struct FixedForegroundApp(pub Option<String>);

impl FixedForegroundApp {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Some(name.into()))
    }
}

impl ForegroundApp for FixedForegroundApp {
    fn foreground_application_name(&self) -> Option<String> {
        self.0.clone()
    }
}

impl<F> ForegroundApp for F
where
    F: Fn() -> Option<String> + Send,
{
    fn foreground_application_name(&self) -> Option<String> {
        self()
    }
}

/// Everything the dispatcher reaches outside itself: where synthesized
/// input goes and which application has focus.
///
/// Installing the interception hook stays with whoever drives the engine
/// (see `event::EventLoop` for the evdev host).
pub struct Host {
    pub sink: Box<dyn InputSink + Send>,
    pub foreground: Box<dyn ForegroundApp>,
}

impl Host {
    pub fn new(sink: impl InputSink + Send + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            foreground: Box::new(NoForegroundApp),
        }
    }

    /// Replace the foreground-application provider
    pub fn with_foreground(mut self, foreground: impl ForegroundApp + 'static) -> Self {
        self.foreground = Box::new(foreground);
        self
    }

    pub fn foreground_application_name(&self) -> Option<String> {
        self.foreground.foreground_application_name()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
