//! Operating system input injection
//!
//! Everything the mapping engine can make happen on the desktop goes through the
//! [`ActionSink`] trait. Calls are fire-and-forget: implementations log their own
//! failures and never report back to the engine.
//!
//! One implementation per platform is selected at build time:
//!
//! | Target  | Sink                        | Mechanism                    |
//! |---------|-----------------------------|------------------------------|
//! | Linux   | [`uinput::UinputSink`]      | evdev virtual device (uinput)|
//! | Windows | [`windows::SendInputSink`]  | Win32 `SendInput`            |
//! | other   | `log_sink::LogSink`         | tracing output only          |

#[cfg(not(any(target_os = "linux", windows)))]
pub mod log_sink;
#[cfg(test)]
pub mod recording;
#[cfg(target_os = "linux")]
pub mod uinput;
#[cfg(windows)]
pub mod windows;

use std::fmt;
use thiserror::Error;

/// Name the virtual device announces to the system
pub const DEVICE_NAME: &str = "padmouse virtual pointer";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Plain keys that are tapped directly
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyId {
    Escape,
    Enter,
    Super,
}

/// Named desktop shortcuts and media keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemAction {
    VoiceInput,
    AltTab,
    TaskView,
    Screenshot,
    MediaPlayPause,
    MediaNext,
    MediaPrevious,
    VolumeUp,
    VolumeDown,
    VolumeMute,
    BrowserBack,
    BrowserForward,
}

impl fmt::Display for SystemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SystemAction::VoiceInput => "voice input",
            SystemAction::AltTab => "alt-tab",
            SystemAction::TaskView => "task view",
            SystemAction::Screenshot => "screenshot",
            SystemAction::MediaPlayPause => "media play/pause",
            SystemAction::MediaNext => "media next",
            SystemAction::MediaPrevious => "media previous",
            SystemAction::VolumeUp => "volume up",
            SystemAction::VolumeDown => "volume down",
            SystemAction::VolumeMute => "volume mute",
            SystemAction::BrowserBack => "browser back",
            SystemAction::BrowserForward => "browser forward",
        };
        f.write_str(name)
    }
}

/// Errors from opening a platform sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create virtual input device: {0}")]
    CreateDevice(#[source] std::io::Error),
}

/// Capability set the mapping engine drives.
pub trait ActionSink {
    /// Relative pointer motion in pixels, positive `dy` moves down
    fn pointer_move(&mut self, dx: i32, dy: i32);

    fn pointer_down(&mut self, button: PointerButton);

    fn pointer_up(&mut self, button: PointerButton);

    fn click(&mut self, button: PointerButton) {
        self.pointer_down(button);
        self.pointer_up(button);
    }

    /// Wheel notches, positive scrolls away from the user
    fn scroll(&mut self, amount: i32);

    fn key_tap(&mut self, key: KeyId);

    fn system(&mut self, action: SystemAction);
}

impl<T: ActionSink + ?Sized> ActionSink for Box<T> {
    fn pointer_move(&mut self, dx: i32, dy: i32) {
        (**self).pointer_move(dx, dy)
    }

    fn pointer_down(&mut self, button: PointerButton) {
        (**self).pointer_down(button)
    }

    fn pointer_up(&mut self, button: PointerButton) {
        (**self).pointer_up(button)
    }

    fn click(&mut self, button: PointerButton) {
        (**self).click(button)
    }

    fn scroll(&mut self, amount: i32) {
        (**self).scroll(amount)
    }

    fn key_tap(&mut self, key: KeyId) {
        (**self).key_tap(key)
    }

    fn system(&mut self, action: SystemAction) {
        (**self).system(action)
    }
}

/// Opens the sink for the platform this binary was built for.
#[cfg(target_os = "linux")]
pub fn open_default_sink() -> Result<Box<dyn ActionSink>, SinkError> {
    Ok(Box::new(uinput::UinputSink::create(DEVICE_NAME)?))
}

/// Opens the sink for the platform this binary was built for.
#[cfg(windows)]
pub fn open_default_sink() -> Result<Box<dyn ActionSink>, SinkError> {
    Ok(Box::new(windows::SendInputSink::new()))
}

/// Opens the sink for the platform this binary was built for.
#[cfg(not(any(target_os = "linux", windows)))]
pub fn open_default_sink() -> Result<Box<dyn ActionSink>, SinkError> {
    tracing::warn!("No input injection backend for this platform, actions are only logged");
    Ok(Box::new(log_sink::LogSink))
}
