//! Virtual pointer/keyboard device using evdev/uinput
//!
//! Creates one virtual device that carries relative motion, the wheel, the three
//! pointer buttons and every key the action table can tap. It shows up to the
//! desktop like any other mouse and keyboard, under X11 and Wayland alike.

use super::{ActionSink, KeyId, PointerButton, SinkError, SystemAction};
use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use tracing::{debug, info, warn};

const POINTER_KEYS: [Key; 3] = [Key::BTN_LEFT, Key::BTN_RIGHT, Key::BTN_MIDDLE];

const KEYBOARD_KEYS: [Key; 17] = [
    Key::KEY_ESC,
    Key::KEY_ENTER,
    Key::KEY_LEFTMETA,
    Key::KEY_LEFTALT,
    Key::KEY_LEFTSHIFT,
    Key::KEY_TAB,
    Key::KEY_H,
    Key::KEY_S,
    Key::KEY_SYSRQ,
    Key::KEY_PLAYPAUSE,
    Key::KEY_NEXTSONG,
    Key::KEY_PREVIOUSSONG,
    Key::KEY_VOLUMEUP,
    Key::KEY_VOLUMEDOWN,
    Key::KEY_MUTE,
    Key::KEY_BACK,
    Key::KEY_FORWARD,
];

/// uinput backed [`ActionSink`]
pub struct UinputSink {
    device: VirtualDevice,
}

impl UinputSink {
    /// Create the virtual device
    ///
    /// Needs write access to `/dev/uinput`.
    pub fn create(name: &str) -> Result<Self, SinkError> {
        let mut keys = AttributeSet::<Key>::new();
        for key in POINTER_KEYS.iter().chain(KEYBOARD_KEYS.iter()) {
            keys.insert(*key);
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);
        axes.insert(RelativeAxisType::REL_WHEEL);

        let device = VirtualDeviceBuilder::new()
            .map_err(SinkError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(SinkError::CreateDevice)?
            .with_relative_axes(&axes)
            .map_err(SinkError::CreateDevice)?
            .build()
            .map_err(SinkError::CreateDevice)?;

        info!("Created uinput device: {}", name);
        Ok(Self { device })
    }

    fn emit(&mut self, events: &[InputEvent]) {
        if let Err(e) = self.device.emit(events) {
            warn!("Failed to emit input events: {}", e);
        }
    }

    fn key_event(&mut self, key: Key, pressed: bool) {
        let event = InputEvent::new(EventType::KEY, key.code(), i32::from(pressed));
        self.emit(&[event]);
    }

    // Press in order, release in reverse; each transition is its own report
    fn tap_chord(&mut self, keys: &[Key]) {
        for key in keys {
            self.key_event(*key, true);
        }
        for key in keys.iter().rev() {
            self.key_event(*key, false);
        }
    }
}

fn pointer_key(button: PointerButton) -> Key {
    match button {
        PointerButton::Left => Key::BTN_LEFT,
        PointerButton::Right => Key::BTN_RIGHT,
        PointerButton::Middle => Key::BTN_MIDDLE,
    }
}

fn key_for(key: KeyId) -> Key {
    match key {
        KeyId::Escape => Key::KEY_ESC,
        KeyId::Enter => Key::KEY_ENTER,
        KeyId::Super => Key::KEY_LEFTMETA,
    }
}

// Empty chord: no sensible desktop-independent shortcut exists
fn system_chord(action: SystemAction) -> &'static [Key] {
    match action {
        SystemAction::VoiceInput => &[],
        SystemAction::AltTab => &[Key::KEY_LEFTALT, Key::KEY_TAB],
        SystemAction::TaskView => &[Key::KEY_LEFTMETA, Key::KEY_TAB],
        SystemAction::Screenshot => &[Key::KEY_SYSRQ],
        SystemAction::MediaPlayPause => &[Key::KEY_PLAYPAUSE],
        SystemAction::MediaNext => &[Key::KEY_NEXTSONG],
        SystemAction::MediaPrevious => &[Key::KEY_PREVIOUSSONG],
        SystemAction::VolumeUp => &[Key::KEY_VOLUMEUP],
        SystemAction::VolumeDown => &[Key::KEY_VOLUMEDOWN],
        SystemAction::VolumeMute => &[Key::KEY_MUTE],
        SystemAction::BrowserBack => &[Key::KEY_BACK],
        SystemAction::BrowserForward => &[Key::KEY_FORWARD],
    }
}

impl ActionSink for UinputSink {
    fn pointer_move(&mut self, dx: i32, dy: i32) {
        let mut events = Vec::with_capacity(2);
        if dx != 0 {
            events.push(InputEvent::new(
                EventType::RELATIVE,
                RelativeAxisType::REL_X.0,
                dx,
            ));
        }
        if dy != 0 {
            events.push(InputEvent::new(
                EventType::RELATIVE,
                RelativeAxisType::REL_Y.0,
                dy,
            ));
        }
        if !events.is_empty() {
            self.emit(&events);
        }
    }

    fn pointer_down(&mut self, button: PointerButton) {
        self.key_event(pointer_key(button), true);
    }

    fn pointer_up(&mut self, button: PointerButton) {
        self.key_event(pointer_key(button), false);
    }

    fn scroll(&mut self, amount: i32) {
        if amount == 0 {
            return;
        }
        let event = InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_WHEEL.0, amount);
        self.emit(&[event]);
    }

    fn key_tap(&mut self, key: KeyId) {
        self.tap_chord(&[key_for(key)]);
    }

    fn system(&mut self, action: SystemAction) {
        let chord = system_chord(action);
        if chord.is_empty() {
            debug!("No shortcut for {} on this platform", action);
            return;
        }
        self.tap_chord(chord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chord_key_is_registered_on_the_device() {
        let actions = [
            SystemAction::VoiceInput,
            SystemAction::AltTab,
            SystemAction::TaskView,
            SystemAction::Screenshot,
            SystemAction::MediaPlayPause,
            SystemAction::MediaNext,
            SystemAction::MediaPrevious,
            SystemAction::VolumeUp,
            SystemAction::VolumeDown,
            SystemAction::VolumeMute,
            SystemAction::BrowserBack,
            SystemAction::BrowserForward,
        ];
        for action in actions {
            for key in system_chord(action) {
                assert!(KEYBOARD_KEYS.contains(key), "{:?} missing for {}", key, action);
            }
        }
        for key in [KeyId::Escape, KeyId::Enter, KeyId::Super] {
            assert!(KEYBOARD_KEYS.contains(&key_for(key)));
        }
    }

    #[test]
    #[ignore] // Requires uinput access (run with: cargo test -- --ignored)
    fn test_create_sink() {
        let sink = UinputSink::create("padmouse test device");
        assert!(sink.is_ok());
    }
}
