//! Win32 `SendInput` backend

use super::{ActionSink, KeyId, PointerButton, SystemAction};
use std::mem::size_of;
use tracing::{debug, warn};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYEVENTF_KEYUP,
    MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP,
    MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY, VK_BROWSER_BACK, VK_BROWSER_FORWARD, VK_ESCAPE,
    VK_LSHIFT, VK_LWIN, VK_MEDIA_NEXT_TRACK, VK_MEDIA_PLAY_PAUSE, VK_MEDIA_PREV_TRACK, VK_MENU,
    VK_RETURN, VK_TAB, VK_VOLUME_DOWN, VK_VOLUME_MUTE, VK_VOLUME_UP,
};
use windows_sys::Win32::UI::WindowsAndMessaging::WHEEL_DELTA;

const VK_H: VIRTUAL_KEY = b'H' as VIRTUAL_KEY;
const VK_S: VIRTUAL_KEY = b'S' as VIRTUAL_KEY;

/// `SendInput` backed [`ActionSink`]
#[derive(Debug, Default)]
pub struct SendInputSink;

impl SendInputSink {
    pub fn new() -> Self {
        Self
    }

    fn send(&self, inputs: &[INPUT]) {
        // SAFETY: `inputs` is a valid slice of initialized INPUT structs for the
        // duration of the call and cbsize matches the struct layout.
        let sent = unsafe {
            SendInput(
                inputs.len() as u32,
                inputs.as_ptr(),
                size_of::<INPUT>() as i32,
            )
        };
        if sent as usize != inputs.len() {
            warn!("SendInput injected {} of {} events", sent, inputs.len());
        }
    }

    fn mouse(&self, dx: i32, dy: i32, data: i32, flags: MOUSE_EVENT_FLAGS) {
        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx,
                    dy,
                    mouseData: data,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        self.send(&[input]);
    }

    fn key(&self, vk: VIRTUAL_KEY, pressed: bool) {
        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: 0,
                    dwFlags: if pressed { 0 } else { KEYEVENTF_KEYUP },
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        self.send(&[input]);
    }

    fn tap_chord(&self, keys: &[VIRTUAL_KEY]) {
        for vk in keys {
            self.key(*vk, true);
        }
        for vk in keys.iter().rev() {
            self.key(*vk, false);
        }
    }
}

fn button_flags(button: PointerButton) -> (MOUSE_EVENT_FLAGS, MOUSE_EVENT_FLAGS) {
    match button {
        PointerButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
        PointerButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
        PointerButton::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
    }
}

fn virtual_key(key: KeyId) -> VIRTUAL_KEY {
    match key {
        KeyId::Escape => VK_ESCAPE,
        KeyId::Enter => VK_RETURN,
        KeyId::Super => VK_LWIN,
    }
}

fn system_chord(action: SystemAction) -> &'static [VIRTUAL_KEY] {
    match action {
        SystemAction::VoiceInput => &[VK_LWIN, VK_H],
        SystemAction::AltTab => &[VK_MENU, VK_TAB],
        SystemAction::TaskView => &[VK_LWIN, VK_TAB],
        SystemAction::Screenshot => &[VK_LWIN, VK_LSHIFT, VK_S],
        SystemAction::MediaPlayPause => &[VK_MEDIA_PLAY_PAUSE],
        SystemAction::MediaNext => &[VK_MEDIA_NEXT_TRACK],
        SystemAction::MediaPrevious => &[VK_MEDIA_PREV_TRACK],
        SystemAction::VolumeUp => &[VK_VOLUME_UP],
        SystemAction::VolumeDown => &[VK_VOLUME_DOWN],
        SystemAction::VolumeMute => &[VK_VOLUME_MUTE],
        SystemAction::BrowserBack => &[VK_BROWSER_BACK],
        SystemAction::BrowserForward => &[VK_BROWSER_FORWARD],
    }
}

impl ActionSink for SendInputSink {
    fn pointer_move(&mut self, dx: i32, dy: i32) {
        if dx == 0 && dy == 0 {
            return;
        }
        self.mouse(dx, dy, 0, MOUSEEVENTF_MOVE);
    }

    fn pointer_down(&mut self, button: PointerButton) {
        self.mouse(0, 0, 0, button_flags(button).0);
    }

    fn pointer_up(&mut self, button: PointerButton) {
        self.mouse(0, 0, 0, button_flags(button).1);
    }

    fn scroll(&mut self, amount: i32) {
        if amount == 0 {
            return;
        }
        self.mouse(0, 0, amount * WHEEL_DELTA as i32, MOUSEEVENTF_WHEEL);
    }

    fn key_tap(&mut self, key: KeyId) {
        self.tap_chord(&[virtual_key(key)]);
    }

    fn system(&mut self, action: SystemAction) {
        debug!("Sending shortcut for {}", action);
        self.tap_chord(system_chord(action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screenshot_uses_snipping_shortcut() {
        let chord = system_chord(SystemAction::Screenshot);
        assert_eq!(chord, &[VK_LWIN, VK_LSHIFT, VK_S]);
    }

    #[test]
    fn every_system_action_has_a_shortcut() {
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
            let chord = system_chord(action);
            assert!(!chord.is_empty(), "no shortcut for {}", action);
            for (i, vk) in chord.iter().enumerate() {
                assert!(!chord[i + 1..].contains(vk), "{} repeats a key", action);
            }
        }
        assert_eq!(system_chord(SystemAction::AltTab), &[VK_MENU, VK_TAB]);
    }
}
