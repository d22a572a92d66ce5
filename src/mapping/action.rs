//! Closed set of behaviors an input can be bound to

use crate::output::{KeyId, PointerButton, SystemAction};
use std::fmt;

/// Step applied by one sensitivity action press
pub const SENSITIVITY_STEP: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensitivityTarget {
    Mouse,
    Scroll,
}

impl fmt::Display for SensitivityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensitivityTarget::Mouse => f.write_str("mouse"),
            SensitivityTarget::Scroll => f.write_str("scroll"),
        }
    }
}

/// Compiled form of an action name.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Held button: down on press, up on release
    Pointer(PointerButton),
    /// Full click on press
    Click(PointerButton),
    KeyTap(KeyId),
    System(SystemAction),
    AdjustSensitivity {
        target: SensitivityTarget,
        step: f32,
    },
    Exit,
    Unbound,
    Unknown(String),
}

// (name, action) pairs for every recognized name
static NAMED_ACTIONS: [(&str, Action); 23] = [
    ("left_click", Action::Pointer(PointerButton::Left)),
    ("right_click", Action::Pointer(PointerButton::Right)),
    ("middle_click", Action::Click(PointerButton::Middle)),
    ("media_play_pause", Action::System(SystemAction::MediaPlayPause)),
    ("media_next", Action::System(SystemAction::MediaNext)),
    ("media_previous", Action::System(SystemAction::MediaPrevious)),
    ("voice_input", Action::System(SystemAction::VoiceInput)),
    ("alt_tab", Action::System(SystemAction::AltTab)),
    ("win_tab", Action::System(SystemAction::TaskView)),
    ("screenshot", Action::System(SystemAction::Screenshot)),
    ("volume_up", Action::System(SystemAction::VolumeUp)),
    ("volume_down", Action::System(SystemAction::VolumeDown)),
    ("volume_mute", Action::System(SystemAction::VolumeMute)),
    ("browser_back", Action::System(SystemAction::BrowserBack)),
    ("browser_forward", Action::System(SystemAction::BrowserForward)),
    ("escape", Action::KeyTap(KeyId::Escape)),
    ("enter", Action::KeyTap(KeyId::Enter)),
    ("windows_key", Action::KeyTap(KeyId::Super)),
    (
        "increase_mouse_sensitivity",
        Action::AdjustSensitivity {
            target: SensitivityTarget::Mouse,
            step: SENSITIVITY_STEP,
        },
    ),
    (
        "decrease_mouse_sensitivity",
        Action::AdjustSensitivity {
            target: SensitivityTarget::Mouse,
            step: -SENSITIVITY_STEP,
        },
    ),
    (
        "increase_scroll_sensitivity",
        Action::AdjustSensitivity {
            target: SensitivityTarget::Scroll,
            step: SENSITIVITY_STEP,
        },
    ),
    (
        "decrease_scroll_sensitivity",
        Action::AdjustSensitivity {
            target: SensitivityTarget::Scroll,
            step: -SENSITIVITY_STEP,
        },
    ),
    ("exit", Action::Exit),
];

impl Action {
    /// Compiles an action name. Never fails: empty names are `Unbound`,
    /// unrecognized ones `Unknown`.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.is_empty() {
            return Action::Unbound;
        }
        NAMED_ACTIONS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, action)| action.clone())
            .unwrap_or_else(|| Action::Unknown(name.to_string()))
    }

    /// Canonical name, empty for `Unbound`
    pub fn name(&self) -> &str {
        match self {
            Action::Unbound => "",
            Action::Unknown(name) => name.as_str(),
            known => NAMED_ACTIONS
                .iter()
                .find(|(_, action)| action == known)
                .map(|(name, _)| *name)
                .unwrap_or(""),
        }
    }

    /// Every recognized action name, in table order
    #[cfg(test)]
    pub fn known_names() -> impl Iterator<Item = &'static str> {
        NAMED_ACTIONS.iter().map(|(name, _)| *name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Unbound => f.write_str("(unbound)"),
            other => f.write_str(other.name()),
        }
    }
}
