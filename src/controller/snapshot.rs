//! Per-tick controller state
//!
//! A [`ControllerSnapshot`] is the only thing the mapping engine ever sees from the
//! hardware. Sticks are normalized to `[-1.0, 1.0]` with Y growing downward (screen
//! convention), triggers to `[0.0, 1.0]`.

use std::fmt;

/// Trigger travel above which a trigger counts as a pressed digital input
pub const TRIGGER_PRESS_THRESHOLD: f32 = 0.5;

// Every input that can carry an action binding.
// Declaration order is the evaluation order used for edge detection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputId {
    ButtonA,
    ButtonB,
    ButtonX,
    ButtonY,
    ButtonStart,
    ButtonBack,
    ButtonGuide,
    LeftShoulder,
    RightShoulder,
    LeftStickButton,
    RightStickButton,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftTrigger,
    RightTrigger,
}

impl InputId {
    pub const ALL: [InputId; 17] = [
        InputId::ButtonA,
        InputId::ButtonB,
        InputId::ButtonX,
        InputId::ButtonY,
        InputId::ButtonStart,
        InputId::ButtonBack,
        InputId::ButtonGuide,
        InputId::LeftShoulder,
        InputId::RightShoulder,
        InputId::LeftStickButton,
        InputId::RightStickButton,
        InputId::DPadUp,
        InputId::DPadDown,
        InputId::DPadLeft,
        InputId::DPadRight,
        InputId::LeftTrigger,
        InputId::RightTrigger,
    ];

    /// Key used for this input in the mapping file
    pub const fn config_key(self) -> &'static str {
        match self {
            InputId::ButtonA => "button_a",
            InputId::ButtonB => "button_b",
            InputId::ButtonX => "button_x",
            InputId::ButtonY => "button_y",
            InputId::ButtonStart => "button_start",
            InputId::ButtonBack => "button_back",
            InputId::ButtonGuide => "button_guide",
            InputId::LeftShoulder => "left_shoulder",
            InputId::RightShoulder => "right_shoulder",
            InputId::LeftStickButton => "left_stick_button",
            InputId::RightStickButton => "right_stick_button",
            InputId::DPadUp => "dpad_up",
            InputId::DPadDown => "dpad_down",
            InputId::DPadLeft => "dpad_left",
            InputId::DPadRight => "dpad_right",
            InputId::LeftTrigger => "left_trigger",
            InputId::RightTrigger => "right_trigger",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|input| input.config_key() == key)
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

// Joystick position, both axes in [-1.0, 1.0]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JoystickPosition {
    pub x: f32,
    pub y: f32,
}

impl JoystickPosition {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Digital button levels as read from the device
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonStates {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub start: bool,
    pub back: bool,
    pub guide: bool,
    pub left_shoulder: bool,
    pub right_shoulder: bool,
    pub left_stick: bool,
    pub right_stick: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
}

/// Immutable controller state for one polling tick.
///
/// The default value is the neutral snapshot: sticks centered, triggers released and
/// every button up. The edge detector starts from it, so anything already held on the
/// first tick reads as a fresh press.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerSnapshot {
    pub left_stick: JoystickPosition,
    pub right_stick: JoystickPosition,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub buttons: ButtonStates,
}

impl ControllerSnapshot {
    /// Digital level of `input`; triggers are quantized against [`TRIGGER_PRESS_THRESHOLD`]
    pub fn is_pressed(&self, input: InputId) -> bool {
        let b = &self.buttons;
        match input {
            InputId::ButtonA => b.a,
            InputId::ButtonB => b.b,
            InputId::ButtonX => b.x,
            InputId::ButtonY => b.y,
            InputId::ButtonStart => b.start,
            InputId::ButtonBack => b.back,
            InputId::ButtonGuide => b.guide,
            InputId::LeftShoulder => b.left_shoulder,
            InputId::RightShoulder => b.right_shoulder,
            InputId::LeftStickButton => b.left_stick,
            InputId::RightStickButton => b.right_stick,
            InputId::DPadUp => b.dpad_up,
            InputId::DPadDown => b.dpad_down,
            InputId::DPadLeft => b.dpad_left,
            InputId::DPadRight => b.dpad_right,
            InputId::LeftTrigger => self.left_trigger > TRIGGER_PRESS_THRESHOLD,
            InputId::RightTrigger => self.right_trigger > TRIGGER_PRESS_THRESHOLD,
        }
    }

    /// Returns a copy with `input` forced to `pressed`.
    ///
    /// Triggers are set to full travel or fully released.
    pub fn with_input(mut self, input: InputId, pressed: bool) -> Self {
        let b = &mut self.buttons;
        match input {
            InputId::ButtonA => b.a = pressed,
            InputId::ButtonB => b.b = pressed,
            InputId::ButtonX => b.x = pressed,
            InputId::ButtonY => b.y = pressed,
            InputId::ButtonStart => b.start = pressed,
            InputId::ButtonBack => b.back = pressed,
            InputId::ButtonGuide => b.guide = pressed,
            InputId::LeftShoulder => b.left_shoulder = pressed,
            InputId::RightShoulder => b.right_shoulder = pressed,
            InputId::LeftStickButton => b.left_stick = pressed,
            InputId::RightStickButton => b.right_stick = pressed,
            InputId::DPadUp => b.dpad_up = pressed,
            InputId::DPadDown => b.dpad_down = pressed,
            InputId::DPadLeft => b.dpad_left = pressed,
            InputId::DPadRight => b.dpad_right = pressed,
            InputId::LeftTrigger => self.left_trigger = if pressed { 1.0 } else { 0.0 },
            InputId::RightTrigger => self.right_trigger = if pressed { 1.0 } else { 0.0 },
        }
        self
    }

    pub fn pressed(input: InputId) -> Self {
        Self::default().with_input(input, true)
    }

    /// Short one-line summary for debug logging
    pub fn summary(&self) -> String {
        let held: Vec<&str> = InputId::ALL
            .into_iter()
            .filter(|input| self.is_pressed(*input))
            .map(InputId::config_key)
            .collect();
        format!(
            "L:({:.2},{:.2}) R:({:.2},{:.2}) LT:{:.2} RT:{:.2} Held:[{}]",
            self.left_stick.x,
            self.left_stick.y,
            self.right_stick.x,
            self.right_stick.y,
            self.left_trigger,
            self.right_trigger,
            held.join(",")
        )
    }
}
