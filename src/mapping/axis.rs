//! Continuous stick output: left stick moves the pointer, right stick scrolls.

use crate::controller::ControllerSnapshot;

/// Per-axis deadzone for pointer motion
pub const MOUSE_DEADZONE: f32 = 0.1;
/// Deadzone for the scroll axis
pub const SCROLL_DEADZONE: f32 = 0.3;
/// Pixels per tick at full deflection and sensitivity 1.0
pub const MOUSE_SPEED: f32 = 15.0;
/// Wheel notches per tick at full deflection and sensitivity 1.0
pub const SCROLL_SPEED: f32 = 5.0;

/// Values the axis mapper reads each tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisSettings {
    pub mouse_sensitivity: f32,
    pub scroll_sensitivity: f32,
    pub invert_scroll: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AxisOutput {
    pub pointer: Option<(i32, i32)>,
    pub scroll: Option<i32>,
}

/// Computes this tick's pointer and scroll deltas.
///
/// Thresholds are per axis, not radial. A delta is reported whenever its threshold is
/// exceeded, even when truncation makes it zero.
pub fn map_axes(snapshot: &ControllerSnapshot, settings: &AxisSettings) -> AxisOutput {
    let left = snapshot.left_stick;
    let pointer = (left.x.abs() > MOUSE_DEADZONE || left.y.abs() > MOUSE_DEADZONE).then(|| {
        let scale = MOUSE_SPEED * settings.mouse_sensitivity;
        ((left.x * scale) as i32, (left.y * scale) as i32)
    });

    let right_y = snapshot.right_stick.y;
    let scroll = (right_y.abs() > SCROLL_DEADZONE).then(|| {
        let value = if settings.invert_scroll { -right_y } else { right_y };
        (value * SCROLL_SPEED * settings.scroll_sensitivity) as i32
    });

    AxisOutput { pointer, scroll }
}
