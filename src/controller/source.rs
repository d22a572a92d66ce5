use crate::controller::snapshot::{ButtonStates, ControllerSnapshot, JoystickPosition};
use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use std::time::Duration;
use tracing::{debug, error, info, warn};

// Source settings
#[derive(Clone, Debug)]
pub struct SourceSettings {
    /// How long `connect` waits for a first gamepad
    pub connect_timeout: Duration,
    /// Pause between two connection checks while waiting
    pub connect_poll: Duration,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(5000),
            connect_poll: Duration::from_millis(100),
        }
    }
}

// Source errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to initialize gamepad backend: {0}")]
    InitializationError(String),

    #[error("No gamepad connected within {0:?}")]
    NoGamepadError(Duration),
}

// Result of a single poll
#[derive(Clone, Debug, PartialEq)]
pub enum SourceStatus {
    Connected(ControllerSnapshot),
    Disconnected,
}

#[state]
#[derive(Debug, Clone)]
pub enum SourceState {
    Initializing,
    Polling,
}

#[machine]
#[derive(Debug)]
pub struct GamepadSource<S: SourceState> {
    // Gilrs context
    gilrs: Gilrs,

    // Gamepad snapshots are read from
    active_gamepad: Option<GamepadId>,

    settings: SourceSettings,
}

impl<S: SourceState> GamepadSource<S> {
    fn first_connected(&self) -> Option<GamepadId> {
        self.gilrs.gamepads().next().map(|(id, _)| id)
    }

    // Drain the gilrs queue so cached gamepad state is current
    fn pump_events(&mut self) {
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Gamepad {} connected", id);
                    if self.active_gamepad.is_none() {
                        self.active_gamepad = Some(id);
                        info!("Adopted gamepad {} as active controller", id);
                    }
                }
                EventType::Disconnected => {
                    if self.active_gamepad == Some(id) {
                        warn!("Active gamepad {} disconnected", id);
                        self.active_gamepad = None;
                    } else {
                        debug!("Inactive gamepad {} disconnected", id);
                    }
                }
                _ => {}
            }
        }

        if self.active_gamepad.is_none() {
            if let Some(id) = self.first_connected() {
                info!("Switching to gamepad {}", id);
                self.active_gamepad = Some(id);
            }
        }
    }
}

impl GamepadSource<Initializing> {
    pub fn create(settings: Option<SourceSettings>) -> Result<Self, SourceError> {
        let settings = settings.unwrap_or_default();
        debug!("Creating gamepad source with settings: {:?}", settings);

        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(SourceError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, None, settings))
    }

    /// Waits for a gamepad and transitions to `Polling`.
    ///
    /// Fails with [`SourceError::NoGamepadError`] once the configured timeout passes
    /// without any connected gamepad.
    pub async fn connect(mut self) -> Result<GamepadSource<Polling>, SourceError> {
        let timeout = self.settings.connect_timeout;
        let deadline = tokio::time::Instant::now() + timeout;
        info!("Waiting up to {:?} for a gamepad", timeout);

        loop {
            self.pump_events();

            if let Some(id) = self.active_gamepad {
                let gamepad = self.gilrs.gamepad(id);
                info!("Gamepad connected: {} ({})", gamepad.name(), id);
                return Ok(self.transition());
            }

            if tokio::time::Instant::now() >= deadline {
                error!("No gamepad detected within {:?}", timeout);
                return Err(SourceError::NoGamepadError(timeout));
            }

            tokio::time::sleep(self.settings.connect_poll).await;
        }
    }
}

impl GamepadSource<Polling> {
    /// Reads the current state of the active gamepad.
    pub fn poll(&mut self) -> SourceStatus {
        self.pump_events();

        let active = self.active_gamepad;
        match active.and_then(|id| self.gilrs.connected_gamepad(id)) {
            Some(gamepad) => SourceStatus::Connected(snapshot_from_gamepad(&gamepad)),
            None => SourceStatus::Disconnected,
        }
    }

    pub fn active_gamepad_name(&self) -> Option<String> {
        let active = self.active_gamepad;
        active
            .and_then(|id| self.gilrs.connected_gamepad(id))
            .map(|gamepad| gamepad.name().to_string())
    }
}

fn snapshot_from_gamepad(gamepad: &Gamepad<'_>) -> ControllerSnapshot {
    let trigger = |button: Button, axis: Axis| {
        gamepad
            .button_data(button)
            .map(|data| data.value())
            .unwrap_or_else(|| gamepad.value(axis))
    };

    ControllerSnapshot {
        left_stick: normalize_stick(
            gamepad.value(Axis::LeftStickX),
            gamepad.value(Axis::LeftStickY),
        ),
        right_stick: normalize_stick(
            gamepad.value(Axis::RightStickX),
            gamepad.value(Axis::RightStickY),
        ),
        left_trigger: normalize_trigger(trigger(Button::LeftTrigger2, Axis::LeftZ)),
        right_trigger: normalize_trigger(trigger(Button::RightTrigger2, Axis::RightZ)),
        buttons: ButtonStates {
            a: gamepad.is_pressed(Button::South),
            b: gamepad.is_pressed(Button::East),
            x: gamepad.is_pressed(Button::West),
            y: gamepad.is_pressed(Button::North),
            start: gamepad.is_pressed(Button::Start),
            back: gamepad.is_pressed(Button::Select),
            guide: gamepad.is_pressed(Button::Mode),
            left_shoulder: gamepad.is_pressed(Button::LeftTrigger),
            right_shoulder: gamepad.is_pressed(Button::RightTrigger),
            left_stick: gamepad.is_pressed(Button::LeftThumb),
            right_stick: gamepad.is_pressed(Button::RightThumb),
            dpad_up: gamepad.is_pressed(Button::DPadUp),
            dpad_down: gamepad.is_pressed(Button::DPadDown),
            dpad_left: gamepad.is_pressed(Button::DPadLeft),
            dpad_right: gamepad.is_pressed(Button::DPadRight),
        },
    }
}

// gilrs reports Y growing upward, snapshots use screen orientation
fn normalize_stick(x: f32, y_up: f32) -> JoystickPosition {
    JoystickPosition::new(x.clamp(-1.0, 1.0), (-y_up).clamp(-1.0, 1.0))
}

fn normalize_trigger(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_y_is_flipped_to_screen_orientation() {
        let position = normalize_stick(0.25, 0.75);
        assert_eq!(position, JoystickPosition::new(0.25, -0.75));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(normalize_stick(1.5, -1.5), JoystickPosition::new(1.0, 1.0));
        assert_eq!(normalize_trigger(-0.2), 0.0);
        assert_eq!(normalize_trigger(1.2), 1.0);
    }

    #[test]
    #[ignore] // Requires a connected gamepad (run with: cargo test -- --ignored)
    fn connects_to_real_gamepad() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let source = GamepadSource::create(None).unwrap();
        let mut polling = runtime.block_on(source.connect()).unwrap();
        assert!(matches!(polling.poll(), SourceStatus::Connected(_)));
    }
}
