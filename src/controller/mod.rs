//! Controller subsystem for gamepad input
//!
//! Turns the connected gamepad into one [`ControllerSnapshot`] per polling tick:
//!
//! 1. [`source`] - gilrs backed gamepad access (connect, hot-plug, state reads)
//! 2. [`snapshot`] - the immutable per-tick state handed to the mapping engine
//!
//! # Architecture
//!
//! ```text
//! Gamepad ──► GamepadSource ──► ControllerSnapshot ──► MappingEngine
//!            (Initializing → Polling)
//! ```

pub mod snapshot;
pub mod source;

pub use snapshot::{ButtonStates, ControllerSnapshot, InputId, JoystickPosition};
pub use source::{GamepadSource, SourceError, SourceSettings, SourceStatus};
