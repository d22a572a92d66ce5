use super::{ActionSink, KeyId, PointerButton, SystemAction};
use tracing::info;

// Stand-in for platforms without an injection backend
#[derive(Debug, Default)]
pub struct LogSink;

impl ActionSink for LogSink {
    fn pointer_move(&mut self, dx: i32, dy: i32) {
        tracing::trace!("Pointer move ({}, {})", dx, dy);
    }

    fn pointer_down(&mut self, button: PointerButton) {
        info!("Pointer down: {:?}", button);
    }

    fn pointer_up(&mut self, button: PointerButton) {
        info!("Pointer up: {:?}", button);
    }

    fn scroll(&mut self, amount: i32) {
        tracing::trace!("Scroll {}", amount);
    }

    fn key_tap(&mut self, key: KeyId) {
        info!("Key tap: {:?}", key);
    }

    fn system(&mut self, action: SystemAction) {
        info!("System action: {}", action);
    }
}
