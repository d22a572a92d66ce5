//! In-memory sink used by the mapping tests

use super::{ActionSink, KeyId, PointerButton, SystemAction};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SinkCall {
    Move(i32, i32),
    Down(PointerButton),
    Up(PointerButton),
    Scroll(i32),
    Key(KeyId),
    System(SystemAction),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn take(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }
}

impl ActionSink for RecordingSink {
    fn pointer_move(&mut self, dx: i32, dy: i32) {
        self.calls.push(SinkCall::Move(dx, dy));
    }

    fn pointer_down(&mut self, button: PointerButton) {
        self.calls.push(SinkCall::Down(button));
    }

    fn pointer_up(&mut self, button: PointerButton) {
        self.calls.push(SinkCall::Up(button));
    }

    fn scroll(&mut self, amount: i32) {
        self.calls.push(SinkCall::Scroll(amount));
    }

    fn key_tap(&mut self, key: KeyId) {
        self.calls.push(SinkCall::Key(key));
    }

    fn system(&mut self, action: SystemAction) {
        self.calls.push(SinkCall::System(action));
    }
}
