use crate::controller::{ControllerSnapshot, InputId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Press,
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEdge {
    pub input: InputId,
    pub kind: EdgeKind,
}

/// Per-input press/release detection between consecutive snapshots.
///
/// Starts from the neutral snapshot. Edges come out in [`InputId::ALL`] order,
/// at most one per input per tick.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    previous: ControllerSnapshot,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diffs `current` against the stored snapshot, then stores `current`.
    pub fn advance(&mut self, current: &ControllerSnapshot) -> Vec<InputEdge> {
        let edges = InputId::ALL
            .into_iter()
            .filter_map(|input| {
                let was = self.previous.is_pressed(input);
                let is = current.is_pressed(input);
                match (was, is) {
                    (false, true) => Some(InputEdge {
                        input,
                        kind: EdgeKind::Press,
                    }),
                    (true, false) => Some(InputEdge {
                        input,
                        kind: EdgeKind::Release,
                    }),
                    _ => None,
                }
            })
            .collect();
        self.previous = *current;
        edges
    }

    /// Forget the last snapshot and start over from neutral
    pub fn reset(&mut self) {
        self.previous = ControllerSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: InputId) -> InputEdge {
        InputEdge {
            input,
            kind: EdgeKind::Press,
        }
    }

    fn release(input: InputId) -> InputEdge {
        InputEdge {
            input,
            kind: EdgeKind::Release,
        }
    }

    #[test]
    fn held_at_startup_is_a_press() {
        let mut detector = EdgeDetector::new();
        let edges = detector.advance(&ControllerSnapshot::pressed(InputId::ButtonB));
        assert_eq!(edges, vec![press(InputId::ButtonB)]);
    }

    #[test]
    fn steady_state_produces_no_edges() {
        let mut detector = EdgeDetector::new();
        let held = ControllerSnapshot::pressed(InputId::ButtonA);
        detector.advance(&held);
        assert!(detector.advance(&held).is_empty());
        assert!(detector.advance(&held).is_empty());
        assert_eq!(
            detector.advance(&ControllerSnapshot::default()),
            vec![release(InputId::ButtonA)]
        );
    }

    #[test]
    fn press_count_matches_rising_transitions() {
        let mut detector = EdgeDetector::new();
        let pattern = [true, true, false, true, false, false, true];
        let mut presses = 0;
        for pressed in pattern {
            let snapshot = ControllerSnapshot::default().with_input(InputId::DPadUp, pressed);
            presses += detector
                .advance(&snapshot)
                .iter()
                .filter(|edge| edge.kind == EdgeKind::Press)
                .count();
        }
        assert_eq!(presses, 3);
    }

    #[test]
    fn edges_follow_enumeration_order() {
        let mut detector = EdgeDetector::new();
        let snapshot = ControllerSnapshot::default()
            .with_input(InputId::RightTrigger, true)
            .with_input(InputId::ButtonA, true)
            .with_input(InputId::DPadLeft, true);
        let order: Vec<InputId> = detector.advance(&snapshot).iter().map(|e| e.input).collect();
        assert_eq!(
            order,
            vec![InputId::ButtonA, InputId::DPadLeft, InputId::RightTrigger]
        );
    }

    #[test]
    fn trigger_edges_use_half_travel_threshold() {
        let mut detector = EdgeDetector::new();
        let mut snapshot = ControllerSnapshot::default();
        snapshot.left_trigger = 0.4;
        assert!(detector.advance(&snapshot).is_empty());
        snapshot.left_trigger = 0.8;
        assert_eq!(detector.advance(&snapshot), vec![press(InputId::LeftTrigger)]);
        snapshot.left_trigger = 0.6;
        assert!(detector.advance(&snapshot).is_empty());
        snapshot.left_trigger = 0.5;
        assert_eq!(detector.advance(&snapshot), vec![release(InputId::LeftTrigger)]);
    }

    #[test]
    fn reset_returns_to_neutral_baseline() {
        let mut detector = EdgeDetector::new();
        let held = ControllerSnapshot::pressed(InputId::ButtonX);
        detector.advance(&held);
        detector.reset();
        assert_eq!(detector.advance(&held), vec![press(InputId::ButtonX)]);
    }
}
