//! Input mapping engine
//!
//! Turns one [`ControllerSnapshot`] per tick into calls on an [`ActionSink`].
//!
//! # Tick
//!
//! ```text
//! snapshot ──► EdgeDetector ──► edges ──► BindingTable ──► Action ──► ActionSink
//!    │                                                      │
//!    │                                                      └──► MappingStore ──► StorePersister
//!    └──────► axis mapper (pointer move, scroll) ──────────────────► ActionSink
//! ```
//!
//! Digital edges are dispatched first, in input enumeration order. Axis output is computed
//! afterwards from the same snapshot, so a sensitivity change made by an edge already
//! applies to that tick's movement.
//!
//! The engine owns all of its state and is driven by a single task; `tick` never blocks.

use super::action::{Action, SensitivityTarget};
use super::axis::{map_axes, AxisSettings};
use super::binding::BindingTable;
use super::edge::{EdgeDetector, EdgeKind, InputEdge};
use crate::controller::{ControllerSnapshot, InputId};
use crate::output::{ActionSink, PointerButton};
use crate::persistence::mapping_store::clamp_sensitivity;
use crate::persistence::{MappingStore, StorePersister};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What the session loop should do after a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    TerminationRequested,
}

/// Counters for periodic statistics logging
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub ticks: u64,
    pub edges: u64,
}

#[derive(Debug)]
struct EngineState {
    edges: EdgeDetector,
    // Pointer button resolved when the input was pressed
    held: BTreeMap<InputId, PointerButton>,
    axis: AxisSettings,
    exit_requested: bool,
}

pub struct MappingEngine<S: ActionSink, P: StorePersister> {
    sink: S,
    persister: P,
    store: MappingStore,
    table: BindingTable,
    state: EngineState,
    stats: EngineStats,
}

impl<S: ActionSink, P: StorePersister> MappingEngine<S, P> {
    pub fn new(store: MappingStore, sink: S, persister: P) -> Self {
        let table = BindingTable::compile(&store);
        let axis = AxisSettings {
            mouse_sensitivity: store.mouse_sensitivity(),
            scroll_sensitivity: store.scroll_sensitivity(),
            invert_scroll: store.invert_scroll(),
        };
        debug!("Mapping engine created with {:?}", axis);

        Self {
            sink,
            persister,
            store,
            table,
            state: EngineState {
                edges: EdgeDetector::new(),
                held: BTreeMap::new(),
                axis,
                exit_requested: false,
            },
            stats: EngineStats::default(),
        }
    }

    /// Processes one snapshot: edges first, then continuous axes.
    pub fn tick(&mut self, snapshot: &ControllerSnapshot) -> TickOutcome {
        let edges = self.state.edges.advance(snapshot);
        self.stats.ticks += 1;
        self.stats.edges += edges.len() as u64;

        for edge in edges {
            self.dispatch(edge);
        }

        let output = map_axes(snapshot, &self.state.axis);
        if let Some((dx, dy)) = output.pointer {
            self.sink.pointer_move(dx, dy);
        }
        if let Some(amount) = output.scroll {
            self.sink.scroll(amount);
        }

        if self.state.exit_requested {
            TickOutcome::TerminationRequested
        } else {
            TickOutcome::Continue
        }
    }

    fn dispatch(&mut self, edge: InputEdge) {
        let InputEdge { input, kind } = edge;

        if kind == EdgeKind::Release {
            if let Some(button) = self.state.held.remove(&input) {
                debug!("{} released, pointer up {:?}", input, button);
                self.sink.pointer_up(button);
            }
            return;
        }

        match self.table.action(input).clone() {
            Action::Pointer(button) => {
                debug!("{} pressed, pointer down {:?}", input, button);
                self.sink.pointer_down(button);
                self.state.held.insert(input, button);
            }
            Action::Click(button) => self.sink.click(button),
            Action::KeyTap(key) => self.sink.key_tap(key),
            Action::System(action) => self.sink.system(action),
            Action::AdjustSensitivity { target, step } => self.adjust_sensitivity(target, step),
            Action::Exit => {
                info!("Exit requested from {}", input);
                self.state.exit_requested = true;
            }
            Action::Unbound => {}
            Action::Unknown(name) => debug!("Ignoring unknown action '{}' on {}", name, input),
        }
    }

    fn adjust_sensitivity(&mut self, target: SensitivityTarget, step: f32) {
        let current = match target {
            SensitivityTarget::Mouse => self.state.axis.mouse_sensitivity,
            SensitivityTarget::Scroll => self.state.axis.scroll_sensitivity,
        };
        let value = clamp_sensitivity(current + step);

        match target {
            SensitivityTarget::Mouse => {
                self.state.axis.mouse_sensitivity = value;
                self.store.set_mouse_sensitivity(value);
            }
            SensitivityTarget::Scroll => {
                self.state.axis.scroll_sensitivity = value;
                self.store.set_scroll_sensitivity(value);
            }
        }
        info!("{} sensitivity: {}", target, value);
        self.persister.persist(&self.store);
    }

    /// Binds `input` to `action_name` and saves the mapping.
    ///
    /// A currently held input still releases the pointer button it pressed.
    pub fn rebind(&mut self, input: InputId, action_name: &str) {
        self.store.set_binding(input.config_key(), action_name);
        self.table = BindingTable::compile(&self.store);
        info!("{} -> {}", input, self.table.action(input));
        self.persister.persist(&self.store);
    }

    pub fn set_invert_scroll(&mut self, invert: bool) {
        self.state.axis.invert_scroll = invert;
        self.store.set_invert_scroll(invert);
        info!("Scroll inversion {}", if invert { "on" } else { "off" });
        self.persister.persist(&self.store);
    }

    /// Releases every pointer button still held down.
    pub fn release_held(&mut self) {
        for (input, button) in std::mem::take(&mut self.state.held) {
            debug!("Releasing {:?} held by {}", button, input);
            self.sink.pointer_up(button);
        }
    }

    /// Releases held buttons and forgets the last snapshot.
    ///
    /// Used while the controller is gone; the next tick diffs against neutral.
    pub fn suspend(&mut self) {
        self.release_held();
        self.state.edges.reset();
    }

    #[cfg(test)]
    pub fn termination_requested(&self) -> bool {
        self.state.exit_requested
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.state.axis.mouse_sensitivity
    }

    pub fn scroll_sensitivity(&self) -> f32 {
        self.state.axis.scroll_sensitivity
    }

    pub fn invert_scroll(&self) -> bool {
        self.state.axis.invert_scroll
    }

    #[cfg(test)]
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    #[cfg(test)]
    pub fn held_inputs(&self) -> impl Iterator<Item = InputId> + '_ {
        self.state.held.keys().copied()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[cfg(test)]
    pub fn persister(&self) -> &P {
        &self.persister
    }
}
