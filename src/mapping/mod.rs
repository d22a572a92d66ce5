//! Translation of controller state into desktop input.
//!
//! - [`edge`] - press/release detection between consecutive snapshots
//! - [`action`] - the closed set of bindable behaviors, compiled from names
//! - [`binding`] - per-input action table built from the mapping store
//! - [`axis`] - continuous pointer and scroll output from the sticks
//! - [`engine`] - ties the above together, one call per polling tick

pub mod action;
pub mod axis;
pub mod binding;
pub mod edge;
pub mod engine;

pub use action::Action;
pub use binding::BindingTable;
pub use engine::{EngineStats, MappingEngine, TickOutcome};
