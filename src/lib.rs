//! padmouse: drive the desktop pointer, keyboard shortcuts and media keys from a gamepad.
//!
//! The binary in `main.rs` only sets up logging and error reporting, then hands over to
//! [`session::run`].

pub mod config;
pub mod controller;
pub mod mapping;
pub mod output;
pub mod persistence;
pub mod session;
