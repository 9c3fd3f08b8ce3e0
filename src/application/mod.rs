//! Application layer managing state and user workflows.
//!
//! This module sits between the registry and the terminal UI: it owns the
//! registry, runs the menu actions and triggers persistence.

pub mod state;

pub use state::*;
