//! RWINFRA - Road Infrastructure Registry Library
//!
//! Records cities, the roads between them and per-road budgets, and keeps
//! fixed-width text tables of that data on disk.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
