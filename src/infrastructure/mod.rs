//! Infrastructure layer providing external service integrations.
//!
//! This module contains the file output of the registry, configuration
//! loading and log setup.

pub mod config;
pub mod logging;
pub mod persistence;

pub use config::*;
pub use logging::*;
pub use persistence::*;
