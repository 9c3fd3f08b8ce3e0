pub mod models;
pub mod services;
pub mod errors;
pub mod seed;

pub use models::*;
pub use services::*;
pub use errors::*;
