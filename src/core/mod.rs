//! Core module - infrastructural components
//!
//! Configuration, the shared application state and the client-facing error
//! envelope live here.

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;
