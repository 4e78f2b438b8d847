//! Utility functions shared by the CLI.
//!
//! - [`app_data`] - Configuration file in the per-user app data directory
//! - [`logging`] - `tracing` subscriber setup
//! - [`progress`] - Loading spinner (no-op without the `progress` feature)

pub mod app_data;
pub mod logging;
pub mod progress;

pub use app_data::*;
pub use logging::init_logging;
pub use progress::spinner;
