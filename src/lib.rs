// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod alert;
pub mod app_dirs;
pub mod config;
pub mod controller;
pub mod durations;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod util;
