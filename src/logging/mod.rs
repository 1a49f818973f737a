//! Logging and observability
//!
//! Structured logging via `tracing`: console output with an `EnvFilter`,
//! plus optional rotating JSON file logs.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
