//! Logging and tracing.

pub mod logging;
