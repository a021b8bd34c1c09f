//! Shared utilities for Quorum.

pub mod logging;

pub use logging::{init_logging, init_tracing, LogFormat, LoggingError};
