//! Logger initialization.
//!
//! Everything else in the workspace logs through the `log` facade; this is
//! the one place that installs a backend.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
