//! Utility modules for buildchain

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
