//! # Observability
//!
//! Structured logging for hop links via `tracing`. The algorithm and the
//! simulation driver emit events with `tracing::info!`/`debug!`; binaries
//! install a subscriber once at startup with [`init_logging`].

pub mod logging;

pub use logging::{build_subscriber, init_logging, LogConfig, LogFormat, LogLevel};
