//! # Structured Logging
//!
//! Sets up the `tracing` subscriber used by hop link binaries:
//!
//! - Output formats (JSON, Pretty, Compact)
//! - Level filtering, overridable with `RUST_LOG`
//! - Per-module filters
//!
//! ## Example
//!
//! ```rust,ignore
//! use hoplink_core::observe::{init_logging, LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     ..Default::default()
//! };
//!
//! init_logging(&config);
//!
//! tracing::info!(hop = 1, frequency_mhz = 2917.4, "hop transmitted");
//! ```

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    #[default]
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (machine-readable)
    Json,
    /// Pretty format (human-readable, multi-line)
    Pretty,
    /// Compact format (one line per event)
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Include timestamps
    pub timestamps: bool,
    /// Include source location (file:line)
    pub source_location: bool,
    /// Include span events (enter/exit)
    pub span_events: bool,
    /// Module filter (e.g., "hoplink_core=debug,hoplink_sim=info")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            timestamps: true,
            source_location: false,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Create a development configuration (verbose, pretty).
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            source_location: true,
            span_events: true,
            ..Default::default()
        }
    }

    /// Create a production configuration (JSON, minimal).
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Json,
            timestamps: true,
            ..Default::default()
        }
    }

    /// Create a quiet configuration (errors only).
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            timestamps: false,
            ..Default::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        if let Some(ref custom) = self.filter {
            EnvFilter::try_new(custom).unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
        } else {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
        }
    }
}

/// Build the subscriber described by `config`, writing to `make_writer`.
pub fn build_subscriber<W>(
    config: &LogConfig,
    make_writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = config.env_filter();

    let span_events = if config.span_events {
        fmt::format::FmtSpan::FULL
    } else {
        fmt::format::FmtSpan::NONE
    };

    // Timestamps are toggled by swapping the timer type, so each branch
    // builds its own layer.
    match (config.format, config.timestamps) {
        (LogFormat::Json, true) => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(span_events)
                    .with_writer(make_writer),
            ),
        ),
        (LogFormat::Json, false) => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .without_time()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(span_events)
                    .with_writer(make_writer),
            ),
        ),
        (LogFormat::Pretty, true) => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .pretty()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(span_events)
                    .with_writer(make_writer),
            ),
        ),
        (LogFormat::Pretty, false) => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .pretty()
                    .without_time()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(span_events)
                    .with_writer(make_writer),
            ),
        ),
        (LogFormat::Compact, true) => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(span_events)
                    .with_writer(make_writer),
            ),
        ),
        (LogFormat::Compact, false) => Box::new(
            tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_file(config.source_location)
                    .with_line_number(config.source_location)
                    .with_span_events(span_events)
                    .with_writer(make_writer),
            ),
        ),
    }
}

/// Initialize the global logging subscriber.
///
/// This should be called once at application startup.
/// Subsequent calls will be silently ignored.
pub fn init_logging(config: &LogConfig) {
    // Ignore error if subscriber was already set
    let _ = build_subscriber(config, std::io::stdout).try_init();
}
