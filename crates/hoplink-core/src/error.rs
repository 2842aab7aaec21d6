//! Error types for the hop link
//!
//! Algorithm outcomes (band exhaustion, tolerance rejection, degenerate
//! timing) are never errors: they come back as flagged results. Errors are
//! reserved for bad configuration and for failures while exporting reports.

/// Result type for hop link operations
pub type HopResult<T> = Result<T, HopError>;

/// Errors that can occur while configuring or exporting a hop link
#[derive(Debug, thiserror::Error)]
pub enum HopError {
    #[error("Invalid link parameter: {0}")]
    InvalidParams(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl HopError {
    /// Wrap an I/O error together with the path it happened on
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
