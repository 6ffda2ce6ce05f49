//! Error types for the showcase workspace.
//!
//! Library crates use [`ShowcaseError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all showcase operations.
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    /// Configuration loading or resolution error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport failure while retrieving the feed (DNS, connect, timeout, non-2xx).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The payload could not be interpreted as tabular text.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input validation error (bad feed URL and the like).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ShowcaseError>;

impl ShowcaseError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a fetch (transport) error from any displayable message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
