//! Error types for DocViewer.
//!
//! Library crates use [`DocViewerError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all DocViewer operations.
#[derive(Debug, thiserror::Error)]
pub enum DocViewerError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Registry validation error (duplicate key, unknown default, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Listener bind or HTTP serve error.
    #[error("network error: {0}")]
    Network(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocViewerError>;

impl DocViewerError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DocViewerError::config("missing docs root");
        assert_eq!(err.to_string(), "config error: missing docs root");

        let err = DocViewerError::validation("duplicate document key 'env'");
        assert!(err.to_string().contains("duplicate document key"));
    }

    #[test]
    fn io_error_includes_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DocViewerError::io("docs/missing.html", source);
        let msg = err.to_string();
        assert!(msg.contains("missing.html"));
        assert!(msg.contains("gone"));
    }
}
