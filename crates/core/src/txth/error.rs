//! Error types for the txth module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a descriptor.
#[derive(Debug, Error)]
pub enum TxthError {
    /// The descriptor file does not exist.
    #[error("Expected txth file missing: {path}")]
    Missing { path: PathBuf },

    /// A required key is absent.
    #[error("Descriptor is missing required key '{key}'")]
    MissingKey { key: &'static str },

    /// A value could not be parsed.
    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: &'static str, value: String },

    /// Failed to read or write the descriptor.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TxthError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the descriptor was absent.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}
