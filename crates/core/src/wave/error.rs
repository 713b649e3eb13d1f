//! Error types for the wave module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::FourCc;

/// Errors that can occur while reading a wave container.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The file could not be opened.
    #[error("Failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file ended before a required field.
    #[error("Truncated file: missing {field} at offset {offset}")]
    Truncated { field: &'static str, offset: u64 },

    /// A chunk identifier did not match.
    #[error("Unexpected {field}: expected '{expected}', found '{found}'")]
    UnexpectedTag {
        field: &'static str,
        expected: FourCc,
        found: FourCc,
    },

    /// I/O error while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Creates a truncation error for the given field.
    pub fn truncated(field: &'static str, offset: u64) -> Self {
        Self::Truncated { field, offset }
    }

    /// Whether the file was shorter than its header claims.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}

/// The header describes zero channels or a sample width under one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot derive sample count from {channel_count} channels at {bits_per_sample} bits per sample")]
pub struct DivideByZero {
    pub channel_count: u16,
    pub bits_per_sample: u16,
}
