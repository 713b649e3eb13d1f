//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the external encoder.
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The encoder executable does not exist.
    #[error("Encoder not found at path: {path}")]
    NotFound { path: PathBuf },

    /// The encoder process could not be started.
    #[error("Failed to launch encoder {path}")]
    LaunchFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The encoder exited unsuccessfully.
    #[error("Encoder exited with code: {}", display_status(.status))]
    Failed {
        /// Exit code, `None` when terminated by a signal.
        status: Option<i32>,
        stderr: Option<String>,
    },

    /// The encoder reported success but produced no output file.
    #[error("Encoder produced no output at {path}")]
    OutputMissing { path: PathBuf },

    /// I/O error while preparing or inspecting files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

impl EncoderError {
    /// Creates a failure error from an exit code and captured stderr.
    pub fn failed(status: Option<i32>, stderr: &[u8]) -> Self {
        let stderr = String::from_utf8_lossy(stderr).trim().to_string();
        Self::Failed {
            status,
            stderr: if stderr.is_empty() {
                None
            } else {
                Some(stderr)
            },
        }
    }

    /// Whether the encoder itself is unavailable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
