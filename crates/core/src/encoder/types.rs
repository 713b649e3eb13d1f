//! Types for the encoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of a successful encode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeResult {
    /// Where the encoded container was written.
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    /// Wall-clock time spent in the encoder.
    pub duration_ms: u64,
}
