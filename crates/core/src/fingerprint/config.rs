//! Configuration for the fingerprint cache.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::FingerprintAlgorithm;

/// Where and how input fingerprints are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one `<input-file-name>.music` record per input.
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Digest algorithm.
    #[serde(default)]
    pub algorithm: FingerprintAlgorithm,

    /// Read buffer size used while hashing.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("checksums")
}

fn default_buffer_size() -> usize {
    64 * 1024
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            algorithm: FingerprintAlgorithm::default(),
            buffer_size: default_buffer_size(),
        }
    }
}

impl CacheConfig {
    /// Creates a config storing records under `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    /// Sets the digest algorithm.
    pub fn with_algorithm(mut self, algorithm: FingerprintAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}
