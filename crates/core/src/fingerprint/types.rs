//! Types for the fingerprint module.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest algorithm used for change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintAlgorithm {
    /// MD5, compatible with records written by earlier converter versions.
    #[default]
    Md5,
    /// SHA-256.
    Sha256,
}

impl FingerprintAlgorithm {
    /// Returns a fresh incremental hasher.
    pub fn hasher(self) -> FingerprintHasher {
        match self {
            Self::Md5 => FingerprintHasher::Md5(md5::Context::new()),
            Self::Sha256 => FingerprintHasher::Sha256(Sha256::new()),
        }
    }
}

/// Incremental digest state.
pub enum FingerprintHasher {
    Md5(md5::Context),
    Sha256(Sha256),
}

impl FingerprintHasher {
    /// Feeds the next chunk of bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            Self::Md5(ctx) => ctx.consume(bytes),
            Self::Sha256(h) => h.update(bytes),
        }
    }

    /// Finishes the digest as upper-case hex.
    pub fn finish(self) -> String {
        match self {
            Self::Md5(ctx) => format!("{:X}", ctx.compute()),
            Self::Sha256(h) => format!("{:X}", h.finalize()),
        }
    }
}

/// Outcome of comparing an input against its stored fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildDecision {
    /// First time this input is seen.
    NoRecord,
    /// The input bytes changed since the last run.
    Changed,
    /// The fingerprint matches but the output artifact is gone.
    OutputMissing,
    /// Nothing changed and the output exists.
    Unchanged,
    /// The input or the cache could not be read.
    CacheUnavailable,
}

impl RebuildDecision {
    /// Whether the encoder has to run.
    pub fn requires_rebuild(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Compares two digests, ignoring case and surrounding whitespace.
pub(crate) fn digests_match(stored: &str, current: &str) -> bool {
    let stored = stored.trim();
    !stored.is_empty() && stored.eq_ignore_ascii_case(current.trim())
}
