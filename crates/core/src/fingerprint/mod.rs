//! Content fingerprint cache.
//!
//! Each input file is hashed in full and the digest is kept in
//! `<cache-dir>/<input-file-name>.music`. Comparing the current digest with the
//! stored one tells the pipeline whether the expensive external encode can be
//! skipped.

mod cache;
mod config;
mod types;

pub use cache::{fingerprint, fingerprint_file, FingerprintCache, RECORD_EXTENSION};
pub use config::CacheConfig;
pub use types::{FingerprintAlgorithm, FingerprintHasher, RebuildDecision};
