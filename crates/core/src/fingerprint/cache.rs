//! On-disk fingerprint cache.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

use super::config::CacheConfig;
use super::types::{digests_match, FingerprintAlgorithm, RebuildDecision};

/// File extension of fingerprint records.
pub const RECORD_EXTENSION: &str = "music";

/// Digest of an in-memory buffer.
pub fn fingerprint(algorithm: FingerprintAlgorithm, bytes: &[u8]) -> String {
    let mut hasher = algorithm.hasher();
    hasher.update(bytes);
    hasher.finish()
}

/// Digest of a whole file, read in `buffer_size` chunks.
pub async fn fingerprint_file(
    algorithm: FingerprintAlgorithm,
    path: &Path,
    buffer_size: usize,
) -> std::io::Result<String> {
    let file = File::open(path).await?;
    let mut reader = BufReader::with_capacity(buffer_size, file);
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut hasher = algorithm.hasher();

    loop {
        let bytes_read = reader.read(&mut buffer).await?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finish())
}

/// Remembers input fingerprints between runs to decide whether the encoder
/// has to run again.
///
/// Every I/O problem degrades to "rebuild required"; the cache can cause extra
/// work but never skip needed work.
#[derive(Debug, Clone)]
pub struct FingerprintCache {
    config: CacheConfig,
}

impl FingerprintCache {
    /// Creates a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Path of the record for `input`, keyed by its file name.
    pub fn record_path(&self, input: &Path) -> Option<PathBuf> {
        let name = input.file_name()?;
        let mut record = name.to_os_string();
        record.push(".");
        record.push(RECORD_EXTENSION);
        Some(self.config.dir.join(record))
    }

    /// Reads the stored digest for `input`, if any.
    pub async fn stored(&self, input: &Path) -> std::io::Result<Option<String>> {
        let Some(record) = self.record_path(input) else {
            return Ok(None);
        };
        match fs::read_to_string(&record).await {
            Ok(digest) => Ok(Some(digest)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Decides whether `input` has to be re-encoded into `output`, updating the
    /// stored record when the input is new or changed.
    pub async fn check(&self, input: &Path, output: &Path) -> RebuildDecision {
        let current =
            match fingerprint_file(self.config.algorithm, input, self.config.buffer_size).await {
                Ok(digest) => digest,
                Err(e) => {
                    warn!("Failed to fingerprint {:?}: {}", input, e);
                    return RebuildDecision::CacheUnavailable;
                }
            };

        let Some(record) = self.record_path(input) else {
            warn!("Input {:?} has no file name to key its fingerprint", input);
            return RebuildDecision::CacheUnavailable;
        };

        let stored = match self.stored(input).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to read fingerprint record {:?}: {}", record, e);
                return RebuildDecision::CacheUnavailable;
            }
        };

        let decision = match stored {
            None => {
                self.persist(&record, &current).await;
                RebuildDecision::NoRecord
            }
            Some(previous) if digests_match(&previous, &current) => {
                if fs::try_exists(output).await.unwrap_or(false) {
                    RebuildDecision::Unchanged
                } else {
                    RebuildDecision::OutputMissing
                }
            }
            Some(_) => {
                self.persist(&record, &current).await;
                RebuildDecision::Changed
            }
        };

        info!(input = ?input, decision = ?decision, "Fingerprint checked");
        decision
    }

    /// Whether `input` has to be re-encoded into `output`.
    pub async fn needs_rebuild(&self, input: &Path, output: &Path) -> bool {
        self.check(input, output).await.requires_rebuild()
    }

    /// Blanks the record for `input` so the next run re-encodes it.
    pub async fn invalidate(&self, input: &Path) {
        let Some(record) = self.record_path(input) else {
            return;
        };
        if !fs::try_exists(&record).await.unwrap_or(false) {
            return;
        }
        match fs::write(&record, "").await {
            Ok(()) => debug!("Invalidated fingerprint record {:?}", record),
            Err(e) => warn!("Failed to invalidate fingerprint record {:?}: {}", record, e),
        }
    }

    async fn persist(&self, record: &Path, digest: &str) {
        if let Err(e) = fs::create_dir_all(&self.config.dir).await {
            warn!(
                "Failed to create fingerprint directory {:?}: {}",
                self.config.dir, e
            );
            return;
        }
        match fs::write(record, digest).await {
            Ok(()) => debug!("Stored fingerprint {} in {:?}", digest, record),
            Err(e) => warn!("Failed to store fingerprint record {:?}: {}", record, e),
        }
    }
}
