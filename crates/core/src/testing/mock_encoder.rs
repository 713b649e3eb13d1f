//! Mock encoder for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::encoder::{EncodeResult, Encoder, EncoderError};

use super::fixtures;

/// A recorded encode call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Encoder trait.
///
/// Writes a configurable byte buffer to the requested output instead of
/// running a real encoder. Clones share state, so a test can hand one clone
/// to the pipeline and inspect the other.
#[derive(Debug, Clone)]
pub struct MockEncoder {
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    /// Bytes written as the encoder output.
    output: Arc<RwLock<Vec<u8>>>,
    /// If set, the next encode fails with this error.
    next_error: Arc<RwLock<Option<EncoderError>>>,
    /// Skip writing the output while still reporting success.
    skip_output: Arc<RwLock<bool>>,
    available: Arc<RwLock<bool>>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    /// Create a new mock encoder producing a small stereo ADPCM container.
    pub fn new() -> Self {
        Self {
            encodes: Arc::new(RwLock::new(Vec::new())),
            output: Arc::new(RwLock::new(fixtures::adpcm_wave(
                2,
                44100,
                140,
                32,
                &[0u8; 280],
            ))),
            next_error: Arc::new(RwLock::new(None)),
            skip_output: Arc::new(RwLock::new(false)),
            available: Arc::new(RwLock::new(true)),
        }
    }

    /// Get all recorded encodes.
    pub async fn recorded_encodes(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Get the number of encodes attempted.
    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Set the bytes written by subsequent encodes.
    pub async fn set_output(&self, bytes: Vec<u8>) {
        *self.output.write().await = bytes;
    }

    /// Configure the next encode to fail with the given error.
    pub async fn set_next_error(&self, error: EncoderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next encode to fail like a process exiting with `code`.
    pub async fn fail_next_with_status(&self, code: i32) {
        self.set_next_error(EncoderError::failed(Some(code), b"mock failure"))
            .await;
    }

    /// Report success without writing any output.
    pub async fn set_skip_output(&self, skip: bool) {
        *self.skip_output.write().await = skip;
    }

    /// Make `validate` report the encoder as missing.
    pub async fn set_available(&self, available: bool) {
        *self.available.write().await = available;
    }

    async fn record(&self, input: &Path, output: &Path, success: bool) {
        self.encodes.write().await.push(RecordedEncode {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            success,
        });
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        if *self.available.read().await {
            Ok(())
        } else {
            Err(EncoderError::NotFound {
                path: PathBuf::from("mock-encoder"),
            })
        }
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<EncodeResult, EncoderError> {
        if let Some(error) = self.next_error.write().await.take() {
            self.record(input, output, false).await;
            return Err(error);
        }

        let mut size = 0;
        if !*self.skip_output.read().await {
            let bytes = self.output.read().await.clone();
            size = bytes.len() as u64;
            if let Err(e) = tokio::fs::write(output, &bytes).await {
                self.record(input, output, false).await;
                return Err(EncoderError::Io(e));
            }
        }

        self.record(input, output, true).await;
        Ok(EncodeResult {
            output_path: output.to_path_buf(),
            output_size_bytes: size,
            duration_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_encode_writes_output_and_records() {
        let dir = TempDir::new().unwrap();
        let encoder = MockEncoder::new();
        encoder.set_output(b"encoded".to_vec()).await;
        let output = dir.path().join("out.temp");

        let result = encoder
            .encode(Path::new("in.wav"), &output)
            .await
            .unwrap();

        assert_eq!(result.output_size_bytes, 7);
        assert_eq!(tokio::fs::read(&output).await.unwrap(), b"encoded");
        let recorded = encoder.recorded_encodes().await;
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].success);
    }

    #[tokio::test]
    async fn test_next_error_is_taken_once() {
        let dir = TempDir::new().unwrap();
        let encoder = MockEncoder::new();
        encoder.fail_next_with_status(2).await;
        let output = dir.path().join("out.temp");

        let err = encoder
            .encode(Path::new("in.wav"), &output)
            .await
            .unwrap_err();
        assert!(matches!(err, EncoderError::Failed { status: Some(2), .. }));
        assert!(!output.exists());

        encoder.encode(Path::new("in.wav"), &output).await.unwrap();
        assert_eq!(encoder.encode_count().await, 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let dir = TempDir::new().unwrap();
        let encoder = MockEncoder::new();
        let handle = encoder.clone();

        encoder
            .encode(Path::new("in.wav"), &dir.path().join("out.temp"))
            .await
            .unwrap();

        assert_eq!(handle.encode_count().await, 1);
    }

    #[tokio::test]
    async fn test_validate_unavailable() {
        let encoder = MockEncoder::new();
        encoder.set_available(false).await;
        assert!(encoder.validate().await.unwrap_err().is_not_found());
    }
}
