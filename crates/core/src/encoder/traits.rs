//! Trait definitions for the encoder module.

use async_trait::async_trait;
use std::path::Path;

use super::error::EncoderError;
use super::types::EncodeResult;

/// An encoder that turns a PCM wave file into an MS-ADPCM wave container.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Returns the name of this encoder implementation.
    fn name(&self) -> &str;

    /// Checks that the encoder is installed and can be started.
    async fn validate(&self) -> Result<(), EncoderError>;

    /// Encodes `input` and writes the result to `output`.
    async fn encode(&self, input: &Path, output: &Path) -> Result<EncodeResult, EncoderError>;
}
