//! Conversion pipeline implementation.
//!
//! Drives one request through the stages in order:
//! - CheckCache: fingerprint the input and decide whether to encode
//! - UpdateLoopOnly: unchanged input, rewrite the descriptor's loop lines
//! - Encode .. WritePayload: run the encoder and place both artifacts
//!
//! Artifacts are staged and only renamed into place once everything they
//! depend on has succeeded. The previous payload is kept as a backup until the
//! descriptor is in place and put back if that fails.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::fs;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::encoder::Encoder;
use crate::fingerprint::{CacheConfig, FingerprintCache, RebuildDecision};
use crate::loop_window::resolve_loop_window;
use crate::staging::{sidecar_path, StagedFile};
use crate::txth::{
    descriptor_path, read_descriptor, stage_descriptor, update_loop_points, TxthDescriptor,
    TxthError,
};
use crate::wave::{read_header, read_payload, ContainerHeader};

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::types::{ConversionOutcome, ConversionRequest, PipelineStage};

/// Converts PCM wave files into a raw MS-ADPCM payload plus descriptor.
pub struct ConversionPipeline<E: Encoder> {
    config: PipelineConfig,
    cache: FingerprintCache,
    encoder: E,
}

impl<E: Encoder> ConversionPipeline<E> {
    /// Creates a new pipeline.
    pub fn new(config: PipelineConfig, cache: CacheConfig, encoder: E) -> Self {
        Self {
            config,
            cache: FingerprintCache::new(cache),
            encoder,
        }
    }

    pub fn cache(&self) -> &FingerprintCache {
        &self.cache
    }

    /// Path of the encoder's intermediate output for `output`.
    pub fn temp_path(&self, output: &Path) -> PathBuf {
        sidecar_path(output, &self.config.temp_suffix)
    }

    /// Runs one conversion.
    ///
    /// Any failure after the cache decision blanks the input's fingerprint
    /// record so the next run re-encodes. Artifacts from an earlier successful
    /// run are left as they were.
    pub async fn run(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutcome, PipelineError> {
        let span = info_span!(
            "convert",
            input = %request.input_path.display(),
            output = %request.output_path.display()
        );

        async {
            debug!(stage = %PipelineStage::CheckCache, "Checking fingerprint");
            let decision = self
                .cache
                .check(&request.input_path, &request.output_path)
                .await;

            let result = if decision.requires_rebuild() {
                self.rebuild(request, decision).await
            } else {
                self.update_loop_only(request).await
            };

            match &result {
                Ok(outcome) => info!(stage = %PipelineStage::Done, "{}", outcome),
                Err(e) => {
                    warn!(stage = %e.stage(), "Conversion failed: {}", e);
                    self.cache.invalidate(&request.input_path).await;
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn update_loop_only(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutcome, PipelineError> {
        let descriptor_path = descriptor_path(&request.output_path);
        info!(
            stage = %PipelineStage::UpdateLoopOnly,
            "Input unchanged, updating loop points in {:?}", descriptor_path
        );

        let existing = read_descriptor(&descriptor_path)
            .await
            .map_err(|e| PipelineError::descriptor(&descriptor_path, e))?;

        let window = resolve_loop_window(
            existing.num_samples,
            request.loop_start,
            request.loop_end,
            existing.samples_per_block,
        );

        update_loop_points(&descriptor_path, window)
            .await
            .map_err(|e| PipelineError::descriptor(&descriptor_path, e))?;

        Ok(ConversionOutcome::LoopPointsUpdated {
            output_path: request.output_path.clone(),
            descriptor_path,
            loop_window: window,
        })
    }

    async fn rebuild(
        &self,
        request: &ConversionRequest,
        decision: RebuildDecision,
    ) -> Result<ConversionOutcome, PipelineError> {
        let temp_path = self.temp_path(&request.output_path);

        let result = self.encode_and_place(request, decision, &temp_path).await;

        if self.config.keep_temp_files {
            debug!("Keeping intermediate file {:?}", temp_path);
        } else {
            match fs::remove_file(&temp_path).await {
                Ok(()) => debug!("Removed intermediate file {:?}", temp_path),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Failed to remove intermediate file {:?}: {}", temp_path, e),
            }
        }

        result
    }

    async fn encode_and_place(
        &self,
        request: &ConversionRequest,
        decision: RebuildDecision,
        temp_path: &Path,
    ) -> Result<ConversionOutcome, PipelineError> {
        let input = request.input_path.as_path();
        let output = request.output_path.as_path();

        // Encode
        info!(
            stage = %PipelineStage::Encode,
            encoder = self.encoder.name(),
            "Rebuilding ({:?})", decision
        );
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PipelineError::io(PipelineStage::Encode, parent, e))?;
        }
        match fs::remove_file(temp_path).await {
            Ok(()) => debug!("Removed stale intermediate file {:?}", temp_path),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(PipelineError::io(PipelineStage::Encode, temp_path, e)),
        }
        let started = Instant::now();
        self.encoder.encode(input, temp_path).await?;
        let encode_ms = started.elapsed().as_millis() as u64;

        // ParseHeaders
        let source = read_header(input)
            .await
            .map_err(|e| PipelineError::format(PipelineStage::ParseHeaders, input, e))?;
        let encoded = read_header(temp_path)
            .await
            .map_err(|e| PipelineError::format(PipelineStage::ParseHeaders, temp_path, e))?;
        self.log_header(input, &source);
        self.log_header(temp_path, &encoded);

        // ExtractPayload
        let payload = read_payload(temp_path, &encoded)
            .await
            .map_err(|e| PipelineError::format(PipelineStage::ExtractPayload, temp_path, e))?;
        let total_samples = source.total_samples();
        if total_samples == 0 {
            return Err(PipelineError::NoSamples {
                path: input.to_path_buf(),
            });
        }
        debug!(
            stage = %PipelineStage::ExtractPayload,
            "Extracted {} payload bytes, {} samples", payload.len(), total_samples
        );

        // ComputeLoop
        let samples_per_block = encoded.samples_per_block();
        let window = resolve_loop_window(
            total_samples,
            request.loop_start,
            request.loop_end,
            samples_per_block,
        );
        debug!(
            stage = %PipelineStage::ComputeLoop,
            "Loop window {} - {} (block {})",
            window.start_sample,
            window.end_sample,
            samples_per_block
        );

        // WriteMetadata
        let descriptor_path = descriptor_path(output);
        let descriptor = TxthDescriptor::from_header(&encoded, total_samples, window);
        let staged_descriptor = stage_descriptor(&descriptor_path, &descriptor)
            .await
            .map_err(|e| PipelineError::descriptor(&descriptor_path, e))?;

        // WritePayload
        let staged_payload = StagedFile::write(output, &payload)
            .await
            .map_err(|e| PipelineError::io(PipelineStage::WritePayload, output, e))?;
        let replaced_payload = staged_payload
            .commit_with_backup()
            .await
            .map_err(|e| PipelineError::io(PipelineStage::WritePayload, output, e))?;
        if let Err(e) = staged_descriptor.commit().await {
            if let Err(restore_err) = replaced_payload.restore().await {
                warn!("Failed to restore previous {:?}: {}", output, restore_err);
            }
            return Err(PipelineError::descriptor(
                &descriptor_path,
                TxthError::io(&descriptor_path, e),
            ));
        }
        replaced_payload.finish().await;
        info!(
            stage = %PipelineStage::WritePayload,
            "Wrote {} ({} bytes) and {:?}", output.display(), payload.len(), descriptor_path
        );

        Ok(ConversionOutcome::Encoded {
            output_path: output.to_path_buf(),
            descriptor_path,
            decision,
            total_samples,
            samples_per_block,
            payload_bytes: payload.len() as u64,
            loop_window: window,
            encode_ms,
        })
    }

    fn log_header(&self, path: &Path, header: &ContainerHeader) {
        if self.config.log_headers {
            info!(stage = %PipelineStage::ParseHeaders, "{}", header.report(path));
        } else {
            debug!(stage = %PipelineStage::ParseHeaders, "{}", header.report(path));
        }
    }
}
