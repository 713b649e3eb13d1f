//! Pipeline lifecycle integration tests.
//!
//! These tests drive the conversion pipeline with a mock encoder:
//! - First run encodes and places payload plus descriptor
//! - Unchanged input skips the encoder and only rewrites loop points
//! - Failures leave earlier artifacts untouched and force a re-encode next run

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::fs;

use songconv_core::{
    encoder::EncoderError,
    testing::{fixtures, MockEncoder},
    txth::{descriptor_path, read_descriptor},
    CacheConfig, ConversionOutcome, ConversionPipeline, ConversionRequest, FingerprintAlgorithm,
    LoopWindow, PipelineConfig, PipelineError, PipelineStage, RebuildDecision,
};

/// 100_010 stereo 16-bit samples.
const INPUT_PAYLOAD_BYTES: usize = 400_040;

/// Test helper owning a pipeline, its mock encoder and a scratch directory.
struct TestHarness {
    pipeline: ConversionPipeline<MockEncoder>,
    encoder: MockEncoder,
    dir: TempDir,
    input: PathBuf,
    output: PathBuf,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_cache(|dir| CacheConfig::with_dir(dir.join("checksums"))).await
    }

    async fn with_cache(cache: impl FnOnce(&Path) -> CacheConfig) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let input = dir.path().join("bgm01.wav");
        let output = dir.path().join("build").join("bgm01.raw");

        let encoder = MockEncoder::new();
        encoder.set_output(encoded_output(0)).await;

        let pipeline = ConversionPipeline::new(
            PipelineConfig::default(),
            cache(dir.path()),
            encoder.clone(),
        );

        let harness = Self {
            pipeline,
            encoder,
            dir,
            input,
            output,
        };
        harness.write_input(0).await;
        harness
    }

    async fn write_input(&self, fill: u8) {
        let bytes = fixtures::pcm_wave(2, 44100, 16, &vec![fill; INPUT_PAYLOAD_BYTES]);
        fs::write(&self.input, bytes)
            .await
            .expect("Failed to write input");
    }

    fn request(&self) -> ConversionRequest {
        ConversionRequest::new(&self.input, &self.output)
    }

    fn descriptor_path(&self) -> PathBuf {
        descriptor_path(&self.output)
    }

    async fn run(&self, request: &ConversionRequest) -> Result<ConversionOutcome, PipelineError> {
        self.pipeline.run(request).await
    }
}

/// Encoder output: 10 blocks of 140 bytes, 32 samples per block.
fn encoded_payload(seed: u8) -> Vec<u8> {
    (0..1400u32).map(|i| (i as u8).wrapping_add(seed)).collect()
}

fn encoded_output(seed: u8) -> Vec<u8> {
    fixtures::adpcm_wave(2, 44100, 140, 32, &encoded_payload(seed))
}

#[tokio::test]
async fn test_first_run_encodes_and_places_artifacts() {
    let h = TestHarness::new().await;

    let outcome = h.run(&h.request()).await.unwrap();

    match &outcome {
        ConversionOutcome::Encoded {
            decision,
            total_samples,
            samples_per_block,
            payload_bytes,
            loop_window,
            ..
        } => {
            assert_eq!(*decision, RebuildDecision::NoRecord);
            assert_eq!(*total_samples, 100_010);
            assert_eq!(*samples_per_block, 32);
            assert_eq!(*payload_bytes, 1400);
            assert_eq!(*loop_window, LoopWindow::new(0, 100_000));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(fs::read(&h.output).await.unwrap(), encoded_payload(0));
    assert_eq!(
        fs::read_to_string(h.descriptor_path()).await.unwrap(),
        "num_samples = 100010\n\
         codec = MSADPCM\n\
         channels = 2\n\
         sample_rate = 44100\n\
         interleave = 140\n\
         samples_per_block = 32\n\
         loop_start_sample = 0\n\
         loop_end_sample = 100000\n"
    );
    assert!(!h.pipeline.temp_path(&h.output).exists());

    let recorded = h.encoder.recorded_encodes().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].input, h.input);
    assert_eq!(recorded[0].output, h.pipeline.temp_path(&h.output));
}

#[tokio::test]
async fn test_second_run_skips_encoder() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();
    let payload_before = fs::read(&h.output).await.unwrap();
    let descriptor_before = fs::read_to_string(h.descriptor_path()).await.unwrap();

    // A different encoder output would show up if the encoder ran again.
    h.encoder.set_output(encoded_output(7)).await;
    let outcome = h.run(&h.request()).await.unwrap();

    assert!(!outcome.encoded());
    assert_eq!(h.encoder.encode_count().await, 1);
    assert_eq!(fs::read(&h.output).await.unwrap(), payload_before);
    assert_eq!(
        fs::read_to_string(h.descriptor_path()).await.unwrap(),
        descriptor_before
    );
}

#[tokio::test]
async fn test_unchanged_input_updates_only_loop_lines() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();
    let before = fs::read_to_string(h.descriptor_path()).await.unwrap();

    let outcome = h.run(&h.request().with_loop(1000, 2000)).await.unwrap();

    assert!(matches!(outcome, ConversionOutcome::LoopPointsUpdated { .. }));
    assert_eq!(outcome.loop_window(), LoopWindow::new(992, 1984));
    assert_eq!(h.encoder.encode_count().await, 1);

    let after = fs::read_to_string(h.descriptor_path()).await.unwrap();
    let changed: Vec<(&str, &str)> = before
        .lines()
        .zip(after.lines())
        .filter(|(b, a)| b != a)
        .collect();
    assert_eq!(
        changed,
        vec![
            ("loop_start_sample = 0", "loop_start_sample = 992"),
            ("loop_end_sample = 100000", "loop_end_sample = 1984"),
        ]
    );
}

#[tokio::test]
async fn test_out_of_range_loop_falls_back_to_full_track() {
    let h = TestHarness::new().await;

    let outcome = h
        .run(&h.request().with_loop(1000, 500_000))
        .await
        .unwrap();

    assert!(outcome.encoded());
    assert_eq!(outcome.loop_window(), LoopWindow::new(0, 100_000));
}

#[tokio::test]
async fn test_changed_input_is_reencoded() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();

    h.write_input(1).await;
    h.encoder.set_output(encoded_output(9)).await;
    let outcome = h.run(&h.request()).await.unwrap();

    assert!(matches!(
        outcome,
        ConversionOutcome::Encoded {
            decision: RebuildDecision::Changed,
            ..
        }
    ));
    assert_eq!(h.encoder.encode_count().await, 2);
    assert_eq!(fs::read(&h.output).await.unwrap(), encoded_payload(9));
}

#[tokio::test]
async fn test_missing_output_is_reencoded() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();
    fs::remove_file(&h.output).await.unwrap();

    let outcome = h.run(&h.request()).await.unwrap();

    assert!(matches!(
        outcome,
        ConversionOutcome::Encoded {
            decision: RebuildDecision::OutputMissing,
            ..
        }
    ));
    assert!(h.output.exists());
}

#[tokio::test]
async fn test_encoder_failure_keeps_previous_artifacts() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();
    let payload_before = fs::read(&h.output).await.unwrap();
    let descriptor_before = fs::read_to_string(h.descriptor_path()).await.unwrap();

    h.write_input(1).await;
    h.encoder.fail_next_with_status(3).await;
    let err = h.run(&h.request()).await.unwrap_err();

    match &err {
        PipelineError::Encoder(EncoderError::Failed { status, .. }) => {
            assert_eq!(*status, Some(3))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.stage(), PipelineStage::Encode);
    assert_eq!(fs::read(&h.output).await.unwrap(), payload_before);
    assert_eq!(
        fs::read_to_string(h.descriptor_path()).await.unwrap(),
        descriptor_before
    );
    assert!(!h.pipeline.temp_path(&h.output).exists());

    // The blanked record forces a rebuild even though the input is the same
    // as on the failed run.
    let outcome = h.run(&h.request()).await.unwrap();
    assert!(outcome.encoded());
    assert_eq!(h.encoder.encode_count().await, 3);
}

#[tokio::test]
async fn test_descriptor_commit_failure_restores_previous_payload() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();
    let payload_before = fs::read(&h.output).await.unwrap();

    // A non-empty directory where the descriptor goes cannot be replaced.
    fs::remove_file(h.descriptor_path()).await.unwrap();
    fs::create_dir(h.descriptor_path()).await.unwrap();
    fs::write(h.descriptor_path().join("notes"), b"keep")
        .await
        .unwrap();

    h.write_input(1).await;
    h.encoder.set_output(encoded_output(9)).await;
    let err = h.run(&h.request()).await.unwrap_err();

    assert!(matches!(err, PipelineError::Descriptor { ref path, .. } if *path == h.descriptor_path()));
    assert_eq!(h.encoder.encode_count().await, 2);
    assert_eq!(fs::read(&h.output).await.unwrap(), payload_before);
    assert!(h.descriptor_path().join("notes").exists());

    let build_dir = h.output.parent().unwrap();
    let mut leftovers = Vec::new();
    let mut entries = fs::read_dir(build_dir).await.unwrap();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        leftovers.push(entry.file_name().to_string_lossy().into_owned());
    }
    leftovers.sort();
    assert_eq!(leftovers, vec!["bgm01.raw", "bgm01.raw.txth"]);
}

#[tokio::test]
async fn test_missing_descriptor_recovers_on_next_run() {
    let h = TestHarness::new().await;
    h.run(&h.request()).await.unwrap();
    fs::remove_file(h.descriptor_path()).await.unwrap();

    let err = h.run(&h.request()).await.unwrap_err();
    assert!(matches!(err, PipelineError::MissingDescriptor { ref path } if *path == h.descriptor_path()));
    assert!(!err.is_missing_prerequisite());
    assert_eq!(h.encoder.encode_count().await, 1);

    let outcome = h.run(&h.request()).await.unwrap();
    assert!(outcome.encoded());
    assert!(read_descriptor(&h.descriptor_path()).await.is_ok());
}

#[tokio::test]
async fn test_zero_channel_input_is_fatal() {
    let h = TestHarness::new().await;
    let bytes = fixtures::WaveFixture {
        channel_count: 0,
        payload: vec![0u8; 4096],
        ..Default::default()
    }
    .to_bytes();
    fs::write(&h.input, bytes).await.unwrap();

    let err = h.run(&h.request()).await.unwrap_err();

    assert!(matches!(err, PipelineError::NoSamples { .. }));
    assert!(!h.output.exists());
    assert!(!h.descriptor_path().exists());
}

#[tokio::test]
async fn test_truncated_encoder_output_is_rejected() {
    let h = TestHarness::new().await;
    let mut bytes = encoded_output(0);
    bytes.truncate(bytes.len() - 100);
    h.encoder.set_output(bytes).await;

    let err = h.run(&h.request()).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Format {
            stage: PipelineStage::ExtractPayload,
            ..
        }
    ));
    assert!(!h.output.exists());
}

#[tokio::test]
async fn test_missing_encoder_is_missing_prerequisite() {
    let h = TestHarness::new().await;
    h.encoder
        .set_next_error(EncoderError::NotFound {
            path: PathBuf::from("xacttool_0.1/tools/AdpcmEncode.exe"),
        })
        .await;

    let err = h.run(&h.request()).await.unwrap_err();

    assert!(err.is_missing_prerequisite());
}

#[tokio::test]
async fn test_sha256_cache() {
    let h = TestHarness::with_cache(|dir| {
        CacheConfig::with_dir(dir.join("sha")).with_algorithm(FingerprintAlgorithm::Sha256)
    })
    .await;

    h.run(&h.request()).await.unwrap();
    let record = h.pipeline.cache().stored(&h.input).await.unwrap().unwrap();
    assert_eq!(record.len(), 64);

    let outcome = h.run(&h.request()).await.unwrap();
    assert!(!outcome.encoded());
    assert!(h.dir.path().join("sha").join("bgm01.wav.music").exists());
}
