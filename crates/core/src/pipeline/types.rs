//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::fingerprint::RebuildDecision;
use crate::loop_window::LoopWindow;

/// One conversion to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Source PCM wave file.
    pub input_path: PathBuf,
    /// Destination of the raw encoded payload. The descriptor goes next to
    /// it as `<output>.txth`.
    pub output_path: PathBuf,
    /// Requested loop start in samples; `0` together with `loop_end == 0`
    /// loops the whole track.
    #[serde(default)]
    pub loop_start: u64,
    #[serde(default)]
    pub loop_end: u64,
}

impl ConversionRequest {
    /// Request looping the whole track.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            loop_start: 0,
            loop_end: 0,
        }
    }

    /// Sets the requested loop boundaries.
    pub fn with_loop(mut self, start: u64, end: u64) -> Self {
        self.loop_start = start;
        self.loop_end = end;
        self
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Steps of a conversion run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    CheckCache,
    UpdateLoopOnly,
    Encode,
    ParseHeaders,
    ExtractPayload,
    ComputeLoop,
    WriteMetadata,
    WritePayload,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CheckCache => "check_cache",
            Self::UpdateLoopOnly => "update_loop_only",
            Self::Encode => "encode",
            Self::ParseHeaders => "parse_headers",
            Self::ExtractPayload => "extract_payload",
            Self::ComputeLoop => "compute_loop",
            Self::WriteMetadata => "write_metadata",
            Self::WritePayload => "write_payload",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// The input was encoded and both artifacts were (re)written.
    Encoded {
        output_path: PathBuf,
        descriptor_path: PathBuf,
        /// Why the encode was needed.
        decision: RebuildDecision,
        total_samples: u64,
        samples_per_block: u32,
        payload_bytes: u64,
        loop_window: LoopWindow,
        encode_ms: u64,
    },
    /// The input was unchanged; only the descriptor's loop lines were rewritten.
    LoopPointsUpdated {
        output_path: PathBuf,
        descriptor_path: PathBuf,
        loop_window: LoopWindow,
    },
}

impl ConversionOutcome {
    /// Whether the external encoder ran.
    pub fn encoded(&self) -> bool {
        matches!(self, Self::Encoded { .. })
    }

    /// Loop window written to the descriptor.
    pub fn loop_window(&self) -> LoopWindow {
        match self {
            Self::Encoded { loop_window, .. } | Self::LoopPointsUpdated { loop_window, .. } => {
                *loop_window
            }
        }
    }

    pub fn descriptor_path(&self) -> &Path {
        match self {
            Self::Encoded {
                descriptor_path, ..
            }
            | Self::LoopPointsUpdated {
                descriptor_path, ..
            } => descriptor_path,
        }
    }
}

impl fmt::Display for ConversionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encoded {
                output_path,
                total_samples,
                loop_window,
                ..
            } => write!(
                f,
                "Encoded {} ({} samples, loop {} - {})",
                output_path.display(),
                total_samples,
                loop_window.start_sample,
                loop_window.end_sample
            ),
            Self::LoopPointsUpdated {
                output_path,
                loop_window,
                ..
            } => write!(
                f,
                "Unchanged {}; loop points set to {} - {}",
                output_path.display(),
                loop_window.start_sample,
                loop_window.end_sample
            ),
        }
    }
}
