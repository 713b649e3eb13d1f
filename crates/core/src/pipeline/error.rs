//! Error types for the pipeline module.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::encoder::EncoderError;
use crate::txth::TxthError;
use crate::wave::FormatError;

use super::types::PipelineStage;

/// Terminal outcome of a failed conversion run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A wave container could not be parsed.
    #[error("Malformed wave file {path} during {stage}")]
    Format {
        stage: PipelineStage,
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// The external encoder failed or could not be started.
    #[error(transparent)]
    Encoder(#[from] EncoderError),

    /// The input was unchanged but its descriptor is gone. The fingerprint
    /// has been invalidated, so the next run re-encodes.
    #[error("Expected txth file missing: {path}")]
    MissingDescriptor { path: PathBuf },

    /// The descriptor could not be read, parsed or written.
    #[error("Descriptor error for {path}")]
    Descriptor {
        path: PathBuf,
        #[source]
        source: TxthError,
    },

    /// The input header yields no samples.
    #[error("No samples in {path}; cannot derive loop points")]
    NoSamples { path: PathBuf },

    /// File I/O failed.
    #[error("I/O error on {path} during {stage}")]
    Io {
        stage: PipelineStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn format(stage: PipelineStage, path: &Path, source: FormatError) -> Self {
        Self::Format {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn io(stage: PipelineStage, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            stage,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Maps a descriptor error, keeping a missing file distinct.
    pub fn descriptor(path: &Path, source: TxthError) -> Self {
        if source.is_missing() {
            Self::MissingDescriptor {
                path: path.to_path_buf(),
            }
        } else {
            Self::Descriptor {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Stage the run was in when it failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Format { stage, .. } | Self::Io { stage, .. } => *stage,
            Self::Encoder(_) => PipelineStage::Encode,
            Self::MissingDescriptor { .. } => PipelineStage::UpdateLoopOnly,
            Self::Descriptor { .. } => PipelineStage::WriteMetadata,
            Self::NoSamples { .. } => PipelineStage::ExtractPayload,
        }
    }

    /// Whether the run failed because a required tool is not installed.
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(self, Self::Encoder(e) if e.is_not_found())
    }
}
