//! Command line arguments and exit status mapping.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use songconv_core::{ConfigError, EncoderError, PipelineError};

/// Conversion succeeded.
pub const EXIT_OK: u8 = 0;
/// Encoding, parsing or writing failed.
pub const EXIT_FAILURE: u8 = 1;
/// Bad arguments, configuration or input path.
pub const EXIT_USAGE: u8 = 2;
/// The external encoder is not installed.
pub const EXIT_MISSING_PREREQUISITE: u8 = 3;

/// Convert a PCM wave file into a raw MS-ADPCM stream plus `.txth` descriptor
#[derive(Parser, Debug)]
#[command(name = "songconv")]
#[command(about = "Convert a PCM wave file into a raw MS-ADPCM stream plus .txth descriptor")]
#[command(version)]
pub struct Cli {
    /// Source PCM wave file
    pub input: PathBuf,

    /// Raw payload to write; the descriptor is written to <OUTPUT>.txth
    pub output: PathBuf,

    /// Loop start in samples (0 0 loops the whole track)
    #[arg(requires = "loop_end")]
    pub loop_start: Option<u64>,

    /// Loop end in samples
    pub loop_end: Option<u64>,

    /// Configuration file (defaults to songconv.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the parsed input and encoded headers
    #[arg(long)]
    pub print_headers: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Requested loop window, `(0, 0)` when none was given.
    pub fn loop_request(&self) -> (u64, u64) {
        (self.loop_start.unwrap_or(0), self.loop_end.unwrap_or(0))
    }
}

/// Problems with the invocation itself.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Input file not found: {0}")]
    InputMissing(PathBuf),
}

/// Maps a failure to the process exit status.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<UsageError>() || cause.is::<ConfigError>() {
            return EXIT_USAGE;
        }
        if let Some(e) = cause.downcast_ref::<EncoderError>() {
            if e.is_not_found() {
                return EXIT_MISSING_PREREQUISITE;
            }
        }
        if let Some(e) = cause.downcast_ref::<PipelineError>() {
            if e.is_missing_prerequisite() {
                return EXIT_MISSING_PREREQUISITE;
            }
        }
    }
    EXIT_FAILURE
}
