//! Conversion pipeline.
//!
//! Ties the fingerprint cache, the external encoder, the wave parser and the
//! descriptor writer together into a single run per input file. A run either
//! encodes the input and places `<output>` plus `<output>.txth`, or, when the
//! input is unchanged since the last successful run, only refreshes the loop
//! points of the existing descriptor.

mod config;
mod error;
mod runner;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use runner::ConversionPipeline;
pub use types::{ConversionOutcome, ConversionRequest, PipelineStage};
