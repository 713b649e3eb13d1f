pub mod config;
pub mod encoder;
pub mod fingerprint;
pub mod loop_window;
pub mod pipeline;
pub mod staging;
pub mod testing;
pub mod txth;
pub mod wave;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use encoder::{AdpcmEncoder, Encoder, EncoderConfig, EncoderError};
pub use fingerprint::{CacheConfig, FingerprintAlgorithm, FingerprintCache, RebuildDecision};
pub use loop_window::{align_to_block, resolve_loop_window, LoopWindow};
pub use pipeline::{
    ConversionOutcome, ConversionPipeline, ConversionRequest, PipelineConfig, PipelineError,
    PipelineStage,
};
pub use txth::{TxthDescriptor, TxthError};
pub use wave::{read_header, ContainerHeader, FormatError};
