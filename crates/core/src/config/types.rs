use serde::{Deserialize, Serialize};

use crate::encoder::EncoderConfig;
use crate::fingerprint::CacheConfig;
use crate::pipeline::PipelineConfig;

/// Top-level configuration. Every section is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub encoder: EncoderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}
