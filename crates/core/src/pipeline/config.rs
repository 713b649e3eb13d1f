//! Pipeline configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extension appended to the output path for the encoder's intermediate
    /// file (`song.raw` -> `song.raw.temp`).
    #[serde(default = "default_temp_suffix")]
    pub temp_suffix: String,

    /// Keep the intermediate encoder output after the run.
    #[serde(default)]
    pub keep_temp_files: bool,

    /// Log both parsed headers at info level instead of debug.
    #[serde(default)]
    pub log_headers: bool,
}

fn default_temp_suffix() -> String {
    "temp".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            temp_suffix: default_temp_suffix(),
            keep_temp_files: false,
            log_headers: false,
        }
    }
}

impl PipelineConfig {
    /// Keeps intermediate encoder output.
    pub fn with_keep_temp_files(mut self, keep: bool) -> Self {
        self.keep_temp_files = keep;
        self
    }

    /// Sets the intermediate file suffix.
    pub fn with_temp_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.temp_suffix = suffix.into();
        self
    }
}
