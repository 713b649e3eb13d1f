//! Configuration for the encoder module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external ADPCM encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Path to the encoder executable.
    #[serde(default = "default_encoder_path")]
    pub path: PathBuf,

    /// Program used to start the encoder (e.g. `wine`). The encoder path is
    /// passed as its first argument.
    #[serde(default)]
    pub launcher: Option<PathBuf>,
}

fn default_encoder_path() -> PathBuf {
    PathBuf::from("xacttool_0.1/tools/AdpcmEncode.exe")
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            path: default_encoder_path(),
            launcher: None,
        }
    }
}

impl EncoderConfig {
    /// Creates a config for the executable at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            launcher: None,
        }
    }

    /// Sets the launcher program.
    pub fn with_launcher(mut self, launcher: impl Into<PathBuf>) -> Self {
        self.launcher = Some(launcher.into());
        self
    }
}
