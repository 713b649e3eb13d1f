//! External MS-ADPCM encoder implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, info};

use super::config::EncoderConfig;
use super::error::EncoderError;
use super::traits::Encoder;
use super::types::EncodeResult;

/// Runs an `AdpcmEncode`-style executable as `<path> <input> <output>`.
pub struct AdpcmEncoder {
    config: EncoderConfig,
}

impl AdpcmEncoder {
    /// Creates a new encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Program to spawn and its arguments.
    fn build_command(&self, input: &Path, output: &Path) -> (PathBuf, Vec<OsString>) {
        let mut args = Vec::with_capacity(3);
        let program = match &self.config.launcher {
            Some(launcher) => {
                args.push(self.config.path.clone().into_os_string());
                launcher.clone()
            }
            None => self.config.path.clone(),
        };
        args.push(input.as_os_str().to_os_string());
        args.push(output.as_os_str().to_os_string());
        (program, args)
    }
}

#[async_trait]
impl Encoder for AdpcmEncoder {
    fn name(&self) -> &str {
        "adpcm"
    }

    async fn validate(&self) -> Result<(), EncoderError> {
        match tokio::fs::metadata(&self.config.path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(EncoderError::NotFound {
                path: self.config.path.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(EncoderError::NotFound {
                path: self.config.path.clone(),
            }),
            Err(e) => Err(EncoderError::Io(e)),
        }
    }

    async fn encode(&self, input: &Path, output: &Path) -> Result<EncodeResult, EncoderError> {
        let start = Instant::now();
        let (program, args) = self.build_command(input, output);
        info!("Encoding {:?} -> {:?}", input, output);

        let result = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    EncoderError::NotFound {
                        path: program.clone(),
                    }
                } else {
                    EncoderError::LaunchFailed {
                        path: program.clone(),
                        source: e,
                    }
                }
            })?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!("encoder: {}", line);
        }

        if !result.status.success() {
            return Err(EncoderError::failed(result.status.code(), &result.stderr));
        }

        let meta = match tokio::fs::metadata(output).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(EncoderError::OutputMissing {
                    path: output.to_path_buf(),
                })
            }
            Err(e) => return Err(EncoderError::Io(e)),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("Encoder finished in {} ms ({} bytes)", duration_ms, meta.len());

        Ok(EncodeResult {
            output_path: output.to_path_buf(),
            output_size_bytes: meta.len(),
            duration_ms,
        })
    }
}
