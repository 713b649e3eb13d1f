//! Encoder module for the external MS-ADPCM encoder.
//!
//! The encoder itself is an opaque executable invoked as
//! `<encoder> <input.wav> <output>`; it writes a WAVE container holding
//! MS-ADPCM data. This module provides the `Encoder` trait used by the
//! pipeline and the process-spawning `AdpcmEncoder`.
//!
//! # Example
//!
//! ```ignore
//! use songconv_core::encoder::{AdpcmEncoder, Encoder, EncoderConfig};
//!
//! let encoder = AdpcmEncoder::new(
//!     EncoderConfig::with_path("xacttool_0.1/tools/AdpcmEncode.exe").with_launcher("wine"),
//! );
//! encoder.validate().await?;
//! let result = encoder.encode(Path::new("bgm01.wav"), Path::new("bgm01.raw.temp")).await?;
//! println!("Encoded in {} ms", result.duration_ms);
//! ```

mod adpcm;
mod config;
mod error;
mod traits;
mod types;

pub use adpcm::AdpcmEncoder;
pub use config::EncoderConfig;
pub use error::EncoderError;
pub use traits::Encoder;
pub use types::EncodeResult;
