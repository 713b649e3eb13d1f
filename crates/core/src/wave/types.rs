//! Types for the wave module.

use std::fmt;

use tracing::warn;

use super::error::DivideByZero;

/// A four character chunk identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub [u8; 4]);

impl FourCc {
    /// Outer container identifier.
    pub const RIFF: FourCc = FourCc(*b"RIFF");
    /// Sub-format identifier for wave files.
    pub const WAVE: FourCc = FourCc(*b"WAVE");
    /// Format description block identifier.
    pub const FMT: FourCc = FourCc(*b"fmt ");
    /// Payload block identifier.
    pub const DATA: FourCc = FourCc(*b"data");
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Size of a format block that carries no extension.
pub const PLAIN_FORMAT_BLOCK_SIZE: u32 = 16;

/// Structural fields of a RIFF/WAVE header, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Container magic, always `RIFF`.
    pub format_tag: FourCc,
    /// Declared container size. Informational only.
    pub container_size: u32,
    /// Sub-format identifier, always `WAVE`.
    pub subformat_tag: FourCc,
    /// Format block identifier, always `fmt `.
    pub format_block_tag: FourCc,
    /// Size of the format block in bytes.
    pub format_block_size: u32,
    /// Codec identifier (1 = PCM, 2 = MS-ADPCM).
    pub audio_format_code: u16,
    /// Number of interleaved channels.
    pub channel_count: u16,
    /// Samples per second.
    pub sample_rate: u32,
    /// Average bytes per second.
    pub byte_rate: u32,
    /// Bytes per frame (PCM) or per compression block (ADPCM).
    pub block_align: u16,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Extension size, present only when `format_block_size != 16`.
    pub extension_size: Option<u16>,
    /// Raw extension bytes. Byte 0 holds the samples per compression block.
    pub extension_bytes: Vec<u8>,
    /// Payload block identifier, always `data`.
    pub payload_tag: FourCc,
    /// Payload size in bytes.
    pub payload_size: u32,
    /// Absolute file offset of the first payload byte.
    pub payload_offset: u64,
}

impl ContainerHeader {
    /// Whether the format block carried an extension.
    pub fn has_extension(&self) -> bool {
        self.extension_size.is_some()
    }

    /// Decoded samples covered by one compression block, or 0 when the header
    /// has no extension bytes.
    pub fn samples_per_block(&self) -> u32 {
        self.extension_bytes.first().copied().map(u32::from).unwrap_or(0)
    }

    /// Number of samples per channel described by the payload.
    ///
    /// Computed as `payload_size / channel_count / (bits_per_sample / 8)` with
    /// floor division at each step.
    pub fn try_total_samples(&self) -> Result<u64, DivideByZero> {
        let bytes_per_sample = u64::from(self.bits_per_sample / 8);
        if self.channel_count == 0 || bytes_per_sample == 0 {
            return Err(DivideByZero {
                channel_count: self.channel_count,
                bits_per_sample: self.bits_per_sample,
            });
        }

        Ok(u64::from(self.payload_size) / u64::from(self.channel_count) / bytes_per_sample)
    }

    /// Like [`try_total_samples`](Self::try_total_samples), but degenerate
    /// headers yield 0.
    pub fn total_samples(&self) -> u64 {
        match self.try_total_samples() {
            Ok(total) => total,
            Err(e) => {
                warn!("{}; treating sample count as 0 (re-encoded file?)", e);
                0
            }
        }
    }
}
