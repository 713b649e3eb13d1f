//! Human readable rendering of a parsed header.

use std::fmt;
use std::path::Path;

use super::types::ContainerHeader;

/// Diagnostic view of a [`ContainerHeader`]. Rendering never feeds back into
/// parsing.
pub struct HeaderReport<'a> {
    path: &'a Path,
    header: &'a ContainerHeader,
}

impl<'a> HeaderReport<'a> {
    pub fn new(path: &'a Path, header: &'a ContainerHeader) -> Self {
        Self { path, header }
    }
}

impl fmt::Display for HeaderReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.header;
        writeln!(f, "File: {}", self.path.display())?;
        writeln!(f, "  RIFF: {}", h.format_tag)?;
        writeln!(f, "  Chunk size: {}", h.container_size)?;
        writeln!(f, "  Format: {}", h.subformat_tag)?;
        writeln!(f, "  Format block: {} ({} bytes)", h.format_block_tag, h.format_block_size)?;
        writeln!(f, "  Audio format: {}", h.audio_format_code)?;
        writeln!(f, "  Channels: {}", h.channel_count)?;
        writeln!(f, "  Sample rate: {}", h.sample_rate)?;
        writeln!(f, "  Byte rate: {}", h.byte_rate)?;
        writeln!(f, "  Block align: {}", h.block_align)?;
        writeln!(f, "  Bits per sample: {}", h.bits_per_sample)?;
        if let Some(size) = h.extension_size {
            let bytes: Vec<String> = h.extension_bytes.iter().map(|b| b.to_string()).collect();
            writeln!(f, "  Extension size: {}", size)?;
            writeln!(f, "  Extension: {}", bytes.join(","))?;
            writeln!(f, "  Samples per block: {}", h.samples_per_block())?;
        }
        writeln!(f, "  Payload: {} ({} bytes)", h.payload_tag, h.payload_size)?;
        write!(f, "  Payload offset: {}", h.payload_offset)
    }
}

impl ContainerHeader {
    /// Returns a displayable diagnostic report for this header.
    pub fn report<'a>(&'a self, path: &'a Path) -> HeaderReport<'a> {
        HeaderReport::new(path, self)
    }
}
