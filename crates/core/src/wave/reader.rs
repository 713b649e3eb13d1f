//! Sequential RIFF/WAVE header reader.

use std::io::{ErrorKind, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, BufReader};
use tracing::debug;

use super::error::FormatError;
use super::types::{ContainerHeader, FourCc, PLAIN_FORMAT_BLOCK_SIZE};

/// Reads little-endian fields in order while tracking the byte cursor.
struct FieldReader<R> {
    inner: R,
    position: u64,
}

impl<R: AsyncRead + Unpin> FieldReader<R> {
    fn new(inner: R, position: u64) -> Self {
        Self { inner, position }
    }

    async fn fill(&mut self, buf: &mut [u8], field: &'static str) -> Result<(), FormatError> {
        match self.inner.read_exact(buf).await {
            Ok(_) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(FormatError::truncated(field, self.position))
            }
            Err(e) => Err(FormatError::Io(e)),
        }
    }

    async fn tag(&mut self, field: &'static str) -> Result<FourCc, FormatError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, field).await?;
        Ok(FourCc(buf))
    }

    async fn expect_tag(
        &mut self,
        field: &'static str,
        expected: FourCc,
    ) -> Result<FourCc, FormatError> {
        let found = self.tag(field).await?;
        if found != expected {
            return Err(FormatError::UnexpectedTag {
                field,
                expected,
                found,
            });
        }
        Ok(found)
    }

    async fn u16(&mut self, field: &'static str) -> Result<u16, FormatError> {
        let mut buf = [0u8; 2];
        self.fill(&mut buf, field).await?;
        Ok(u16::from_le_bytes(buf))
    }

    async fn u32(&mut self, field: &'static str) -> Result<u32, FormatError> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, field).await?;
        Ok(u32::from_le_bytes(buf))
    }

    async fn bytes(&mut self, len: usize, field: &'static str) -> Result<Vec<u8>, FormatError> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf, field).await?;
        Ok(buf)
    }

    async fn skip(&mut self, len: u64, field: &'static str) -> Result<(), FormatError> {
        let mut chunk = (&mut self.inner).take(len);
        let skipped = tokio::io::copy(&mut chunk, &mut tokio::io::sink()).await?;
        self.position += skipped;
        if skipped < len {
            return Err(FormatError::truncated(field, self.position));
        }
        Ok(())
    }
}

/// Reads the header of the wave file at `path`.
pub async fn read_header(path: &Path) -> Result<ContainerHeader, FormatError> {
    let file = File::open(path).await.map_err(|e| FormatError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_header(BufReader::new(file)).await
}

/// Parses a wave header from the start of `reader`.
///
/// Fields are consumed strictly in file order. When the format block is not
/// exactly 16 bytes, an extension size and that many extension bytes are read
/// before the payload header. Chunks other than `data` between the format
/// block and the payload (`LIST`, `fact`, ...) are skipped, including their
/// pad byte. `payload_offset` is the cursor position right after the payload
/// size field.
pub async fn parse_header<R: AsyncRead + Unpin>(reader: R) -> Result<ContainerHeader, FormatError> {
    let mut r = FieldReader::new(reader, 0);

    let format_tag = r.expect_tag("format tag", FourCc::RIFF).await?;
    let container_size = r.u32("container size").await?;
    let subformat_tag = r.expect_tag("sub-format tag", FourCc::WAVE).await?;
    let format_block_tag = r.expect_tag("format block tag", FourCc::FMT).await?;
    let format_block_size = r.u32("format block size").await?;
    let audio_format_code = r.u16("audio format").await?;
    let channel_count = r.u16("channel count").await?;
    let sample_rate = r.u32("sample rate").await?;
    let byte_rate = r.u32("byte rate").await?;
    let block_align = r.u16("block align").await?;
    let bits_per_sample = r.u16("bits per sample").await?;

    let (extension_size, extension_bytes) = if format_block_size != PLAIN_FORMAT_BLOCK_SIZE {
        let size = r.u16("extension size").await?;
        let bytes = r.bytes(usize::from(size), "extension bytes").await?;
        (Some(size), bytes)
    } else {
        (None, Vec::new())
    };

    let (payload_tag, payload_size) = loop {
        let tag = r.tag("payload tag").await?;
        let size = r.u32("payload size").await?;
        if tag == FourCc::DATA {
            break (tag, size);
        }
        debug!("Skipping '{}' chunk of {} bytes at offset {}", tag, size, r.position);
        r.skip(u64::from(size) + u64::from(size % 2), "skipped chunk").await?;
    };

    Ok(ContainerHeader {
        format_tag,
        container_size,
        subformat_tag,
        format_block_tag,
        format_block_size,
        audio_format_code,
        channel_count,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        extension_size,
        extension_bytes,
        payload_tag,
        payload_size,
        payload_offset: r.position,
    })
}

/// Reads exactly `payload_size` bytes starting at `payload_offset`.
pub async fn read_payload(path: &Path, header: &ContainerHeader) -> Result<Vec<u8>, FormatError> {
    let mut file = File::open(path).await.map_err(|e| FormatError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Check the length up front so a bogus size never drives a huge allocation.
    let file_len = file.metadata().await?.len();
    let payload_end = header.payload_offset + u64::from(header.payload_size);
    if file_len < payload_end {
        return Err(FormatError::truncated("payload", file_len.max(header.payload_offset)));
    }

    file.seek(SeekFrom::Start(header.payload_offset)).await?;
    let mut r = FieldReader::new(file, header.payload_offset);
    r.bytes(header.payload_size as usize, "payload").await
}
