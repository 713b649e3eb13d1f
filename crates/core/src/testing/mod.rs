//! Testing utilities and mock implementations.
//!
//! Provides a mock of the external encoder and builders for in-memory wave
//! files, so the pipeline can be exercised without the real encoder.
//!
//! # Example
//!
//! ```rust,ignore
//! use songconv_core::testing::{fixtures, MockEncoder};
//!
//! let encoder = MockEncoder::new();
//! encoder.set_output(fixtures::adpcm_wave(2, 44100, 140, 32, &payload)).await;
//!
//! let pipeline = ConversionPipeline::new(config, cache, encoder.clone());
//! pipeline.run(&request).await?;
//!
//! assert_eq!(encoder.encode_count().await, 1);
//! ```

mod mock_encoder;

pub use mock_encoder::{MockEncoder, RecordedEncode};

/// Wave file fixtures.
pub mod fixtures {
    /// MS-ADPCM standard coefficient pairs.
    const ADPCM_COEFFICIENTS: [(i16, i16); 7] = [
        (256, 0),
        (512, -256),
        (0, 0),
        (192, 64),
        (240, 0),
        (460, -208),
        (392, -232),
    ];

    /// Describes a wave file to build. `extension: Some(..)` produces a format
    /// block larger than 16 bytes.
    #[derive(Debug, Clone)]
    pub struct WaveFixture {
        pub audio_format_code: u16,
        pub channel_count: u16,
        pub sample_rate: u32,
        pub byte_rate: u32,
        pub block_align: u16,
        pub bits_per_sample: u16,
        pub extension: Option<Vec<u8>>,
        pub payload: Vec<u8>,
    }

    impl Default for WaveFixture {
        fn default() -> Self {
            Self {
                audio_format_code: 1,
                channel_count: 2,
                sample_rate: 44100,
                byte_rate: 44100 * 4,
                block_align: 4,
                bits_per_sample: 16,
                extension: None,
                payload: Vec::new(),
            }
        }
    }

    impl WaveFixture {
        /// Serializes the fixture as a RIFF/WAVE file.
        pub fn to_bytes(&self) -> Vec<u8> {
            let format_block_size = match &self.extension {
                Some(ext) => 16 + 2 + ext.len() as u32,
                None => 16,
            };
            let container_size = 4 + (8 + format_block_size) + (8 + self.payload.len() as u32);

            let mut out = Vec::with_capacity(container_size as usize + 8);
            out.extend_from_slice(b"RIFF");
            out.extend_from_slice(&container_size.to_le_bytes());
            out.extend_from_slice(b"WAVE");
            out.extend_from_slice(b"fmt ");
            out.extend_from_slice(&format_block_size.to_le_bytes());
            out.extend_from_slice(&self.audio_format_code.to_le_bytes());
            out.extend_from_slice(&self.channel_count.to_le_bytes());
            out.extend_from_slice(&self.sample_rate.to_le_bytes());
            out.extend_from_slice(&self.byte_rate.to_le_bytes());
            out.extend_from_slice(&self.block_align.to_le_bytes());
            out.extend_from_slice(&self.bits_per_sample.to_le_bytes());
            if let Some(ext) = &self.extension {
                out.extend_from_slice(&(ext.len() as u16).to_le_bytes());
                out.extend_from_slice(ext);
            }
            out.extend_from_slice(b"data");
            out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&self.payload);
            out
        }
    }

    /// Builds an uncompressed PCM wave file.
    pub fn pcm_wave(channels: u16, sample_rate: u32, bits_per_sample: u16, payload: &[u8]) -> Vec<u8> {
        let block_align = channels * (bits_per_sample / 8);
        WaveFixture {
            audio_format_code: 1,
            channel_count: channels,
            sample_rate,
            byte_rate: sample_rate * u32::from(block_align),
            block_align,
            bits_per_sample,
            extension: None,
            payload: payload.to_vec(),
        }
        .to_bytes()
    }

    /// Builds an MS-ADPCM wave file with the usual 32-byte extension
    /// (samples per block, coefficient count, coefficient table).
    pub fn adpcm_wave(
        channels: u16,
        sample_rate: u32,
        block_align: u16,
        samples_per_block: u16,
        payload: &[u8],
    ) -> Vec<u8> {
        let mut extension = Vec::with_capacity(32);
        extension.extend_from_slice(&samples_per_block.to_le_bytes());
        extension.extend_from_slice(&(ADPCM_COEFFICIENTS.len() as u16).to_le_bytes());
        for (c1, c2) in ADPCM_COEFFICIENTS {
            extension.extend_from_slice(&c1.to_le_bytes());
            extension.extend_from_slice(&c2.to_le_bytes());
        }

        let byte_rate = if samples_per_block == 0 {
            0
        } else {
            sample_rate * u32::from(block_align) / u32::from(samples_per_block)
        };

        WaveFixture {
            audio_format_code: 2,
            channel_count: channels,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample: 4,
            extension: Some(extension),
            payload: payload.to_vec(),
        }
        .to_bytes()
    }
}
