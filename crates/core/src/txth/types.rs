//! Types for the txth module.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::loop_window::LoopWindow;
use crate::wave::ContainerHeader;

use super::error::TxthError;

/// Codec name written for the encoder's output.
pub const CODEC: &str = "MSADPCM";

pub const KEY_NUM_SAMPLES: &str = "num_samples";
pub const KEY_CODEC: &str = "codec";
pub const KEY_CHANNELS: &str = "channels";
pub const KEY_SAMPLE_RATE: &str = "sample_rate";
pub const KEY_INTERLEAVE: &str = "interleave";
pub const KEY_SAMPLES_PER_BLOCK: &str = "samples_per_block";
pub const KEY_LOOP_START: &str = "loop_start_sample";
pub const KEY_LOOP_END: &str = "loop_end_sample";

/// Every key of a descriptor, in the order it is written.
pub const KEYS: [&str; 8] = [
    KEY_NUM_SAMPLES,
    KEY_CODEC,
    KEY_CHANNELS,
    KEY_SAMPLE_RATE,
    KEY_INTERLEAVE,
    KEY_SAMPLES_PER_BLOCK,
    KEY_LOOP_START,
    KEY_LOOP_END,
];

/// Playback parameters of an encoded stream, stored as a `.txth` sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxthDescriptor {
    /// Samples per channel, taken from the source wave.
    pub num_samples: u64,
    pub codec: String,
    pub channels: u16,
    pub sample_rate: u32,
    /// Bytes per compression block.
    pub interleave: u16,
    pub samples_per_block: u32,
    pub loop_start_sample: u64,
    pub loop_end_sample: u64,
}

impl TxthDescriptor {
    /// Builds a descriptor from the encoder's output header.
    ///
    /// `total_samples` comes from the source wave; the encoder may legitimately
    /// report different chunk sizes.
    pub fn from_header(encoded: &ContainerHeader, total_samples: u64, window: LoopWindow) -> Self {
        Self {
            num_samples: total_samples,
            codec: CODEC.to_string(),
            channels: encoded.channel_count,
            sample_rate: encoded.sample_rate,
            interleave: encoded.block_align,
            samples_per_block: encoded.samples_per_block(),
            loop_start_sample: window.start_sample,
            loop_end_sample: window.end_sample,
        }
    }

    /// Recorded loop window.
    pub fn loop_window(&self) -> LoopWindow {
        LoopWindow::new(self.loop_start_sample, self.loop_end_sample)
    }

    /// Renders `key = value` lines in descriptor order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for key in KEYS {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{} = {}", key, self.value(key));
        }
        out
    }

    fn value(&self, key: &str) -> String {
        match key {
            KEY_NUM_SAMPLES => self.num_samples.to_string(),
            KEY_CODEC => self.codec.clone(),
            KEY_CHANNELS => self.channels.to_string(),
            KEY_SAMPLE_RATE => self.sample_rate.to_string(),
            KEY_INTERLEAVE => self.interleave.to_string(),
            KEY_SAMPLES_PER_BLOCK => self.samples_per_block.to_string(),
            KEY_LOOP_START => self.loop_start_sample.to_string(),
            KEY_LOOP_END => self.loop_end_sample.to_string(),
            _ => String::new(),
        }
    }

    /// Parses descriptor text. Unknown and blank lines are ignored; every
    /// known key must be present.
    pub fn parse(text: &str) -> Result<Self, TxthError> {
        let mut values: [Option<&str>; 8] = [None; 8];
        for line in text.lines() {
            let Some((key, value)) = split_line(line) else {
                continue;
            };
            if let Some(index) = KEYS.iter().position(|k| *k == key) {
                values[index] = Some(value);
            }
        }

        Ok(Self {
            num_samples: parse_number(&values, KEY_NUM_SAMPLES)?,
            codec: required(&values, KEY_CODEC)?.to_string(),
            channels: parse_number(&values, KEY_CHANNELS)?,
            sample_rate: parse_number(&values, KEY_SAMPLE_RATE)?,
            interleave: parse_number(&values, KEY_INTERLEAVE)?,
            samples_per_block: parse_number(&values, KEY_SAMPLES_PER_BLOCK)?,
            loop_start_sample: parse_number(&values, KEY_LOOP_START)?,
            loop_end_sample: parse_number(&values, KEY_LOOP_END)?,
        })
    }
}

fn required<'a>(values: &[Option<&'a str>; 8], key: &'static str) -> Result<&'a str, TxthError> {
    KEYS.iter()
        .position(|k| *k == key)
        .and_then(|index| values[index])
        .ok_or(TxthError::MissingKey { key })
}

/// Splits a `key = value` line into trimmed parts.
pub(crate) fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn parse_number<T: std::str::FromStr>(
    values: &[Option<&str>; 8],
    key: &'static str,
) -> Result<T, TxthError> {
    let value = required(values, key)?;
    value.parse().map_err(|_| TxthError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::FourCc;

    fn encoded_header() -> ContainerHeader {
        ContainerHeader {
            format_tag: FourCc::RIFF,
            container_size: 0,
            subformat_tag: FourCc::WAVE,
            format_block_tag: FourCc::FMT,
            format_block_size: 50,
            audio_format_code: 2,
            channel_count: 2,
            sample_rate: 44100,
            byte_rate: 0,
            block_align: 140,
            bits_per_sample: 4,
            extension_size: Some(32),
            extension_bytes: {
                let mut ext = vec![0u8; 32];
                ext[0] = 32;
                ext
            },
            payload_tag: FourCc::DATA,
            payload_size: 0,
            payload_offset: 78,
        }
    }

    fn descriptor() -> TxthDescriptor {
        TxthDescriptor::from_header(&encoded_header(), 100_000, LoopWindow::new(992, 1984))
    }

    #[test]
    fn test_from_header_uses_encoded_parameters() {
        let d = descriptor();
        assert_eq!(d.num_samples, 100_000);
        assert_eq!(d.codec, "MSADPCM");
        assert_eq!(d.channels, 2);
        assert_eq!(d.sample_rate, 44100);
        assert_eq!(d.interleave, 140);
        assert_eq!(d.samples_per_block, 32);
        assert_eq!(d.loop_window(), LoopWindow::new(992, 1984));
    }

    #[test]
    fn test_render_order() {
        assert_eq!(
            descriptor().render(),
            "num_samples = 100000\n\
             codec = MSADPCM\n\
             channels = 2\n\
             sample_rate = 44100\n\
             interleave = 140\n\
             samples_per_block = 32\n\
             loop_start_sample = 992\n\
             loop_end_sample = 1984\n"
        );
    }

    #[test]
    fn test_parse_rendered() {
        let d = descriptor();
        assert_eq!(TxthDescriptor::parse(&d.render()).unwrap(), d);
    }

    #[test]
    fn test_parse_tolerates_order_spacing_and_extras() {
        let text = "codec=MSADPCM\r\n\
                    # comment\r\n\
                    \r\n\
                    loop_end_sample =64\r\n\
                    num_samples= 10\r\n\
                    channels = 1\r\n\
                    sample_rate = 22050\r\n\
                    interleave = 70\r\n\
                    samples_per_block = 64\r\n\
                    loop_start_sample = 0\r\n\
                    body_file = song.raw\r\n";
        let d = TxthDescriptor::parse(text).unwrap();
        assert_eq!(d.num_samples, 10);
        assert_eq!(d.channels, 1);
        assert_eq!(d.loop_end_sample, 64);
    }

    #[test]
    fn test_parse_missing_key() {
        let text = descriptor().render().replace("interleave = 140\n", "");
        assert!(matches!(
            TxthDescriptor::parse(&text),
            Err(TxthError::MissingKey { key: "interleave" })
        ));
    }

    #[test]
    fn test_parse_invalid_value() {
        let text = descriptor()
            .render()
            .replace("num_samples = 100000", "num_samples = lots");
        match TxthDescriptor::parse(&text) {
            Err(TxthError::InvalidValue { key, value }) => {
                assert_eq!(key, "num_samples");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
