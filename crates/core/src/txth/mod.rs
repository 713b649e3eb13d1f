//! TXTH descriptor files.
//!
//! A descriptor is a small `key = value` text file placed next to an encoded
//! stream (`song.raw.txth`) that tells a generic player how to decode it:
//! codec, channel layout, block geometry and loop window.

mod error;
mod types;
mod writer;

pub use error::TxthError;
pub use types::{
    TxthDescriptor, CODEC, KEYS, KEY_CHANNELS, KEY_CODEC, KEY_INTERLEAVE, KEY_LOOP_END,
    KEY_LOOP_START, KEY_NUM_SAMPLES, KEY_SAMPLES_PER_BLOCK, KEY_SAMPLE_RATE,
};
pub use writer::{
    descriptor_path, read_descriptor, stage_descriptor, update_loop_points, write_descriptor,
    DESCRIPTOR_EXTENSION,
};
