//! Wave container module.
//!
//! Parses the structural fields of a RIFF/WAVE file: the outer container, the
//! `fmt ` block (with an optional codec extension such as MS-ADPCM's
//! coefficient table) and the location of the `data` payload.
//!
//! Parsing returns plain data. Diagnostic output lives in [`HeaderReport`] and
//! is only produced when a caller asks for it.
//!
//! # Example
//!
//! ```ignore
//! use songconv_core::wave::{read_header, read_payload};
//!
//! let header = read_header(Path::new("song.wav")).await?;
//! println!("{} samples", header.total_samples());
//!
//! let payload = read_payload(Path::new("song.wav"), &header).await?;
//! ```

mod error;
mod reader;
mod report;
mod types;

pub use error::{DivideByZero, FormatError};
pub use reader::{parse_header, read_header, read_payload};
pub use report::HeaderReport;
pub use types::{ContainerHeader, FourCc, PLAIN_FORMAT_BLOCK_SIZE};
