//! Comma-separated sample line format for pinstream.
//!
//! One line per sweep, one decimal digit per channel in table order:
//! - each value is exactly `0` or `1`
//! - values are separated by a single `,` with no trailing comma
//! - the line ends with a single `\n`
//!
//! There is no header and no version; consumers identify channels purely by
//! column position.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use channel::{ChannelTable, DEFAULT_CHANNELS};
pub use codec::{
    decode_line, encode_line, parse_line, LineConfig, DEFAULT_MAX_LINE, SEPARATOR, TERMINATOR,
};
pub use error::{LineError, Result};
pub use reader::LineReader;
pub use writer::LineWriter;
