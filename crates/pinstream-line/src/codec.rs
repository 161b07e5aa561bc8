use bytes::{Buf, BufMut, BytesMut};
use pinstream_access::Level;

use crate::error::{LineError, Result};

/// Column separator.
pub const SEPARATOR: u8 = b',';

/// Line terminator.
pub const TERMINATOR: u8 = b'\n';

/// Default upper bound on a buffered line when parsing: 64 KiB.
pub const DEFAULT_MAX_LINE: usize = 64 * 1024;

/// Encode one sweep into the wire format.
///
/// Wire format for three channels:
/// ```text
/// 1,0,1\n
/// ```
/// An empty sweep encodes as a bare `\n`.
pub fn encode_line(samples: &[Level], dst: &mut BytesMut) {
    dst.reserve(samples.len() * 2 + 1);
    for (index, level) in samples.iter().enumerate() {
        if index > 0 {
            dst.put_u8(SEPARATOR);
        }
        dst.put_u8(level.digit());
    }
    dst.put_u8(TERMINATOR);
}

/// Parse one line without its terminator.
///
/// An empty line is a sweep of zero channels.
pub fn parse_line(line: &[u8]) -> Result<Vec<Level>> {
    if line.is_empty() {
        return Ok(Vec::new());
    }

    line.split(|byte| *byte == SEPARATOR)
        .enumerate()
        .map(|(column, token)| match token {
            [digit] => Level::from_digit(*digit).ok_or_else(|| invalid(column, token)),
            _ => Err(invalid(column, token)),
        })
        .collect()
}

/// Decode the next complete line from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't hold a full line yet. On success,
/// consumes the line and its terminator from the buffer.
pub fn decode_line(src: &mut BytesMut, config: &LineConfig) -> Result<Option<Vec<Level>>> {
    let Some(end) = src.iter().position(|byte| *byte == TERMINATOR) else {
        if src.len() > config.max_line_len {
            return Err(LineError::LineTooLong {
                size: src.len(),
                max: config.max_line_len,
            });
        }
        return Ok(None); // Need more data
    };

    let line = src.split_to(end);
    src.advance(1);

    let samples = parse_line(&line)?;
    if let Some(expected) = config.expected_columns {
        if samples.len() != expected {
            return Err(LineError::ColumnCount {
                expected,
                found: samples.len(),
            });
        }
    }

    Ok(Some(samples))
}

fn invalid(column: usize, token: &[u8]) -> LineError {
    LineError::InvalidToken {
        column,
        token: String::from_utf8_lossy(token).into_owned(),
    }
}

/// Configuration for line parsing.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Column count every line must have. `None` accepts any count.
    pub expected_columns: Option<usize>,
    /// Maximum bytes buffered while waiting for a newline. Default: 64 KiB.
    pub max_line_len: usize,
}

impl LineConfig {
    /// Parse lines that must carry exactly `columns` samples.
    pub fn with_columns(columns: usize) -> Self {
        Self {
            expected_columns: Some(columns),
            ..Self::default()
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            expected_columns: None,
            max_line_len: DEFAULT_MAX_LINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use Level::{High, Low};

    fn encoded(samples: &[Level]) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_line(samples, &mut buf);
        buf
    }

    #[test]
    fn encode_three_channels() {
        assert_eq!(&encoded(&[High, Low, High])[..], b"1,0,1\n");
    }

    #[test]
    fn encode_nine_lows() {
        assert_eq!(&encoded(&[Low; 9])[..], b"0,0,0,0,0,0,0,0,0\n");
    }

    #[test]
    fn encode_empty_sweep_is_bare_newline() {
        assert_eq!(&encoded(&[])[..], b"\n");
    }

    #[test]
    fn encode_single_channel_has_no_separator() {
        assert_eq!(&encoded(&[High])[..], b"1\n");
    }

    #[test]
    fn encode_appends_to_existing_buffer() {
        let mut buf = BytesMut::new();
        encode_line(&[Low], &mut buf);
        encode_line(&[High, High], &mut buf);
        assert_eq!(&buf[..], b"0\n1,1\n");
    }

    #[test]
    fn decode_incomplete_line() {
        let mut buf = BytesMut::from(&b"1,0"[..]);
        let result = decode_line(&mut buf, &LineConfig::default()).unwrap();
        assert!(result.is_none());
        assert_eq!(&buf[..], b"1,0");
    }

    #[test]
    fn decode_consumes_one_line() {
        let mut buf = BytesMut::from(&b"1,0,1\n0,0,0\n"[..]);
        let config = LineConfig::with_columns(3);

        let first = decode_line(&mut buf, &config).unwrap().unwrap();
        assert_eq!(first, vec![High, Low, High]);
        assert_eq!(&buf[..], b"0,0,0\n");
    }

    #[test]
    fn decode_bare_newline_is_empty_sweep() {
        let mut buf = BytesMut::from(&b"\n"[..]);
        let sweep = decode_line(&mut buf, &LineConfig::with_columns(0))
            .unwrap()
            .unwrap();
        assert!(sweep.is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn parse_rejects_stray_commas() {
        for line in [&b"1,0,"[..], &b",1,0"[..], &b"1,,0"[..], &b","[..]] {
            assert!(
                matches!(parse_line(line), Err(LineError::InvalidToken { .. })),
                "{:?} should be rejected",
                String::from_utf8_lossy(line)
            );
        }
    }

    #[test]
    fn parse_rejects_non_binary_tokens() {
        let err = parse_line(b"1,2").unwrap_err();
        assert!(matches!(
            err,
            LineError::InvalidToken { column: 1, ref token } if token == "2"
        ));
        assert!(parse_line(b"10").is_err());
        assert!(parse_line(b" 1").is_err());
    }

    #[test]
    fn decode_checks_column_count() {
        let mut buf = BytesMut::from(&b"1,1\n"[..]);
        let result = decode_line(&mut buf, &LineConfig::with_columns(3));
        assert!(matches!(
            result,
            Err(LineError::ColumnCount {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn decode_line_too_long() {
        let mut buf = BytesMut::from(&b"1,1,1,1"[..]);
        let config = LineConfig {
            expected_columns: None,
            max_line_len: 4,
        };
        assert!(matches!(
            decode_line(&mut buf, &config),
            Err(LineError::LineTooLong { size: 7, max: 4 })
        ));
    }
}
