/// Errors that can occur while encoding, writing, or parsing sample lines.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// An I/O error occurred while reading or writing lines.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A column held something other than `0` or `1`.
    #[error("invalid sample {token:?} in column {column}")]
    InvalidToken { column: usize, token: String },

    /// The line does not have one column per channel.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    /// The stream ended in the middle of a line.
    #[error("stream ended inside a line ({0} bytes without newline)")]
    Truncated(usize),

    /// A line grew past the configured maximum without a newline.
    #[error("line too long ({size} bytes, max {max})")]
    LineTooLong { size: usize, max: usize },

    /// A channel list entry is not a valid pin identifier.
    #[error("invalid channel {0:?}")]
    InvalidChannel(String),
}

pub type Result<T> = std::result::Result<T, LineError>;
