use std::fmt;
use std::io;

use pinstream_line::LineError;
use pinstream_poll::PollError;

// Initialization failures always exit with FAILURE; consumers only check non-zero.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PIN_ACCESS_ERROR: i32 = 3;
pub const HEALTH_CHECK_FAILED: i32 = 30;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn line_error(context: &str, err: LineError) -> CliError {
    match err {
        LineError::Io(source) => io_error(context, source),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn poll_error(context: &str, err: PollError) -> CliError {
    match err {
        PollError::Setup(_) | PollError::Configure(_) => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        PollError::Read(_) => CliError::new(PIN_ACCESS_ERROR, format!("{context}: {err}")),
        PollError::Output(err) => line_error(context, err),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use pinstream_access::{AccessError, Channel};
    use pinstream_poll::PollState;

    use super::*;

    #[test]
    fn init_failures_exit_with_failure() {
        let setup = PollError::Setup(AccessError::NotInitialized);
        let configure = PollError::Configure(AccessError::NotConfigured(Channel(3)));
        assert_eq!(poll_error("poll", setup).code, FAILURE);
        assert_eq!(poll_error("poll", configure).code, FAILURE);
    }

    #[test]
    fn runtime_failures_are_distinct() {
        let read = PollError::Read(AccessError::NotConfigured(Channel(0)));
        assert_eq!(poll_error("poll", read).code, PIN_ACCESS_ERROR);

        let state = PollError::InvalidState(PollState::Aborted);
        assert_eq!(poll_error("poll", state).code, INTERNAL);
    }

    #[test]
    fn closed_consumer_maps_to_failure() {
        let err = PollError::Output(LineError::Io(io::Error::from(io::ErrorKind::BrokenPipe)));
        let cli = poll_error("write", err);
        assert_eq!(cli.code, FAILURE);
        assert!(cli.message.starts_with("write: "));
    }
}
