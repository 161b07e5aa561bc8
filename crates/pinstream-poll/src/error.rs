use pinstream_access::AccessError;
use pinstream_line::LineError;

use crate::state::PollState;

/// Errors that can occur in the poll loop.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The pin-access subsystem could not be initialized.
    #[error("pin access setup failed: {0}")]
    Setup(#[source] AccessError),

    /// A channel could not be set to input or pulled up.
    #[error("channel configuration failed: {0}")]
    Configure(#[source] AccessError),

    /// A channel read failed while running.
    #[error("channel read failed: {0}")]
    Read(#[source] AccessError),

    /// The output stream rejected a line.
    #[error("output failed: {0}")]
    Output(#[from] LineError),

    /// The requested operation is not valid in the current state.
    #[error("poller is {0}")]
    InvalidState(PollState),
}

impl PollError {
    /// True for failures during initialization.
    pub fn is_init(&self) -> bool {
        matches!(self, PollError::Setup(_) | PollError::Configure(_))
    }
}

pub type Result<T> = std::result::Result<T, PollError>;
