use std::fmt;

/// Lifecycle of a poller.
///
/// `Uninitialized -> Initializing -> Running`, or `Initializing -> Aborted`
/// when setup or pin configuration fails. `Running` never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Uninitialized,
    Initializing,
    Running,
    Aborted,
}

impl PollState {
    pub fn as_str(self) -> &'static str {
        match self {
            PollState::Uninitialized => "uninitialized",
            PollState::Initializing => "initializing",
            PollState::Running => "running",
            PollState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
