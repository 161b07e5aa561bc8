use std::time::Duration;

/// Nominal pause between sweeps.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(100);

/// Controls poll loop timing and lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause after each sweep. Not compensated for sweep time.
    pub period: Duration,
    /// Stop after this many sweeps. `None` polls until the process dies.
    pub max_sweeps: Option<u64>,
}

impl PollConfig {
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Self::default()
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            max_sweeps: None,
        }
    }
}
