//! Fixed-period GPIO poll loop.
//!
//! Initializes every channel in the table once, then sweeps all channels in
//! table order and emits one line per sweep, pausing a fixed period between
//! sweeps. The pause is measured from the end of each sweep, so the real
//! period drifts by the time spent reading and writing.

pub mod config;
pub mod delay;
pub mod error;
pub mod poller;
pub mod state;

pub use config::{PollConfig, DEFAULT_PERIOD};
pub use delay::{Delay, ThreadSleep};
pub use error::{PollError, Result};
pub use poller::{Poller, RunOutcome, StopHandle};
pub use state::PollState;
