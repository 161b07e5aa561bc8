use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pinstream_access::{Level, PinAccess};
use pinstream_line::{ChannelTable, LineWriter};
use tracing::{debug, info, trace, warn};

use crate::config::PollConfig;
use crate::delay::{Delay, ThreadSleep};
use crate::error::{PollError, Result};
use crate::state::PollState;

/// Why [`Poller::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A stop was requested through the [`StopHandle`].
    Stopped,
    /// `max_sweeps` lines were emitted.
    SweepLimit,
}

/// Cooperative stop request shared with signal handlers.
///
/// Checked between sweeps only, so a requested stop never cuts a line short.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Polls a channel table through a pin-access backend.
pub struct Poller<P, D = ThreadSleep> {
    pins: P,
    table: ChannelTable,
    config: PollConfig,
    delay: D,
    state: PollState,
    stop: StopHandle,
    sweeps: u64,
}

impl<P: PinAccess> Poller<P, ThreadSleep> {
    /// Create a poller that sleeps the calling thread between sweeps.
    pub fn new(pins: P, table: ChannelTable, config: PollConfig) -> Self {
        Self::with_delay(pins, table, config, ThreadSleep)
    }
}

impl<P: PinAccess, D: Delay> Poller<P, D> {
    /// Create a poller with an explicit inter-sweep delay.
    pub fn with_delay(pins: P, table: ChannelTable, config: PollConfig, delay: D) -> Self {
        Self {
            pins,
            table,
            config,
            delay,
            state: PollState::Uninitialized,
            stop: StopHandle::new(),
            sweeps: 0,
        }
    }

    /// Use `stop` instead of the poller's own stop handle.
    pub fn with_stop(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that ends [`run`](Self::run) after the current sweep.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn table(&self) -> &ChannelTable {
        &self.table
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Sweeps emitted by `run` so far.
    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    pub fn pins(&self) -> &P {
        &self.pins
    }

    /// Consume the poller and return the backend, releasing nothing early.
    pub fn into_pins(self) -> P {
        self.pins
    }

    /// Set up the backend, then make every channel a pulled-up input in table order.
    ///
    /// Any failure is fatal: the poller moves to `Aborted` and cannot run.
    pub fn initialize(&mut self) -> Result<()> {
        if self.state != PollState::Uninitialized {
            return Err(PollError::InvalidState(self.state));
        }
        self.state = PollState::Initializing;

        if let Err(err) = self.pins.setup() {
            self.state = PollState::Aborted;
            return Err(PollError::Setup(err));
        }

        for channel in self.table.iter() {
            let configured = self
                .pins
                .set_input(channel)
                .and_then(|()| self.pins.enable_pull_up(channel));
            if let Err(err) = configured {
                warn!(%channel, "channel configuration failed");
                self.state = PollState::Aborted;
                return Err(PollError::Configure(err));
            }
            debug!(%channel, "channel configured as pulled-up input");
        }

        self.state = PollState::Running;
        info!(
            backend = self.pins.name(),
            channels = %self.table,
            period_ms = self.config.period.as_millis() as u64,
            "poller initialized"
        );
        Ok(())
    }

    /// Read every channel once, in table order, into `samples`.
    pub fn sweep(&mut self, samples: &mut Vec<Level>) -> Result<()> {
        if self.state != PollState::Running {
            return Err(PollError::InvalidState(self.state));
        }

        samples.clear();
        for channel in self.table.iter() {
            samples.push(self.pins.read(channel).map_err(PollError::Read)?);
        }
        Ok(())
    }

    /// Sweep, emit, and pause until stopped or the sweep limit is reached.
    ///
    /// Initializes first if needed. With the default configuration and no
    /// stop request this only returns on error.
    pub fn run<W: Write>(&mut self, writer: &mut LineWriter<W>) -> Result<RunOutcome> {
        if self.state == PollState::Uninitialized {
            self.initialize()?;
        }
        if self.state != PollState::Running {
            return Err(PollError::InvalidState(self.state));
        }

        let mut samples = Vec::with_capacity(self.table.len());
        loop {
            if let Some(outcome) = self.finished() {
                return Ok(outcome);
            }

            self.sweep(&mut samples)?;
            writer.write_sweep(&samples)?;
            self.sweeps = self.sweeps.saturating_add(1);
            trace!(sweep = self.sweeps, "sweep emitted");

            if let Some(outcome) = self.finished() {
                return Ok(outcome);
            }

            self.delay.pause(self.config.period);
        }
    }

    fn finished(&self) -> Option<RunOutcome> {
        if self.stop.is_stopped() {
            info!(sweeps = self.sweeps, "stop requested");
            return Some(RunOutcome::Stopped);
        }
        match self.config.max_sweeps {
            Some(max) if self.sweeps >= max => Some(RunOutcome::SweepLimit),
            _ => None,
        }
    }
}
