use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use crate::error::{AccessError, BoxError, Result};
use crate::traits::{Channel, Level, PinAccess};

/// One primitive call recorded by [`SimulatedPins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOp {
    Setup,
    SetInput(Channel),
    EnablePullUp(Channel),
    Read(Channel),
}

/// In-memory pin backend.
///
/// Inputs without pull-up float low; pulled-up inputs read high unless a
/// level is driven onto them. Scripted levels are consumed one per read
/// before falling back to the steady level.
#[derive(Debug, Default)]
pub struct SimulatedPins {
    initialized: bool,
    fail_setup: bool,
    fail_configure: BTreeSet<Channel>,
    inputs: BTreeSet<Channel>,
    pulled_up: BTreeSet<Channel>,
    driven: BTreeMap<Channel, Level>,
    scripts: BTreeMap<Channel, VecDeque<Level>>,
    journal: Vec<PinOp>,
}

impl SimulatedPins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `setup()` fail, as when the subsystem is unavailable.
    pub fn failing_setup() -> Self {
        Self {
            fail_setup: true,
            ..Self::default()
        }
    }

    /// Make configuration of `channel` fail.
    pub fn fail_configure(&mut self, channel: u32) -> &mut Self {
        self.fail_configure.insert(Channel(channel));
        self
    }

    /// Drive `channel` to a fixed level.
    pub fn drive(&mut self, channel: u32, level: Level) -> &mut Self {
        self.driven.insert(Channel(channel), level);
        self
    }

    /// Queue levels returned by successive reads of `channel`.
    pub fn script(&mut self, channel: u32, levels: impl IntoIterator<Item = Level>) -> &mut Self {
        self.scripts
            .entry(Channel(channel))
            .or_default()
            .extend(levels);
        self
    }

    /// Every primitive call made so far, in order.
    pub fn journal(&self) -> &[PinOp] {
        &self.journal
    }

    /// Channels read so far, in order.
    pub fn reads(&self) -> Vec<Channel> {
        self.journal
            .iter()
            .filter_map(|op| match op {
                PinOp::Read(channel) => Some(*channel),
                _ => None,
            })
            .collect()
    }

    pub fn is_pulled_up(&self, channel: Channel) -> bool {
        self.pulled_up.contains(&channel)
    }

    fn configure_check(&self, channel: Channel) -> Result<()> {
        if !self.initialized {
            return Err(AccessError::NotInitialized);
        }
        if self.fail_configure.contains(&channel) {
            let source: BoxError = "simulated configuration failure".into();
            return Err(AccessError::Configure { channel, source });
        }
        Ok(())
    }
}

impl PinAccess for SimulatedPins {
    fn name(&self) -> &str {
        "sim"
    }

    fn setup(&mut self) -> Result<()> {
        self.journal.push(PinOp::Setup);
        if self.fail_setup {
            return Err(AccessError::Setup {
                target: "simulated pins".to_string(),
                source: "simulated subsystem unavailable".into(),
            });
        }
        self.initialized = true;
        Ok(())
    }

    fn set_input(&mut self, channel: Channel) -> Result<()> {
        self.journal.push(PinOp::SetInput(channel));
        self.configure_check(channel)?;
        self.inputs.insert(channel);
        debug!(%channel, "simulated input configured");
        Ok(())
    }

    fn enable_pull_up(&mut self, channel: Channel) -> Result<()> {
        self.journal.push(PinOp::EnablePullUp(channel));
        self.configure_check(channel)?;
        if !self.inputs.contains(&channel) {
            return Err(AccessError::NotConfigured(channel));
        }
        self.pulled_up.insert(channel);
        Ok(())
    }

    fn read(&mut self, channel: Channel) -> Result<Level> {
        self.journal.push(PinOp::Read(channel));
        if !self.inputs.contains(&channel) {
            return Err(AccessError::NotConfigured(channel));
        }
        if let Some(level) = self.scripts.get_mut(&channel).and_then(VecDeque::pop_front) {
            return Ok(level);
        }
        if let Some(level) = self.driven.get(&channel) {
            return Ok(*level);
        }
        Ok(Level::from(self.pulled_up.contains(&channel)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(channel: u32) -> SimulatedPins {
        let mut pins = SimulatedPins::new();
        pins.setup().unwrap();
        pins.set_input(Channel(channel)).unwrap();
        pins
    }

    #[test]
    fn floating_input_reads_low_until_pulled_up() {
        let mut pins = configured(3);
        assert_eq!(pins.read(Channel(3)).unwrap(), Level::Low);

        pins.enable_pull_up(Channel(3)).unwrap();
        assert!(pins.is_pulled_up(Channel(3)));
        assert_eq!(pins.read(Channel(3)).unwrap(), Level::High);
    }

    #[test]
    fn driven_level_overrides_pull_up() {
        let mut pins = configured(7);
        pins.enable_pull_up(Channel(7)).unwrap();
        pins.drive(7, Level::Low);
        assert_eq!(pins.read(Channel(7)).unwrap(), Level::Low);
    }

    #[test]
    fn script_is_consumed_before_steady_level() {
        let mut pins = configured(2);
        pins.drive(2, Level::High)
            .script(2, [Level::Low, Level::Low]);

        assert_eq!(pins.read(Channel(2)).unwrap(), Level::Low);
        assert_eq!(pins.read(Channel(2)).unwrap(), Level::Low);
        assert_eq!(pins.read(Channel(2)).unwrap(), Level::High);
    }

    #[test]
    fn setup_failure_is_reported() {
        let mut pins = SimulatedPins::failing_setup();
        assert!(matches!(pins.setup(), Err(AccessError::Setup { .. })));
        assert!(matches!(
            pins.set_input(Channel(0)),
            Err(AccessError::NotInitialized)
        ));
    }

    #[test]
    fn configure_failure_is_per_channel() {
        let mut pins = SimulatedPins::new();
        pins.fail_configure(12);
        pins.setup().unwrap();

        assert!(pins.set_input(Channel(0)).is_ok());
        assert!(matches!(
            pins.set_input(Channel(12)),
            Err(AccessError::Configure { channel: Channel(12), .. })
        ));
    }

    #[test]
    fn pull_up_requires_input() {
        let mut pins = SimulatedPins::new();
        pins.setup().unwrap();
        assert!(matches!(
            pins.enable_pull_up(Channel(5)),
            Err(AccessError::NotConfigured(Channel(5)))
        ));
    }

    #[test]
    fn journal_records_calls_in_order() {
        let mut pins = configured(0);
        pins.enable_pull_up(Channel(0)).unwrap();
        pins.read(Channel(0)).unwrap();

        assert_eq!(
            pins.journal(),
            &[
                PinOp::Setup,
                PinOp::SetInput(Channel(0)),
                PinOp::EnablePullUp(Channel(0)),
                PinOp::Read(Channel(0)),
            ]
        );
        assert_eq!(pins.reads(), vec![Channel(0)]);
    }
}
