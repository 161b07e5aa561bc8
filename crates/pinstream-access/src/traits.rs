use std::fmt;

use crate::error::Result;

/// An opaque pin identifier naming one physical GPIO line.
///
/// On the character-device backend this is the line offset on the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Channel(pub u32);

impl Channel {
    /// The raw identifier.
    pub fn id(self) -> u32 {
        self.0
    }
}

impl From<u32> for Channel {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The logic level observed by one read of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// ASCII digit for this level on the wire: `b'0'` or `b'1'`.
    pub fn digit(self) -> u8 {
        match self {
            Level::Low => b'0',
            Level::High => b'1',
        }
    }

    /// Parse a single wire digit.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(Level::Low),
            b'1' => Some(Level::High),
            _ => None,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Level::High)
    }
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit() as char)
    }
}

/// Primitive pin operations provided by the platform.
///
/// `setup` is called exactly once before any other primitive. Implementations
/// hold the subsystem handle for as long as they live; dropping the value
/// releases it.
pub trait PinAccess {
    /// Short backend name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Acquire the pin-access subsystem.
    fn setup(&mut self) -> Result<()>;

    /// Configure `channel` as a digital input.
    fn set_input(&mut self, channel: Channel) -> Result<()>;

    /// Enable the internal pull-up resistor on an input `channel`.
    fn enable_pull_up(&mut self, channel: Channel) -> Result<()>;

    /// Read the current level of `channel`.
    fn read(&mut self, channel: Channel) -> Result<Level>;
}

impl<P: PinAccess + ?Sized> PinAccess for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn setup(&mut self) -> Result<()> {
        (**self).setup()
    }

    fn set_input(&mut self, channel: Channel) -> Result<()> {
        (**self).set_input(channel)
    }

    fn enable_pull_up(&mut self, channel: Channel) -> Result<()> {
        (**self).enable_pull_up(channel)
    }

    fn read(&mut self, channel: Channel) -> Result<Level> {
        (**self).read(channel)
    }
}
