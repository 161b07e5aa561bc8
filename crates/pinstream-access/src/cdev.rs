use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gpiocdev::chip::Chip;
use gpiocdev::line::{Bias, Value};
use gpiocdev::Request;
use tracing::{debug, info};

use crate::error::{AccessError, Result};
use crate::traits::{Channel, Level, PinAccess};

/// Default GPIO character device.
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";

/// Consumer label attached to every requested line.
const CONSUMER: &str = "pinstream";

/// Linux GPIO character-device backend.
///
/// Each channel is a line offset on one chip. Every configured channel holds
/// its own line request; requests are released when the backend is dropped.
pub struct CdevPins {
    path: PathBuf,
    num_lines: Option<u32>,
    lines: BTreeMap<Channel, Request>,
}

impl CdevPins {
    /// Create a backend for the chip at `path`. Nothing is opened until `setup()`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            num_lines: None,
            lines: BTreeMap::new(),
        }
    }

    /// The chip device path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of lines on the chip, once set up.
    pub fn num_lines(&self) -> Option<u32> {
        self.num_lines
    }

    fn check_range(&self, channel: Channel) -> Result<()> {
        let lines = self.num_lines.ok_or(AccessError::NotInitialized)?;
        if channel.id() >= lines {
            return Err(AccessError::ChannelOutOfRange { channel, lines });
        }
        Ok(())
    }

    fn request_input(&self, channel: Channel, pull_up: bool) -> Result<Request> {
        let result = if pull_up {
            Request::builder()
                .on_chip(&self.path)
                .with_consumer(CONSUMER)
                .with_line(channel.id())
                .as_input()
                .with_bias(Bias::PullUp)
                .request()
        } else {
            Request::builder()
                .on_chip(&self.path)
                .with_consumer(CONSUMER)
                .with_line(channel.id())
                .as_input()
                .request()
        };

        result.map_err(|err| AccessError::Configure {
            channel,
            source: Box::new(err),
        })
    }
}

impl Default for CdevPins {
    fn default() -> Self {
        Self::new(DEFAULT_CHIP)
    }
}

impl PinAccess for CdevPins {
    fn name(&self) -> &str {
        "cdev"
    }

    fn setup(&mut self) -> Result<()> {
        let target = self.path.display().to_string();
        let chip = Chip::from_path(&self.path).map_err(|err| AccessError::Setup {
            target: target.clone(),
            source: Box::new(err),
        })?;
        let chip_info = chip.info().map_err(|err| AccessError::Setup {
            target: target.clone(),
            source: Box::new(err),
        })?;

        info!(
            chip = %target,
            name = %chip_info.name,
            label = %chip_info.label,
            lines = chip_info.num_lines,
            "gpio chip opened"
        );
        self.num_lines = Some(chip_info.num_lines);
        Ok(())
    }

    fn set_input(&mut self, channel: Channel) -> Result<()> {
        self.check_range(channel)?;
        // Release any earlier request so the line is not busy.
        self.lines.remove(&channel);
        let request = self.request_input(channel, false)?;
        debug!(%channel, "line requested as input");
        self.lines.insert(channel, request);
        Ok(())
    }

    fn enable_pull_up(&mut self, channel: Channel) -> Result<()> {
        self.check_range(channel)?;
        if self.lines.remove(&channel).is_none() {
            return Err(AccessError::NotConfigured(channel));
        }
        let request = self.request_input(channel, true)?;
        debug!(%channel, "pull-up bias enabled");
        self.lines.insert(channel, request);
        Ok(())
    }

    fn read(&mut self, channel: Channel) -> Result<Level> {
        let request = self
            .lines
            .get(&channel)
            .ok_or(AccessError::NotConfigured(channel))?;
        let value = request
            .value(channel.id())
            .map_err(|err| AccessError::Read {
                channel,
                source: Box::new(err),
            })?;
        Ok(Level::from(matches!(value, Value::Active)))
    }
}

impl std::fmt::Debug for CdevPins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdevPins")
            .field("path", &self.path)
            .field("num_lines", &self.num_lines)
            .field("configured", &self.lines.len())
            .finish()
    }
}
