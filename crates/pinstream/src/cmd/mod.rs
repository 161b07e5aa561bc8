use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use pinstream_access::{Level, PinAccess, SimulatedPins};
use pinstream_line::ChannelTable;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod channels;
pub mod doctor;
pub mod run;
pub mod version;

/// GPIO chip opened when `--chip` is not given.
pub const DEFAULT_CHIP_PATH: &str = "/dev/gpiochip0";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stream channel levels to stdout (default).
    Run(RunArgs),
    /// Show which channel each output column reports.
    Channels(ChannelsArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, pins: &PinArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, pins),
        Command::Channels(args) => channels::run(args, pins, format),
        Command::Doctor(args) => doctor::run(args, pins, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Linux GPIO character device.
    Cdev,
    /// In-memory simulated pins.
    Sim,
}

/// Pin selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct PinArgs {
    /// GPIO chip device.
    #[arg(
        long,
        value_name = "PATH",
        env = "PINSTREAM_CHIP",
        default_value = DEFAULT_CHIP_PATH,
        global = true
    )]
    pub chip: PathBuf,

    /// Channels to report, in column order (comma-separated line offsets).
    #[arg(
        long,
        value_name = "LIST",
        env = "PINSTREAM_CHANNELS",
        default_value = "0,2,3,7,12,13,14,15,16",
        global = true
    )]
    pub channels: ChannelTable,

    /// Pause between sweeps (e.g. 100ms, 1s).
    #[arg(
        long,
        value_name = "DURATION",
        env = "PINSTREAM_PERIOD",
        default_value = "100ms",
        global = true
    )]
    pub period: String,

    /// Pin-access backend.
    #[arg(long, value_name = "BACKEND", default_value = "cdev", global = true)]
    pub backend: Backend,

    /// Channels the simulated backend drives low (comma-separated).
    #[arg(long, value_name = "LIST", value_delimiter = ',', global = true)]
    pub sim_low: Vec<u32>,

    /// Make the simulated backend fail setup.
    #[arg(long, global = true)]
    pub sim_fail_setup: bool,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Exit after N sweeps. Default: run until terminated.
    #[arg(long, value_name = "N")]
    pub sweeps: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub struct ChannelsArgs {}

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Build the selected backend. Nothing is opened until the poller sets it up.
pub fn open_backend(pins: &PinArgs) -> CliResult<Box<dyn PinAccess>> {
    match pins.backend {
        Backend::Sim => Ok(Box::new(simulated(pins))),
        Backend::Cdev => cdev_backend(pins),
    }
}

fn simulated(pins: &PinArgs) -> SimulatedPins {
    let mut sim = if pins.sim_fail_setup {
        SimulatedPins::failing_setup()
    } else {
        SimulatedPins::new()
    };
    for channel in &pins.sim_low {
        sim.drive(*channel, Level::Low);
    }
    sim
}

#[cfg(target_os = "linux")]
fn cdev_backend(pins: &PinArgs) -> CliResult<Box<dyn PinAccess>> {
    Ok(Box::new(pinstream_access::CdevPins::new(&pins.chip)))
}

#[cfg(not(target_os = "linux"))]
fn cdev_backend(_pins: &PinArgs) -> CliResult<Box<dyn PinAccess>> {
    Err(CliError::new(
        USAGE,
        "cdev backend requires Linux (use --backend sim)",
    ))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("100ms").unwrap(), Duration::from_millis(100));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert_eq!(parse_duration("0ms").unwrap_err().code, USAGE);
        assert!(parse_duration("").is_err());
        assert!(parse_duration("fast").is_err());
    }
}
