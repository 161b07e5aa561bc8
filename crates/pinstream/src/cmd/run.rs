use pinstream_line::LineWriter;
use pinstream_poll::{PollConfig, Poller, StopHandle};
use tracing::info;

use crate::cmd::{open_backend, parse_duration, PinArgs, RunArgs};
use crate::exit::{poll_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: RunArgs, pins: &PinArgs) -> CliResult<i32> {
    let config = PollConfig {
        period: parse_duration(&pins.period)?,
        max_sweeps: args.sweeps,
    };
    let backend = open_backend(pins)?;

    let mut poller = Poller::new(backend, pins.channels.clone(), config);
    install_stop_handler(poller.stop_handle())?;

    let stdout = std::io::stdout();
    let mut writer = LineWriter::new(stdout.lock());
    let outcome = poller
        .run(&mut writer)
        .map_err(|err| poll_error("poll failed", err))?;

    info!(
        ?outcome,
        sweeps = poller.sweeps(),
        "poller finished, releasing pins"
    );
    drop(poller.into_pins());
    Ok(SUCCESS)
}

fn install_stop_handler(stop: StopHandle) -> CliResult<()> {
    ctrlc::set_handler(move || stop.stop()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })
}
