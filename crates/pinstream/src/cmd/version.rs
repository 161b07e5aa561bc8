use pinstream_line::DEFAULT_CHANNELS;
use pinstream_poll::DEFAULT_PERIOD;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("pinstream {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: pinstream");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("PINSTREAM_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!(
        "backends: cdev={}, sim=true",
        cfg!(target_os = "linux")
    );
    let channels: Vec<String> = DEFAULT_CHANNELS.iter().map(u32::to_string).collect();
    println!("default_channels: {}", channels.join(","));
    println!("default_period_ms: {}", DEFAULT_PERIOD.as_millis());

    Ok(SUCCESS)
}
