use std::collections::BTreeSet;

use pinstream_access::PinAccess;
use serde::Serialize;

use crate::cmd::{open_backend, parse_duration, Backend, DoctorArgs, PinArgs};
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, pins: &PinArgs, format: OutputFormat) -> CliResult<i32> {
    let mut checks = vec![
        channel_table_check(pins),
        period_check(pins),
        effective_user_check(),
        chip_device_check(pins),
    ];
    checks.extend(backend_checks(pins));

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput { checks, overall };
    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("pinstream doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<16} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

fn channel_table_check(pins: &PinArgs) -> CheckResult {
    let table = &pins.channels;
    if table.is_empty() {
        return CheckResult::new(
            "channel_table",
            CheckStatus::Warn,
            "empty table, every line will be blank",
        );
    }

    let unique: BTreeSet<_> = table.iter().collect();
    if unique.len() != table.len() {
        return CheckResult::new(
            "channel_table",
            CheckStatus::Warn,
            format!("duplicate channels in {table}"),
        );
    }

    CheckResult::new(
        "channel_table",
        CheckStatus::Info,
        format!("{} channels: {table}", table.len()),
    )
}

fn period_check(pins: &PinArgs) -> CheckResult {
    match parse_duration(&pins.period) {
        Ok(period) => CheckResult::new("period", CheckStatus::Pass, format!("{period:?}")),
        Err(err) => CheckResult::new("period", CheckStatus::Fail, err.message),
    }
}

fn effective_user_check() -> CheckResult {
    #[cfg(unix)]
    {
        // SAFETY: geteuid has no preconditions and cannot fail.
        let euid = unsafe { libc::geteuid() };
        if euid == 0 {
            CheckResult::new("effective_user", CheckStatus::Info, "running as root")
        } else {
            CheckResult::new(
                "effective_user",
                CheckStatus::Warn,
                format!("uid {euid}; chip access needs root or gpio group membership"),
            )
        }
    }

    #[cfg(not(unix))]
    {
        CheckResult::new(
            "effective_user",
            CheckStatus::Skip,
            "user check not implemented on this platform",
        )
    }
}

fn chip_device_check(pins: &PinArgs) -> CheckResult {
    if pins.backend == Backend::Sim {
        return CheckResult::new("chip_device", CheckStatus::Skip, "simulated backend");
    }

    let path = &pins.chip;
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            return CheckResult::new(
                "chip_device",
                CheckStatus::Fail,
                format!("{}: {err}", path.display()),
            )
        }
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if !metadata.file_type().is_char_device() {
            return CheckResult::new(
                "chip_device",
                CheckStatus::Fail,
                format!("{} is not a character device", path.display()),
            );
        }
    }
    #[cfg(not(unix))]
    let _ = metadata;

    CheckResult::new(
        "chip_device",
        CheckStatus::Pass,
        format!("{} present", path.display()),
    )
}

fn backend_checks(pins: &PinArgs) -> Vec<CheckResult> {
    #[cfg(target_os = "linux")]
    {
        if pins.backend == Backend::Cdev {
            return cdev_checks(pins);
        }
    }

    let mut backend = match open_backend(pins) {
        Ok(backend) => backend,
        Err(err) => {
            return vec![CheckResult::new(
                "backend_setup",
                CheckStatus::Fail,
                err.message,
            )]
        }
    };

    let name = backend.name().to_string();
    match backend.setup() {
        Ok(()) => vec![CheckResult::new(
            "backend_setup",
            CheckStatus::Pass,
            format!("{name} ready"),
        )],
        Err(err) => vec![CheckResult::new(
            "backend_setup",
            CheckStatus::Fail,
            format!("{name}: {err}"),
        )],
    }
}

#[cfg(target_os = "linux")]
fn cdev_checks(pins: &PinArgs) -> Vec<CheckResult> {
    use pinstream_access::CdevPins;

    let mut chip = CdevPins::new(&pins.chip);
    if let Err(err) = chip.setup() {
        return vec![
            CheckResult::new("backend_setup", CheckStatus::Fail, err.to_string()),
            CheckResult::new("channel_range", CheckStatus::Skip, "chip not available"),
        ];
    }

    let lines = chip.num_lines().unwrap_or(0);
    let setup = CheckResult::new(
        "backend_setup",
        CheckStatus::Pass,
        format!("{} opened, {lines} lines", pins.chip.display()),
    );

    let out_of_range: Vec<String> = pins
        .channels
        .iter()
        .filter(|channel| channel.id() >= lines)
        .map(|channel| channel.to_string())
        .collect();
    let range = if out_of_range.is_empty() {
        CheckResult::new(
            "channel_range",
            CheckStatus::Pass,
            format!("all channels below {lines}"),
        )
    } else {
        CheckResult::new(
            "channel_range",
            CheckStatus::Fail,
            format!("not on chip: {}", out_of_range.join(",")),
        )
    };

    vec![setup, range]
}
