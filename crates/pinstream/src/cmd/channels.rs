use serde::Serialize;

use crate::cmd::{ChannelsArgs, PinArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct Column {
    column: usize,
    channel: u32,
}

#[derive(Debug, Serialize)]
struct ChannelsOutput {
    count: usize,
    columns: Vec<Column>,
}

pub fn run(_args: ChannelsArgs, pins: &PinArgs, format: OutputFormat) -> CliResult<i32> {
    let output = ChannelsOutput {
        count: pins.channels.len(),
        columns: pins
            .channels
            .iter()
            .enumerate()
            .map(|(column, channel)| Column {
                column,
                channel: channel.id(),
            })
            .collect(),
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => {
            let mut table = new_table(&["COLUMN", "CHANNEL"]);
            for entry in &output.columns {
                table.add_row(vec![entry.column.to_string(), entry.channel.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in &output.columns {
                println!("column {} <- channel {}", entry.column, entry.channel);
            }
        }
        OutputFormat::Raw => println!("{}", pins.channels),
    }

    Ok(SUCCESS)
}
