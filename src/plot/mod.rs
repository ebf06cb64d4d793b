//! Renders a tracker as a terminal chart by piping a small script into a
//! gnuplot subprocess. Script construction is kept separate from process
//! handling so it can be tested without gnuplot installed.

use std::{env, process::Stdio};

use anyhow::{bail, Context, Result};
use tokio::{io::AsyncWriteExt, process::Command};

use crate::{storage::entities::RecordEntity, utils::time::format_day};

const DEFAULT_WIDTH: u32 = 80;
const DEFAULT_HEIGHT: u32 = 25;

/// Padding factors keeping the impulses off the chart frame.
const Y_RANGE_LOWER: f64 = 0.75;
const Y_RANGE_UPPER: f64 = 1.1;

/// Builds the gnuplot script for a time-ordered record set. Data points are
/// inlined into the script, so the whole plot is a single stdin write.
pub fn build_script(title: &str, records: &[RecordEntity], width: u32, height: u32) -> Result<String> {
    let Some(first) = records.first() else {
        bail!("Nothing to plot for '{title}'");
    };

    let mut min = first.value;
    let mut max = first.value;
    for record in &records[1..] {
        if record.value < min {
            min = record.value;
        }
        if record.value > max {
            max = record.value;
        }
    }

    let mut script = String::new();
    script.push_str(&format!("set terminal dumb size {width} {height}\n"));
    script.push_str(&format!("set title \"{}\"\n", title.replace('"', "\\\"")));
    script.push_str("set xdata time\n");
    script.push_str("set timefmt \"%Y-%m-%d\"\n");
    script.push_str("set format x \"%Y-%m-%d\"\n");
    script.push_str(&format!(
        "set yrange [{}:{}]\n",
        min * Y_RANGE_LOWER,
        max * Y_RANGE_UPPER
    ));
    script.push_str("plot '-' using 1:2 with impulses notitle\n");
    for record in records {
        script.push_str(&format!("{} {}\n", format_day(record.day), record.value));
    }
    script.push_str("e\n");
    script.push_str("exit\n");
    Ok(script)
}

fn terminal_size() -> (u32, u32) {
    let width = env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WIDTH);
    let height = env::var("LINES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_HEIGHT);
    (width, height)
}

/// Pipes the script for `records` into a gnuplot process and waits for it to
/// draw. The records must already be in date order.
pub async fn render(title: &str, records: &[RecordEntity]) -> Result<()> {
    let (width, height) = terminal_size();
    let script = build_script(title, records, width, height)?;

    let mut child = Command::new("gnuplot")
        .stdin(Stdio::piped())
        .spawn()
        .context("Couldn't start gnuplot. Is it installed?")?;

    // gnuplot only draws once the full script has arrived.
    let mut stdin = child.stdin.take().expect("stdin was requested as piped");
    stdin.write_all(script.as_bytes()).await?;
    stdin.flush().await?;
    drop(stdin);

    let status = child.wait().await?;
    if !status.success() {
        bail!("gnuplot exited with {status}");
    }
    Ok(())
}
