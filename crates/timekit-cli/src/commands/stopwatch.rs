use std::io::Write;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};

use timekit_core::{Config, TimeEngine};

use crate::commands::emit;
use crate::format;

#[derive(Args)]
pub struct StopwatchArgs {
    /// Redraw period in milliseconds (defaults to the configured value)
    #[arg(long)]
    poll_ms: Option<u64>,
}

pub fn run(args: StopwatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let poll_ms = args.poll_ms.unwrap_or(config.poll.stopwatch_ms).max(1);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch(poll_ms))
}

/// The redraw ticker only polls the engine; dropping out of this loop on
/// any path (quit, Ctrl-C) releases it along with the stdin reader.
async fn watch(poll_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = TimeEngine::stopwatch();
    emit(engine.start())?;
    println!("Enter = lap, p = pause, r = resume, x = reset, q = quit");

    let mut ticker = interval(Duration::from_millis(poll_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                redraw(&engine)?;
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => stdin_open = false,
                    Some(input) => match input.trim() {
                        "q" => break,
                        "p" => emit(engine.pause())?,
                        "r" => emit(engine.start())?,
                        "x" => emit(Some(engine.reset()))?,
                        _ => emit(engine.lap())?,
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    // Final state for anything capturing stdout.
    println!();
    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}

fn redraw(engine: &TimeEngine) -> std::io::Result<()> {
    let mut out = std::io::stdout();
    write!(out, "\r{}", format::clock_cs(engine.elapsed_ms()))?;
    out.flush()
}
