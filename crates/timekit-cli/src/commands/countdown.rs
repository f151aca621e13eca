use std::io::Write;

use chrono::NaiveDate;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};

use timekit_core::{hundredth_birthday, Config, TimeEngine};

use crate::commands::emit;
use crate::format;

#[derive(Args)]
pub struct CountdownArgs {
    /// Birthdate, YYYY-MM-DD
    #[arg(long)]
    birthdate: NaiveDate,
    /// Print a single JSON snapshot and exit
    #[arg(long)]
    once: bool,
}

pub fn run(args: CountdownArgs) -> Result<(), Box<dyn std::error::Error>> {
    // The deadline is an absolute instant; the engine resolves it to a
    // duration target once and comes back already running.
    let engine = TimeEngine::countdown_until(hundredth_birthday(args.birthdate));

    if args.once {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        return Ok(());
    }

    let config = Config::load_or_default();
    let poll_ms = config.poll.countdown_ms.max(1);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch(engine, poll_ms))
}

async fn watch(mut engine: TimeEngine, poll_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("counting down to your 100th birthday -- q quits");

    let mut ticker = interval(Duration::from_millis(poll_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(event) = engine.tick() {
                    emit(Some(event))?;
                    break;
                }
                redraw(&engine)?;
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => stdin_open = false,
                    Some(input) => {
                        if input.trim() == "q" {
                            break;
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    Ok(())
}

fn redraw(engine: &TimeEngine) -> std::io::Result<()> {
    let remaining = engine.remaining_ms().unwrap_or(0);
    let mut out = std::io::stdout();
    write!(out, "\r{}", format::dhms(remaining))?;
    out.flush()
}
