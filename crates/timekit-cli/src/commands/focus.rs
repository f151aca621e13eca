use std::io::Write;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};

use timekit_core::{focus_target_ms, Config, Event, TimeEngine};

use crate::commands::emit;
use crate::format;

#[derive(Args)]
pub struct FocusArgs {
    /// Session length in seconds; the widget offers 30 or 60.
    /// Negative values clamp to zero.
    #[arg(long, allow_hyphen_values = true)]
    secs: Option<i64>,
}

pub fn run(args: FocusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let secs = args.secs.unwrap_or(config.focus.default_secs);
    let engine = TimeEngine::countdown(focus_target_ms(secs));
    let poll_ms = config.poll.countdown_ms.max(1);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch(engine, poll_ms))
}

async fn watch(mut engine: TimeEngine, poll_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let started = engine.start();
    let done = matches!(started, Some(Event::Completed { .. }));
    emit(started)?;
    if done {
        return Ok(());
    }
    println!("look at the dot & breathe -- q gives up early");

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
    write!(out, "\r{}", format::clock(remaining))?;
    out.flush()
}
