use std::io::Write;

use clap::{Args, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Duration};

use timekit_core::{Config, Event, PomodoroPhase, PomodoroSession};

use crate::commands::emit;
use crate::format;

#[derive(Args)]
pub struct PomodoroArgs {
    /// Starting phase
    #[arg(long, value_enum, default_value = "work")]
    phase: PhaseArg,
    /// Override the starting phase's length in minutes (negative clamps to zero)
    #[arg(long, allow_hyphen_values = true)]
    minutes: Option<i64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PhaseArg {
    Work,
    Short,
    Long,
}

impl From<PhaseArg> for PomodoroPhase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Work => PomodoroPhase::Work,
            PhaseArg::Short => PomodoroPhase::ShortBreak,
            PhaseArg::Long => PomodoroPhase::LongBreak,
        }
    }
}

pub fn run(args: PomodoroArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let phase = PomodoroPhase::from(args.phase);
    let mut durations = config.pomodoro.clone();
    if let Some(minutes) = args.minutes {
        match phase {
            PomodoroPhase::Work => durations.work_min = minutes,
            PomodoroPhase::ShortBreak => durations.short_break_min = minutes,
            PomodoroPhase::LongBreak => durations.long_break_min = minutes,
        }
    }
    let poll_ms = config.poll.countdown_ms.max(1);
    let session = PomodoroSession::with_phase(durations, phase);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch(session, poll_ms))
}

async fn watch(
    mut session: PomodoroSession,
    poll_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let started = session.start();
    let done = matches!(started, Some(Event::Completed { .. }));
    emit(started)?;
    if done {
        return finish(&session);
    }
    println!("p = pause, r = resume, s = switch phase, x = reset, q = quit");

    let mut ticker = interval(Duration::from_millis(poll_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let event = session.tick();
                if matches!(event, Some(Event::Completed { .. })) {
                    emit(event)?;
                    break;
                }
                redraw(&session)?;
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    None => stdin_open = false,
                    Some(input) => match input.trim() {
                        "q" => break,
                        "p" => {
                            // Pausing at or past the target completes instead.
                            let event = session.pause();
                            let done = matches!(event, Some(Event::Completed { .. }));
                            emit(event)?;
                            if done {
                                break;
                            }
                        }
                        "r" => {
                            let event = session.start();
                            let done = matches!(event, Some(Event::Completed { .. }));
                            emit(event)?;
                            if done {
                                break;
                            }
                        }
                        "s" => emit(Some(session.switch(session.phase().next())))?,
                        "x" => emit(Some(session.reset()))?,
                        _ => {}
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    finish(&session)
}

fn finish(session: &PomodoroSession) -> Result<(), Box<dyn std::error::Error>> {
    println!("completed focus sessions: {}", session.completed_focus());
    Ok(())
}

fn redraw(session: &PomodoroSession) -> std::io::Result<()> {
    let remaining = session.engine().remaining_ms().unwrap_or(0);
    let mut out = std::io::stdout();
    write!(
        out,
        "\r{} {} remaining",
        session.phase().label(),
        format::clock(remaining)
    )?;
    out.flush()
}
