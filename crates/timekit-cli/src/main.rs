use clap::{Parser, Subcommand};

mod commands;
mod format;

#[derive(Parser)]
#[command(name = "timekit-cli", version, about = "Timekit time widgets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stopwatch with lap capture
    Stopwatch(commands::stopwatch::StopwatchArgs),
    /// Pomodoro phase timer
    Pomodoro(commands::pomodoro::PomodoroArgs),
    /// Short focus session
    Focus(commands::focus::FocusArgs),
    /// Countdown to a 100th birthday
    Countdown(commands::countdown::CountdownArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Stopwatch(args) => commands::stopwatch::run(args),
        Commands::Pomodoro(args) => commands::pomodoro::run(args),
        Commands::Focus(args) => commands::focus::run(args),
        Commands::Countdown(args) => commands::countdown::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
