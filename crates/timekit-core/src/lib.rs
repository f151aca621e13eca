//! # Timekit Core Library
//!
//! Core library for the Timekit time widgets. One wall-clock-delta engine
//! backs all of them -- the stopwatch, the Pomodoro timer, the short focus
//! session, and the countdown to a fixed date. The CLI binary is a thin
//! presentation layer over this crate: it owns the redraw poll and all
//! human formatting, while every authoritative duration lives here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a state machine that derives elapsed time from
//!   timestamp deltas at read time; the caller periodically invokes
//!   `tick()` for completion detection, never for timekeeping
//! - **Presets**: the per-widget glue -- Pomodoro phases with a
//!   completed-focus counter, focus-session lengths, and the
//!   hundredth-birthday deadline
//! - **Config**: TOML-based default durations and redraw periods
//! - **Events**: every state change produces a serializable [`Event`]
//!
//! ## Key Components
//!
//! - [`TimeEngine`]: core time-tracking state machine
//! - [`PomodoroSession`]: phase presets over a countdown engine
//! - [`Config`]: application configuration management

pub mod config;
pub mod error;
pub mod events;
pub mod timer;

pub use config::{Config, FocusConfig, PollConfig, PomodoroConfig};
pub use error::ConfigError;
pub use events::Event;
pub use timer::{
    focus_target_ms, hundredth_birthday, EngineMode, Lap, PomodoroPhase, PomodoroSession,
    TimeEngine,
};
