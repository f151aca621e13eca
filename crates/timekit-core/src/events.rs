use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{EngineMode, Lap, PomodoroPhase};

/// Every state change in the engine produces an Event.
/// The CLI prints them as JSON; `Completed` doubles as the edge-triggered
/// completion signal for countdown engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Started {
        target_ms: Option<u64>,
        at: DateTime<Utc>,
    },
    Resumed {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    Paused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    Reset {
        at: DateTime<Utc>,
    },
    LapRecorded {
        ordinal: u32,
        captured_ms: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time hit zero; emitted exactly once per run.
    Completed {
        target_ms: u64,
        at: DateTime<Utc>,
    },
    /// A new countdown target was installed, discarding the previous run.
    Retargeted {
        target_ms: u64,
        at: DateTime<Utc>,
    },
    PhaseSwitched {
        phase: PomodoroPhase,
        target_ms: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: EngineMode,
        elapsed_ms: u64,
        remaining_ms: Option<u64>,
        target_ms: Option<u64>,
        laps: Vec<Lap>,
        at: DateTime<Utc>,
    },
}
