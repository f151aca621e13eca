//! Widget glue layered over the core engine: Pomodoro phases, focus
//! session lengths, and the hundredth-birthday deadline.

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::TimeEngine;
use crate::config::PomodoroConfig;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    pub fn label(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Work",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }

    /// Cycle order used by the phase-switch key.
    pub fn next(&self) -> Self {
        match self {
            PomodoroPhase::Work => PomodoroPhase::ShortBreak,
            PomodoroPhase::ShortBreak => PomodoroPhase::LongBreak,
            PomodoroPhase::LongBreak => PomodoroPhase::Work,
        }
    }
}

/// One Pomodoro sitting: a countdown engine plus the current phase and a
/// completed-focus counter. The counter survives resets and phase switches
/// and dies with the session.
#[derive(Debug, Clone)]
pub struct PomodoroSession {
    engine: TimeEngine,
    phase: PomodoroPhase,
    durations: PomodoroConfig,
    completed_focus: u32,
}

impl PomodoroSession {
    pub fn new(durations: PomodoroConfig) -> Self {
        Self::with_phase(durations, PomodoroPhase::Work)
    }

    pub fn with_phase(durations: PomodoroConfig, phase: PomodoroPhase) -> Self {
        let engine = TimeEngine::countdown(durations.duration_ms(phase));
        Self {
            engine,
            phase,
            durations,
            completed_focus: 0,
        }
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    /// Work phases run to completion within this session.
    pub fn completed_focus(&self) -> u32 {
        self.completed_focus
    }

    pub fn engine(&self) -> &TimeEngine {
        &self.engine
    }

    /// Switch presets. The in-progress run is discarded, not paused: the
    /// engine is reset to Idle with the new phase's target installed.
    pub fn switch(&mut self, phase: PomodoroPhase) -> Event {
        self.phase = phase;
        let target_ms = self.durations.duration_ms(phase);
        self.engine.retarget(target_ms);
        Event::PhaseSwitched {
            phase,
            target_ms,
            at: Utc::now(),
        }
    }

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start();
        self.observe(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.observe(event)
    }

    pub fn reset(&mut self) -> Event {
        self.engine.reset()
    }

    /// Forward the presentation poll to the engine.
    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        self.observe(event)
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.engine.tick_at(now_ms);
        self.observe(event)
    }

    pub fn start_at(&mut self, now_ms: u64) -> Option<Event> {
        let event = self.engine.start_at(now_ms);
        self.observe(event)
    }

    /// Completion can surface from start, pause, or the poll; count it in
    /// one place. Only finished Work phases score.
    fn observe(&mut self, event: Option<Event>) -> Option<Event> {
        if matches!(event, Some(Event::Completed { .. })) && self.phase == PomodoroPhase::Work {
            self.completed_focus += 1;
        }
        event
    }
}

/// Focus-session target from a user-supplied length in seconds.
/// Negative input clamps to zero, which completes immediately on start.
pub fn focus_target_ms(secs: i64) -> u64 {
    secs.max(0) as u64 * 1000
}

/// 100th birthday at midnight UTC: birthdate plus 100 years with month and
/// day preserved. A Feb 29 birthdate lands on Feb 28 when the target year
/// is not a leap year.
pub fn hundredth_birthday(birthdate: NaiveDate) -> DateTime<Utc> {
    birthdate
        .checked_add_months(Months::new(1200))
        .unwrap_or(NaiveDate::MAX)
        .and_time(NaiveTime::MIN)
        .and_utc()
}
