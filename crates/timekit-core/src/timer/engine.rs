//! Time-tracking engine.
//!
//! The engine is a wall-clock-delta state machine. Elapsed time is always
//! re-derived at read time from a frozen accumulator plus the time since the
//! last transition into Running -- never from counting scheduler ticks, so
//! late, skipped, or batched redraw callbacks cannot make the displayed time
//! drift. It has no internal thread; the caller polls `tick()` for
//! completion detection and redraws.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!         Running -> Completed   (countdown engines only)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimeEngine::countdown(5 * 60 * 1000);
//! engine.start();
//! // In a redraw loop:
//! engine.tick(); // Returns Some(Event::Completed) exactly once
//! let left = engine.remaining_ms();
//! ```

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    Idle,
    Running,
    Paused,
    /// Terminal state for countdown engines whose remaining time hit zero.
    Completed,
}

/// Immutable elapsed-time snapshot captured on demand while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    /// 1-based capture order.
    pub ordinal: u32,
    pub captured_ms: u64,
}

/// Core time-tracking engine backing every widget.
///
/// Without a target it is a stopwatch; with one it counts down and
/// terminates in `Completed`. All timestamps are milliseconds on the
/// engine's own monotonic clock, so system clock adjustments do not
/// affect it.
#[derive(Debug, Clone)]
pub struct TimeEngine {
    /// Monotonic anchor captured at construction.
    epoch: Instant,
    mode: EngineMode,
    accumulated_ms: u64,
    /// Set on the most recent transition into Running.
    started_at_ms: Option<u64>,
    laps: Vec<Lap>,
    target_ms: Option<u64>,
}

impl TimeEngine {
    /// Open-ended engine: elapsed time only, never completes.
    pub fn stopwatch() -> Self {
        Self::with_target(None)
    }

    /// Engine bounded by a fixed duration target.
    ///
    /// A zero target reports `Completed` on the first `start()`.
    pub fn countdown(target_ms: u64) -> Self {
        Self::with_target(Some(target_ms))
    }

    /// Countdown to an absolute instant.
    ///
    /// The deadline is resolved to a duration target once, here; a deadline
    /// already in the past yields a zero target. The engine comes back
    /// already running, matching the countdown-style widgets that begin
    /// ticking as soon as they open.
    pub fn countdown_until(deadline: DateTime<Utc>) -> Self {
        let left = (deadline - Utc::now()).num_milliseconds().max(0) as u64;
        let mut engine = Self::countdown(left);
        let _ = engine.start();
        engine
    }

    fn with_target(target_ms: Option<u64>) -> Self {
        Self {
            epoch: Instant::now(),
            mode: EngineMode::Idle,
            accumulated_ms: 0,
            started_at_ms: None,
            laps: Vec::new(),
            target_ms,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current mode. A running countdown whose target has already passed
    /// reports `Completed` even before the next `tick()` normalizes it.
    pub fn mode(&self) -> EngineMode {
        self.mode_at(self.now_ms())
    }

    pub fn mode_at(&self, now_ms: u64) -> EngineMode {
        if self.mode == EngineMode::Running && self.target_reached(now_ms) {
            EngineMode::Completed
        } else {
            self.mode
        }
    }

    /// Total elapsed milliseconds: the frozen accumulator, plus the live
    /// delta since the last resume when running.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_at(self.now_ms())
    }

    pub fn elapsed_at(&self, now_ms: u64) -> u64 {
        match self.started_at_ms {
            Some(started) if self.mode == EngineMode::Running => {
                self.accumulated_ms + now_ms.saturating_sub(started)
            }
            _ => self.accumulated_ms,
        }
    }

    /// Remaining milliseconds for countdown engines, `None` for stopwatches.
    /// Never goes below zero.
    pub fn remaining_ms(&self) -> Option<u64> {
        self.remaining_at(self.now_ms())
    }

    pub fn remaining_at(&self, now_ms: u64) -> Option<u64> {
        self.target_ms
            .map(|target| target.saturating_sub(self.elapsed_at(now_ms)))
    }

    /// Lap records in capture order.
    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn target_ms(&self) -> Option<u64> {
        self.target_ms
    }

    fn target_reached(&self, now_ms: u64) -> bool {
        matches!(self.target_ms, Some(target) if self.elapsed_at(now_ms) >= target)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        self.snapshot_at(self.now_ms())
    }

    pub fn snapshot_at(&self, now_ms: u64) -> Event {
        Event::StateSnapshot {
            mode: self.mode_at(now_ms),
            elapsed_ms: self.elapsed_at(now_ms),
            remaining_ms: self.remaining_at(now_ms),
            target_ms: self.target_ms,
            laps: self.laps.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────
    //
    // Each command has an explicit-timestamp twin so tests can drive
    // simulated time. The no-argument form reads the engine's own clock.
    // Invalid transitions return None rather than an error: the
    // presentation layer cannot prevent rapid double-invocation.

    /// Begin or resume accumulating. No-op if already running or completed.
    pub fn start(&mut self) -> Option<Event> {
        let now_ms = self.now_ms();
        self.start_at(now_ms)
    }

    pub fn start_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.mode {
            EngineMode::Idle | EngineMode::Paused => {
                // A zero (or already-consumed) target completes on the
                // spot instead of starting a run.
                if matches!(self.target_ms, Some(target) if self.accumulated_ms >= target) {
                    return Some(self.complete());
                }
                let resumed = self.mode == EngineMode::Paused;
                self.started_at_ms = Some(now_ms);
                self.mode = EngineMode::Running;
                Some(if resumed {
                    Event::Resumed {
                        elapsed_ms: self.accumulated_ms,
                        at: Utc::now(),
                    }
                } else {
                    Event::Started {
                        target_ms: self.target_ms,
                        at: Utc::now(),
                    }
                })
            }
            EngineMode::Running | EngineMode::Completed => None,
        }
    }

    /// Freeze the accumulator. No-op unless running.
    pub fn pause(&mut self) -> Option<Event> {
        let now_ms = self.now_ms();
        self.pause_at(now_ms)
    }

    pub fn pause_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.mode != EngineMode::Running {
            return None;
        }
        if self.target_reached(now_ms) {
            return Some(self.complete());
        }
        self.accumulated_ms = self.elapsed_at(now_ms);
        self.started_at_ms = None;
        self.mode = EngineMode::Paused;
        Some(Event::Paused {
            elapsed_ms: self.accumulated_ms,
            at: Utc::now(),
        })
    }

    /// Record an elapsed-time snapshot without interrupting the run.
    /// No-op unless running.
    pub fn lap(&mut self) -> Option<Event> {
        let now_ms = self.now_ms();
        self.lap_at(now_ms)
    }

    pub fn lap_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.mode != EngineMode::Running || self.target_reached(now_ms) {
            return None;
        }
        let lap = Lap {
            ordinal: self.laps.len() as u32 + 1,
            captured_ms: self.elapsed_at(now_ms),
        };
        self.laps.push(lap);
        Some(Event::LapRecorded {
            ordinal: lap.ordinal,
            captured_ms: lap.captured_ms,
            at: Utc::now(),
        })
    }

    /// Return to a fresh Idle state: zero accumulator, no laps. The target
    /// is retained. Valid from any state.
    pub fn reset(&mut self) -> Event {
        self.accumulated_ms = 0;
        self.started_at_ms = None;
        self.laps.clear();
        self.mode = EngineMode::Idle;
        Event::Reset { at: Utc::now() }
    }

    /// Install a new countdown target. Always discards the in-progress
    /// run: the engine is reset to Idle first, never paused.
    pub fn retarget(&mut self, target_ms: u64) -> Event {
        self.reset();
        self.target_ms = Some(target_ms);
        Event::Retargeted {
            target_ms,
            at: Utc::now(),
        }
    }

    /// The mutating poll. For a running countdown whose remaining time has
    /// hit zero this performs the terminal transition and returns the
    /// Completed event exactly once; every other call returns None.
    ///
    /// Skipped or batched polls never cause drift -- elapsed time is
    /// re-derived from timestamps, so the poll may be cancelled and
    /// restarted freely.
    pub fn tick(&mut self) -> Option<Event> {
        let now_ms = self.now_ms();
        self.tick_at(now_ms)
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.mode == EngineMode::Running && self.target_reached(now_ms) {
            return Some(self.complete());
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Terminal transition. Clamps the accumulator to the target so the
    /// elapsed/remaining pair freezes at exactly (target, 0).
    fn complete(&mut self) -> Event {
        if let Some(target) = self.target_ms {
            self.accumulated_ms = target;
        }
        self.started_at_ms = None;
        self.mode = EngineMode::Completed;
        Event::Completed {
            target_ms: self.target_ms.unwrap_or(0),
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn stopwatch_accumulates_across_pause_resume() {
        let mut sw = TimeEngine::stopwatch();
        assert_eq!(sw.mode_at(0), EngineMode::Idle);
        assert_eq!(sw.elapsed_at(0), 0);

        sw.start_at(1000);
        assert_eq!(sw.mode_at(1500), EngineMode::Running);
        assert_eq!(sw.elapsed_at(1500), 500);

        sw.pause_at(2500);
        assert_eq!(sw.mode_at(9000), EngineMode::Paused);
        assert_eq!(sw.elapsed_at(9000), 1500); // Frozen while paused.

        sw.start_at(9000);
        sw.pause_at(9500);
        assert_eq!(sw.elapsed_at(20_000), 2000);
    }

    #[test]
    fn elapsed_is_independent_of_poll_count() {
        let mut sw = TimeEngine::stopwatch();
        sw.start_at(0);
        // A thousand polls, late and batched, change nothing.
        for now in (0..1000).map(|i| i * 3) {
            sw.tick_at(now);
        }
        assert_eq!(sw.elapsed_at(4000), 4000);
    }

    #[test]
    fn start_while_running_is_a_noop() {
        let mut sw = TimeEngine::stopwatch();
        assert!(sw.start_at(0).is_some());
        assert!(sw.start_at(100).is_none());
        assert_eq!(sw.elapsed_at(500), 500);
    }

    #[test]
    fn pause_twice_equals_pause_once() {
        let mut sw = TimeEngine::stopwatch();
        sw.start_at(0);
        assert!(sw.pause_at(700).is_some());
        assert!(sw.pause_at(900).is_none());
        assert_eq!(sw.elapsed_at(900), 700);
        assert_eq!(sw.mode_at(900), EngineMode::Paused);
    }

    #[test]
    fn lap_captures_without_interrupting() {
        let mut sw = TimeEngine::stopwatch();
        sw.start_at(0);
        sw.lap_at(300);
        sw.lap_at(500);
        assert_eq!(
            sw.laps(),
            &[
                Lap { ordinal: 1, captured_ms: 300 },
                Lap { ordinal: 2, captured_ms: 500 },
            ]
        );
        // The accumulator is untouched.
        assert_eq!(sw.elapsed_at(500), 500);
    }

    #[test]
    fn lap_outside_running_never_mutates() {
        let mut sw = TimeEngine::stopwatch();
        assert!(sw.lap_at(100).is_none()); // Idle
        sw.start_at(0);
        sw.pause_at(200);
        assert!(sw.lap_at(300).is_none()); // Paused
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn reset_clears_everything_from_any_state() {
        let mut sw = TimeEngine::stopwatch();
        sw.start_at(0);
        sw.lap_at(100);
        sw.pause_at(200);
        sw.reset();
        assert_eq!(sw.mode_at(999), EngineMode::Idle);
        assert_eq!(sw.elapsed_at(999), 0);
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn countdown_completes_exactly_once() {
        let mut cd = TimeEngine::countdown(5000);
        cd.start_at(0);
        assert_eq!(cd.remaining_at(1000), Some(4000));
        assert!(cd.tick_at(4999).is_none());

        let event = cd.tick_at(5000);
        assert!(matches!(event, Some(Event::Completed { target_ms: 5000, .. })));
        assert_eq!(cd.mode_at(5000), EngineMode::Completed);

        // Edge-triggered: later polls stay quiet, remaining stays at zero.
        assert!(cd.tick_at(6000).is_none());
        assert_eq!(cd.remaining_at(60_000), Some(0));
        assert_eq!(cd.elapsed_at(60_000), 5000);
    }

    #[test]
    fn overdue_countdown_reports_completed_before_the_poll_lands() {
        let mut cd = TimeEngine::countdown(5000);
        cd.start_at(0);
        // The poll is late; the query must not wait for it.
        assert_eq!(cd.mode_at(7500), EngineMode::Completed);
        assert_eq!(cd.remaining_at(7500), Some(0));
    }

    #[test]
    fn completed_is_terminal() {
        let mut cd = TimeEngine::countdown(100);
        cd.start_at(0);
        cd.tick_at(100);
        assert!(cd.start_at(200).is_none());
        assert!(cd.pause_at(200).is_none());
        assert!(cd.lap_at(200).is_none());
        assert_eq!(cd.mode_at(200), EngineMode::Completed);
    }

    #[test]
    fn zero_target_completes_on_start() {
        let mut cd = TimeEngine::countdown(0);
        let event = cd.start_at(0);
        assert!(matches!(event, Some(Event::Completed { target_ms: 0, .. })));
        assert_eq!(cd.mode_at(0), EngineMode::Completed);
        assert_eq!(cd.remaining_at(1000), Some(0));
    }

    #[test]
    fn pause_past_the_target_completes_instead() {
        let mut cd = TimeEngine::countdown(1000);
        cd.start_at(0);
        let event = cd.pause_at(1500);
        assert!(matches!(event, Some(Event::Completed { .. })));
        assert_eq!(cd.elapsed_at(9999), 1000);
    }

    #[test]
    fn retarget_discards_the_run() {
        let mut cd = TimeEngine::countdown(60_000);
        cd.start_at(0);
        let event = cd.retarget(30_000);
        assert!(matches!(event, Event::Retargeted { target_ms: 30_000, .. }));
        assert_eq!(cd.mode_at(10_000), EngineMode::Idle);
        assert_eq!(cd.elapsed_at(10_000), 0);
        assert_eq!(cd.target_ms(), Some(30_000));
        assert_eq!(cd.remaining_at(10_000), Some(30_000));
    }

    #[test]
    fn reset_keeps_the_target() {
        let mut cd = TimeEngine::countdown(5000);
        cd.start_at(0);
        cd.reset();
        assert_eq!(cd.target_ms(), Some(5000));
        assert_eq!(cd.remaining_at(0), Some(5000));
    }

    #[test]
    fn stopwatch_never_completes() {
        let mut sw = TimeEngine::stopwatch();
        sw.start_at(0);
        assert!(sw.tick_at(u64::MAX / 2).is_none());
        assert_eq!(sw.mode_at(u64::MAX / 2), EngineMode::Running);
        assert_eq!(sw.remaining_at(0), None);
    }

    #[test]
    fn snapshot_reflects_live_state() {
        let mut cd = TimeEngine::countdown(10_000);
        cd.start_at(0);
        cd.lap_at(2000);
        match cd.snapshot_at(3000) {
            Event::StateSnapshot {
                mode,
                elapsed_ms,
                remaining_ms,
                target_ms,
                laps,
                ..
            } => {
                assert_eq!(mode, EngineMode::Running);
                assert_eq!(elapsed_ms, 3000);
                assert_eq!(remaining_ms, Some(7000));
                assert_eq!(target_ms, Some(10_000));
                assert_eq!(laps.len(), 1);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    proptest! {
        /// For any sequence of start/pause pairs, elapsed time equals the
        /// sum of the running intervals -- no matter how many polls fired
        /// in between or how long the engine sat paused.
        #[test]
        fn elapsed_equals_sum_of_running_intervals(
            intervals in prop::collection::vec((0u64..100_000, 0u64..100_000), 0..32),
        ) {
            let mut sw = TimeEngine::stopwatch();
            let mut now = 0u64;
            let mut expected = 0u64;
            for (run, idle) in intervals {
                sw.start_at(now);
                // Polls sprinkled mid-run are pure noise for a stopwatch.
                sw.tick_at(now + run / 2);
                now += run;
                sw.pause_at(now);
                expected += run;
                now += idle;
                prop_assert_eq!(sw.elapsed_at(now), expected);
            }
        }

        /// The accumulator never decreases while observing a running engine.
        #[test]
        fn elapsed_is_monotonic_while_running(
            observations in prop::collection::vec(0u64..1_000_000, 1..64),
        ) {
            let mut sw = TimeEngine::stopwatch();
            sw.start_at(0);
            let mut sorted = observations;
            sorted.sort_unstable();
            let mut last = 0u64;
            for now in sorted {
                let elapsed = sw.elapsed_at(now);
                prop_assert!(elapsed >= last);
                last = elapsed;
            }
        }

        /// Remaining time never undershoots zero, whatever the poll pattern.
        #[test]
        fn remaining_never_goes_negative(
            target in 0u64..10_000,
            polls in prop::collection::vec(0u64..100_000, 0..32),
        ) {
            let mut cd = TimeEngine::countdown(target);
            cd.start_at(0);
            for now in polls {
                cd.tick_at(now);
                prop_assert!(cd.remaining_at(now).unwrap() <= target);
            }
        }
    }
}
