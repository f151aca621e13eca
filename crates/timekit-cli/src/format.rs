//! Display formatting for the widget faces.
//!
//! The engine reports exact millisecond counts; everything here is
//! presentation.

use std::fmt;

/// "MM:SS.cc" for the stopwatch face (centiseconds).
pub fn clock_cs(ms: u64) -> String {
    let cs = (ms % 1000) / 10;
    let total_secs = ms / 1000;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}.{:02}", m, s, cs)
}

/// "MM:SS" for countdown faces.
pub fn clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    let m = total_secs / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}", m, s)
}

/// Days/hours/minutes/seconds breakdown for the centenary countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dhms {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

pub fn dhms(ms: u64) -> Dhms {
    let total_secs = ms / 1000;
    Dhms {
        days: total_secs / 86_400,
        hours: (total_secs % 86_400) / 3600,
        minutes: (total_secs % 3600) / 60,
        seconds: total_secs % 60,
    }
}

impl fmt::Display for Dhms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
