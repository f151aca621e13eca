mod engine;
mod presets;

pub use engine::{EngineMode, Lap, TimeEngine};
pub use presets::{focus_target_ms, hundredth_birthday, PomodoroPhase, PomodoroSession};
