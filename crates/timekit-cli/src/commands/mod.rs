pub mod config;
pub mod countdown;
pub mod focus;
pub mod pomodoro;
pub mod stopwatch;

use timekit_core::Event;

/// Print a discrete engine event as a JSON line. Silent no-ops stay silent.
/// The leading carriage return clears a partially drawn widget face.
pub(crate) fn emit(event: Option<Event>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(event) = event {
        println!("\r{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
