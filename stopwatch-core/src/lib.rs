//! Pure stopwatch logic library with no platform dependencies.
//! Time is always passed in as milliseconds, so everything here is testable on host.

mod engine;
mod format;
mod laps;

pub use engine::{Snapshot, StopwatchCore, TimerState};
pub use format::{format_lap_time, pad2, DurationParts};
pub use laps::{extremes, lap_table, LapEntry};
