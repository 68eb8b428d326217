//! Live duration tracking for the currently booked task.
//!
//! [`DurationTracker`] is a synchronous state machine over an
//! injectable [`Clock`]. [`TrackerController`] wraps it for async callers,
//! owns the one-second tick task, and publishes [`TrackerView`] updates.

mod clock;
mod controller;
mod format;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{DEFAULT_TICK_INTERVAL, TrackerController, TrackerView};
pub use format::{format_display_ms, format_duration};
pub use state::{DurationTracker, FetchTicket, SnapshotOutcome, TrackerStatus};
