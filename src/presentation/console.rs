use serde::Serialize;

use crate::application::{
    error::AppError,
    tracker::{TrackerStatus, TrackerView, format_display_ms},
};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::unexpected(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

pub fn print_line(line: &str) -> Result<(), AppError> {
    println!("{line}");
    Ok(())
}

/// One-line timer readout: `running 1:02:03 task 42` or `idle 0:00`.
pub fn tracker_line(view: &TrackerView) -> String {
    let elapsed = format_display_ms(view.display_ms);
    match (view.status, view.active_task_id.as_ref()) {
        (TrackerStatus::Running, Some(task_id)) => format!("running {elapsed} task {task_id}"),
        (TrackerStatus::Running, None) => format!("running {elapsed}"),
        (TrackerStatus::Idle, _) => format!("idle {elapsed}"),
    }
}
