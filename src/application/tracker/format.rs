/// Format milliseconds as `H:MM:SS` from one hour up, `M:SS` below.
/// Zero, negative and absent durations read `0:00`.
pub fn format_duration(ms: Option<i64>) -> String {
    let total_seconds = match ms {
        Some(ms) if ms > 0 => ms / 1000,
        _ => return "0:00".to_string(),
    };

    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Convenience for the tracker's unsigned display value.
pub fn format_display_ms(ms: u64) -> String {
    format_duration(Some(i64::try_from(ms).unwrap_or(i64::MAX)))
}
