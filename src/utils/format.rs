use chrono::{Duration, NaiveTime};

/// Format a countdown as "Xh Ym", hours always shown.
pub fn format_countdown(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Format a wall-clock time as "hh:mm AM".
pub fn format_clock(t: NaiveTime) -> String {
    t.format("%I:%M %p").to_string()
}
