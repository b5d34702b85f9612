use chrono::NaiveTime;

use crate::error::CommandError;

/// Parse a 12-hour clock time like `1:10 PM`. Tolerates a missing space
/// before the meridiem and any casing; anything without AM/PM is rejected.
pub fn parse_clock(s: &str) -> Result<NaiveTime, CommandError> {
    let normalized = normalize_clock(s)?;
    NaiveTime::parse_from_str(&normalized, "%I:%M %p").map_err(|_| CommandError::InvalidTimeFormat)
}

fn normalize_clock(s: &str) -> Result<String, CommandError> {
    let upper = s.trim().to_ascii_uppercase().replace("AM", " AM").replace("PM", " PM");
    if !upper.contains("AM") && !upper.contains("PM") {
        return Err(CommandError::InvalidTimeFormat);
    }
    // Collapse the double space left when the input already had one.
    Ok(upper.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Duration in hours between two clock times, wrapping past midnight when the
/// raw difference is negative. Only clock time is supplied, not dates, so a
/// shift can never span more than one wrap. Rounded to two decimals.
pub fn shift_duration_hours(start: NaiveTime, end: NaiveTime) -> f64 {
    let mut minutes = end.signed_duration_since(start).num_minutes();
    if minutes < 0 {
        minutes += 24 * 60;
    }
    round_hours(minutes as f64 / 60.0)
}

pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
