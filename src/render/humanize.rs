use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Describes `timestamp` relative to `now` in English ("3 hours ago",
/// "in 2 days"). Returns an empty string when there is no timestamp.
///
/// Anything within a minute either way is "just now". Months count as 30
/// days and years as 365.
pub fn humanize(timestamp: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let diff = now.signed_duration_since(ts).num_seconds();
    let magnitude = diff.saturating_abs();

    if magnitude < MINUTE {
        return "just now".to_string();
    }

    let (count, unit) = match magnitude {
        m if m < HOUR => (m / MINUTE, "minute"),
        m if m < DAY => (m / HOUR, "hour"),
        m if m < MONTH => (m / DAY, "day"),
        m if m < YEAR => (m / MONTH, "month"),
        m => (m / YEAR, "year"),
    };
    let plural = if count == 1 { "" } else { "s" };

    if diff >= 0 {
        format!("{count} {unit}{plural} ago")
    } else {
        format!("in {count} {unit}{plural}")
    }
}
