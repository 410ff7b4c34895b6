use chrono::{DateTime, Duration, DurationRound, TimeZone, Utc};

/// Shortens a secret for log output and the status table.
///
/// Keeps the first and last four characters of long values; short values are
/// hidden entirely.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len().max(1));
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// Time left until the next full hour after `now`.
///
/// Exactly on the hour the next run is a whole hour away, matching a
/// `0 * * * *` cron schedule.
pub fn until_next_hour<Tz: TimeZone>(now: DateTime<Tz>) -> Duration {
    let hour = Duration::hours(1);
    match now.clone().duration_trunc(hour) {
        Ok(start) => start + hour - now,
        Err(_) => hour,
    }
}

/// Formats a unix timestamp for display, or `-` if it is out of range.
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| "-".to_string())
}
