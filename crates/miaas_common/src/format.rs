//! Display formatting for node fields.

use crate::node::Capabilities;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Shown when a node has never reported a heartbeat
pub const NEVER: &str = "Never";

/// Shown when the timestamp is outside the representable range
pub const INVALID_DATE: &str = "Invalid Date";

/// Date-time layout for last-seen values
pub const LAST_SEEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of id characters kept by [`short_id`]
pub const SHORT_ID_LEN: usize = 8;

/// Format a last-seen epoch-seconds value in the host's local timezone.
///
/// Absent, zero and non-finite values read as "Never".
pub fn format_last_seen(timestamp: Option<f64>) -> String {
    format_last_seen_in(timestamp, &Local)
}

/// Same as [`format_last_seen`] for an explicit timezone.
pub fn format_last_seen_in<Tz>(timestamp: Option<f64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let secs = match timestamp {
        Some(t) if t != 0.0 && t.is_finite() => t,
        _ => return NEVER.to_string(),
    };

    match epoch_to_utc(secs) {
        Some(utc) => utc.with_timezone(tz).format(LAST_SEEN_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = ((secs - whole) * 1e9).min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos)
}

/// First eight characters of an id followed by an ellipsis. Cosmetic only.
pub fn short_id(id: &str) -> String {
    let prefix: String = id.chars().take(SHORT_ID_LEN).collect();
    format!("{}...", prefix)
}

/// One `key: value` tag per capability, in received order.
pub fn capability_tags(capabilities: Option<&Capabilities>) -> Vec<String> {
    capabilities
        .map(|caps| {
            caps.iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect()
        })
        .unwrap_or_default()
}
