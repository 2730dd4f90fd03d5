//! UPnP `H+:MM:SS[.F+]` duration strings

use std::time::Duration;

use tracing::{debug, error};

/// Parse a UPnP duration string
///
/// Accepts `H:MM:SS` and `H:MM:SS.fraction` (any number of hour digits, an
/// optional leading `+`). Anything else, including the `NOT_IMPLEMENTED`
/// placeholder some renderers send, yields [`Duration::ZERO`].
pub fn parse_duration(value: &str) -> Duration {
    let value = value.trim();
    if value.is_empty() || value == "NOT_IMPLEMENTED" {
        debug!(value, "no duration available");
        return Duration::ZERO;
    }

    match try_parse(value) {
        Some(duration) => duration,
        None => {
            error!(value, "bad duration string");
            Duration::ZERO
        }
    }
}

fn try_parse(value: &str) -> Option<Duration> {
    let value = value.strip_prefix('+').unwrap_or(value);
    let mut parts = value.split(':');
    let hours = parts.next()?;
    let minutes = parts.next()?;
    let seconds = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (seconds, fraction) = match seconds.split_once('.') {
        Some((s, f)) => (s, Some(f)),
        None => (seconds, None),
    };

    let hours: u64 = digits(hours)?;
    let minutes: u64 = digits(minutes)?;
    let seconds: u64 = digits(seconds)?;
    if minutes > 59 || seconds > 59 {
        return None;
    }

    let whole = hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)?;
    let total = Duration::from_secs(whole);
    match fraction {
        Some(fraction) => total.checked_add(fraction_of_second(fraction)?),
        None => Some(total),
    }
}

fn digits(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Decimal fraction of a second, truncated to nanosecond precision
fn fraction_of_second(fraction: &str) -> Option<Duration> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut nanos: u32 = 0;
    let mut scale: u32 = 100_000_000;
    for b in fraction.bytes().take(9) {
        nanos += u32::from(b - b'0') * scale;
        scale /= 10;
    }
    Some(Duration::from_nanos(u64::from(nanos)))
}

/// Format a duration as `H:MM:SS`, dropping sub-second precision
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
