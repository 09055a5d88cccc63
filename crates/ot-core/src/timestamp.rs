//! Timestamp normalization into the configured local civil zone.
//!
//! External evidence carries instants in several shapes: RFC 3339 with
//! or without offset, naive ISO local time, `git log`-style spaced
//! offsets, and epoch seconds (possibly fractional, as chat exports
//! produce). Parsing is an ordered list of strategies tried in turn; the
//! first success wins, and a single typed error is returned when all
//! fail. Downstream code works on the returned [`NaiveDateTime`] and
//! never re-interprets zones.

use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// All parser strategies failed for a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized timestamp: {value}")]
pub struct TimestampError {
    pub value: String,
}

type Strategy = fn(&str, Tz) -> Option<NaiveDateTime>;

/// Strategies in priority order. Epoch seconds go last so date-shaped
/// strings are never mistaken for large integers.
const STRATEGIES: &[Strategy] = &[rfc3339, naive_iso, spaced_offset, epoch_seconds];

/// Parses an external instant into civil time in `tz`.
pub fn parse_local(value: &str, tz: Tz) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = value.trim();
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(trimmed, tz))
        .ok_or_else(|| TimestampError {
            value: value.to_string(),
        })
}

/// RFC 3339 / ISO 8601 with an explicit offset or `Z`.
fn rfc3339(value: &str, tz: Tz) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|instant| instant.with_timezone(&tz).naive_local())
}

/// ISO 8601 without an offset, interpreted as already-local time.
fn naive_iso(value: &str, _tz: Tz) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// `YYYY-MM-DD HH:MM:SS +ZZZZ`, as some log formats emit.
fn spaced_offset(value: &str, tz: Tz) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z")
        .ok()
        .map(|instant| instant.with_timezone(&tz).naive_local())
}

/// UTC epoch seconds, optionally fractional (e.g. `1714662896.000200`).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is range-checked before the casts"
)]
fn epoch_seconds(value: &str, tz: Tz) -> Option<NaiveDateTime> {
    let seconds: f64 = value.parse().ok()?;
    // Reject non-finite and out-of-range values (past year ~33000).
    if !seconds.is_finite() || !(0.0..1e12).contains(&seconds) {
        return None;
    }
    let whole = seconds.trunc() as i64;
    let nanos = (seconds.fract() * 1e9) as u32;
    let utc = DateTime::from_timestamp(whole, nanos)?;
    Some(utc.with_timezone(&tz).naive_local())
}

/// Converts a zone-aware instant into civil time in `tz`.
#[must_use]
pub fn to_local<Z: TimeZone>(instant: &DateTime<Z>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}
