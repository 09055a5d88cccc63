//! Interval algebra over local civil time.
//!
//! All operations take and return lists of non-empty intervals. Merged
//! lists are sorted by start and mutually non-overlapping; `merge` is
//! idempotent, so re-merging an already-merged list is a no-op.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::calendar::WorkCalendar;

/// A non-empty span of local civil time.
///
/// Degenerate spans (`end <= start`) are unrepresentable: [`Interval::new`]
/// returns `None` for them, and every operation in this module drops
/// zero-length results instead of emitting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl Interval {
    /// Creates an interval, rejecting degenerate spans.
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    #[must_use]
    pub const fn start(self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> NaiveDateTime {
        self.end
    }

    /// Whole minutes covered by this interval (floor of seconds / 60).
    #[must_use]
    pub fn minutes(self) -> i64 {
        (self.end - self.start).num_seconds() / 60
    }

    /// The intersection of two intervals, or `None` if they don't overlap.
    #[must_use]
    pub fn clip(self, other: Self) -> Option<Self> {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }
}

/// The day bound for a date: `[00:00:00, 23:59:59]`.
///
/// The last second of the day is treated as inclusive so consecutive
/// days never share a boundary instant.
#[must_use]
pub fn day_bounds(date: NaiveDate) -> Interval {
    Interval {
        start: date.and_time(NaiveTime::MIN),
        end: date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap()),
    }
}

/// Merges overlapping and touching intervals into a sorted, disjoint list.
///
/// Touching intervals (`next.start == current.end`) are folded together.
#[must_use]
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_unstable_by_key(|iv| (iv.start, iv.end));
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for next in intervals {
        match merged.last_mut() {
            Some(current) if next.start <= current.end => {
                current.end = current.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

/// Intersects an arbitrary span with the outside-hours segments of every
/// date it covers.
///
/// The span may start and end mid-day on different dates; each covered
/// date contributes only the portion of the span falling on that date,
/// clipped to that date's outside windows. The result is merged.
#[must_use]
pub fn intersect_with_outside(calendar: &WorkCalendar, span: Interval) -> Vec<Interval> {
    let mut out = Vec::new();
    let mut date = span.start.date();
    while date <= span.end.date() {
        if let Some(day_part) = span.clip(day_bounds(date)) {
            for outside in calendar.outside_windows(date) {
                if let Some(clipped) = day_part.clip(outside) {
                    out.push(clipped);
                }
            }
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }
    merge(out)
}

/// Complement gaps within a day's working windows not covered by
/// `occupied`.
///
/// `occupied` must be merged (sorted, disjoint); the windows themselves
/// come from [`WorkCalendar::working_windows`], which merges on the way
/// out.
#[must_use]
pub fn free_gaps_within(windows: &[Interval], occupied: &[Interval]) -> Vec<Interval> {
    let mut gaps = Vec::new();
    for window in windows {
        let mut cursor = window.start;
        for busy in occupied {
            if busy.end <= cursor || busy.start >= window.end {
                continue;
            }
            if let Some(gap) = Interval::new(cursor, busy.start) {
                gaps.push(gap);
            }
            cursor = cursor.max(busy.end);
            if cursor >= window.end {
                break;
            }
        }
        if let Some(gap) = Interval::new(cursor, window.end) {
            gaps.push(gap);
        }
    }
    gaps
}
