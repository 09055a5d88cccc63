//! Overtime aggregation: one deterministic pass over a fixed evidence
//! set.
//!
//! The engine clusters instant evidence into sessions, intersects
//! sessions and meetings with the outside-hours segments of each day,
//! merges everything so no time range is counted twice, aggregates
//! minutes per date, attaches example notes, and applies the lunch-gap
//! heuristic. It performs no I/O and reads no clocks: the result is a
//! pure function of the evidence, the calendar, and the configuration.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::WorkCalendar;
use crate::evidence::{EvidenceSet, RangeRecord};
use crate::interval::{self, Interval, day_bounds};
use crate::notes::NoteBuffer;
use crate::session::{SessionConfig, build_sessions};

/// Note pinned to a day whose working hours were fully occupied.
pub const LUNCH_NOTE: &str = "[lunch] no 60m break (+1h)";

/// Thresholds for one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Session clustering thresholds.
    pub session: SessionConfig,

    /// Minimum free gap during working hours counted as a lunch break;
    /// also the penalty added when no such gap exists. Default: 60.
    pub lunch_break_minutes: i64,

    /// Example notes retained per day. Default: 5.
    pub max_notes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            lunch_break_minutes: 60,
            max_notes: 5,
        }
    }
}

/// Estimated overtime for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    /// Estimated outside-hours minutes. Never negative.
    pub minutes: i64,
    /// Up to `max_notes` example notes, `[source] detail`.
    pub notes: Vec<String>,
}

/// Per-day accumulator while the pass is running.
struct DayAccum {
    minutes: i64,
    notes: NoteBuffer,
}

impl DayAccum {
    const fn new(max_notes: usize) -> Self {
        Self {
            minutes: 0,
            notes: NoteBuffer::new(max_notes),
        }
    }
}

/// Computes per-date overtime estimates from a fixed evidence set.
///
/// The output covers every date with a minute contribution or any
/// evidence record. Intervals that cross midnight attribute all their
/// minutes to the start date; that is inherited, documented behavior.
#[must_use]
pub fn compute_overtime(
    evidence: &EvidenceSet,
    calendar: &WorkCalendar,
    config: &EngineConfig,
) -> BTreeMap<NaiveDate, DailySummary> {
    // 1. One pooled session timeline for all instant evidence.
    let sessions = build_sessions(&evidence.instant_timestamps(), &config.session);

    // 2-3. Clip sessions and meetings to outside-hours, per kind.
    let session_outside = outside_portions(calendar, sessions.iter().copied());
    let calendar_outside =
        outside_portions(calendar, evidence.meetings.iter().map(RangeRecord::span));

    // 4. One merged set; a meeting during an already-flagged session
    // cannot double count.
    let mut combined = session_outside;
    combined.extend(calendar_outside);
    let combined = interval::merge(combined);

    // 5. Minutes keyed by each interval's start date.
    let mut per_day: BTreeMap<NaiveDate, DayAccum> = BTreeMap::new();
    for span in &combined {
        per_day
            .entry(span.start().date())
            .or_insert_with(|| DayAccum::new(config.max_notes))
            .minutes += span.minutes();
    }

    // 6. Example notes from all evidence, oldest first. This also pulls
    // in dates whose evidence fell entirely inside working hours.
    for row in evidence.chronological() {
        let day = per_day
            .entry(row.timestamp.date())
            .or_insert_with(|| DayAccum::new(config.max_notes));
        let _ = day.notes.push(format!("[{}] {}", row.source, row.detail));
    }

    // 7. Lunch-gap heuristic.
    apply_lunch_heuristic(evidence, calendar, config, &sessions, &mut per_day);

    tracing::debug!(
        days = per_day.len(),
        sessions = sessions.len(),
        "overtime aggregation complete"
    );

    per_day
        .into_iter()
        .map(|(date, accum)| {
            (
                date,
                DailySummary {
                    minutes: accum.minutes,
                    notes: accum.notes.into_notes(),
                },
            )
        })
        .collect()
}

/// Intersects each span with outside-hours and merges the results.
fn outside_portions(
    calendar: &WorkCalendar,
    spans: impl Iterator<Item = Interval>,
) -> Vec<Interval> {
    let mut out = Vec::new();
    for span in spans {
        out.extend(interval::intersect_with_outside(calendar, span));
    }
    interval::merge(out)
}

/// Adds the lunch penalty to every evidenced working day whose working
/// windows hold no free gap of at least the configured break.
///
/// Days with no working windows (weekend, holiday, PTO) are skipped:
/// they are already fully outside-hours, so no separate penalty applies.
/// Days whose evidence never touches the working windows are skipped
/// too.
fn apply_lunch_heuristic(
    evidence: &EvidenceSet,
    calendar: &WorkCalendar,
    config: &EngineConfig,
    sessions: &[Interval],
    per_day: &mut BTreeMap<NaiveDate, DayAccum>,
) {
    let mut event_days: BTreeSet<NaiveDate> = evidence
        .instant_timestamps()
        .into_iter()
        .map(|timestamp| timestamp.date())
        .collect();
    event_days.extend(evidence.meetings.iter().map(|m| m.start().date()));
    event_days.extend(per_day.keys().copied());

    for date in event_days {
        let windows = calendar.working_windows(date);
        if windows.is_empty() {
            continue;
        }
        let day = day_bounds(date);
        let mut occupied = Vec::new();
        for span in sessions
            .iter()
            .copied()
            .chain(evidence.meetings.iter().map(RangeRecord::span))
        {
            let Some(on_day) = span.clip(day) else {
                continue;
            };
            for window in &windows {
                if let Some(busy) = on_day.clip(*window) {
                    occupied.push(busy);
                }
            }
        }
        if occupied.is_empty() {
            continue;
        }
        let occupied = interval::merge(occupied);
        let gaps = interval::free_gaps_within(&windows, &occupied);
        if gaps
            .iter()
            .any(|gap| gap.minutes() >= config.lunch_break_minutes)
        {
            continue;
        }
        let accum = per_day
            .entry(date)
            .or_insert_with(|| DayAccum::new(config.max_notes));
        accum.minutes += config.lunch_break_minutes;
        accum.notes.pin_front(LUNCH_NOTE);
    }
}
