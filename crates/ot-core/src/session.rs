//! Session clustering: turns sparse instant timestamps into padded
//! continuous "active" intervals.

use chrono::{Duration, NaiveDateTime};

use crate::interval::Interval;

/// Clustering thresholds for [`build_sessions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// A gap strictly greater than this starts a new session.
    /// Default: 45.
    pub gap_minutes: i64,

    /// Padding applied before the first point of a session.
    /// Default: 10.
    pub pad_before_minutes: i64,

    /// Padding applied after the last point of a session.
    /// Default: 15.
    pub pad_after_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gap_minutes: 45,
            pad_before_minutes: 10,
            pad_after_minutes: 15,
        }
    }
}

/// Clusters instant timestamps into padded sessions.
///
/// Points are sorted, then walked in order: a gap strictly greater than
/// the threshold closes the current session. Each session runs from its
/// first point minus the leading pad to its last point plus the trailing
/// pad. A run of points with no over-threshold gap collapses to one
/// session regardless of its total span.
#[must_use]
pub fn build_sessions(points: &[NaiveDateTime], config: &SessionConfig) -> Vec<Interval> {
    let mut points = points.to_vec();
    points.sort_unstable();

    let gap = Duration::minutes(config.gap_minutes);
    let pad_before = Duration::minutes(config.pad_before_minutes);
    let pad_after = Duration::minutes(config.pad_after_minutes);

    let mut sessions = Vec::new();
    let Some((&head, rest)) = points.split_first() else {
        return sessions;
    };

    let mut first = head;
    let mut last = head;
    for &point in rest {
        if point - last > gap {
            sessions.extend(Interval::new(first - pad_before, last + pad_after));
            first = point;
        }
        last = point;
    }
    sessions.extend(Interval::new(first - pad_before, last + pad_after));
    sessions
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 3)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    #[test]
    fn empty_input_yields_no_sessions() {
        assert!(build_sessions(&[], &SessionConfig::default()).is_empty());
    }

    #[test]
    fn gap_of_exactly_threshold_does_not_split() {
        // Canonical boundary case: gaps of 5 and exactly 45 minutes keep
        // the first three points in one session; 15:00 starts another.
        let points = [at(9, 0), at(9, 5), at(9, 50), at(15, 0)];
        let sessions = build_sessions(&points, &SessionConfig::default());
        assert_eq!(
            sessions,
            vec![
                Interval::new(at(8, 50), at(10, 5)).unwrap(),
                Interval::new(at(14, 50), at(15, 15)).unwrap(),
            ]
        );
    }

    #[test]
    fn single_point_becomes_padded_session() {
        let sessions = build_sessions(&[at(22, 0)], &SessionConfig::default());
        assert_eq!(
            sessions,
            vec![Interval::new(at(21, 50), at(22, 15)).unwrap()]
        );
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let points = [at(15, 0), at(9, 0), at(9, 5)];
        let sessions = build_sessions(&points, &SessionConfig::default());
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].start(), at(8, 50));
    }

    #[test]
    fn long_run_collapses_to_one_session() {
        // Points every 30 minutes across six hours never exceed the gap.
        let points: Vec<_> = (0..13).map(|i| at(9, 0) + Duration::minutes(i * 30)).collect();
        let sessions = build_sessions(&points, &SessionConfig::default());
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start(), at(8, 50));
        assert_eq!(sessions[0].end(), at(15, 15));
    }
}
