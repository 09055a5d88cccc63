//! Work schedule: per-weekday working windows plus an exception set.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::interval::{self, Interval, day_bounds};

/// A configured time-of-day window, e.g. 09:00-18:00.
pub type WindowOfDay = (NaiveTime, NaiveTime);

/// A work schedule: ordered working windows per weekday (0 = Monday),
/// overridden to "no working hours" on exception dates (holidays, PTO).
///
/// Configuration is taken as given, but windows are merged before use so
/// an unsorted or overlapping weekday table degrades gracefully instead
/// of erroring.
#[derive(Debug, Clone, Default)]
pub struct WorkCalendar {
    weekday_windows: [Vec<WindowOfDay>; 7],
    exceptions: BTreeMap<NaiveDate, String>,
}

impl WorkCalendar {
    #[must_use]
    pub const fn new(
        weekday_windows: [Vec<WindowOfDay>; 7],
        exceptions: BTreeMap<NaiveDate, String>,
    ) -> Self {
        Self {
            weekday_windows,
            exceptions,
        }
    }

    /// A Monday-to-Friday 09:00-18:00 schedule with free weekends.
    #[must_use]
    pub fn standard() -> Self {
        let window = (
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        );
        let mut weekday_windows: [Vec<WindowOfDay>; 7] = std::array::from_fn(|_| Vec::new());
        for windows in weekday_windows.iter_mut().take(5) {
            windows.push(window);
        }
        Self::new(weekday_windows, BTreeMap::new())
    }

    /// Marks a date as having no working hours, with a label such as
    /// "holiday" or "PTO".
    pub fn add_exception(&mut self, date: NaiveDate, label: impl Into<String>) {
        self.exceptions.insert(date, label.into());
    }

    /// Returns the exception label for a date, if any.
    #[must_use]
    pub fn exception_label(&self, date: NaiveDate) -> Option<&str> {
        self.exceptions.get(&date).map(String::as_str)
    }

    /// The merged working windows for a date, anchored to that date.
    ///
    /// Empty for exception dates and for weekdays with no configured
    /// windows.
    #[must_use]
    pub fn working_windows(&self, date: NaiveDate) -> Vec<Interval> {
        if self.exceptions.contains_key(&date) {
            return Vec::new();
        }
        let weekday = date.weekday().num_days_from_monday() as usize;
        let anchored = self.weekday_windows[weekday]
            .iter()
            .filter_map(|&(start, end)| Interval::new(date.and_time(start), date.and_time(end)))
            .collect();
        interval::merge(anchored)
    }

    /// The complement of the working windows within the day bound.
    ///
    /// Together with [`Self::working_windows`] this partitions
    /// `[00:00:00, 23:59:59]` exactly: a date with no working windows is
    /// one whole-day outside interval.
    #[must_use]
    pub fn outside_windows(&self, date: NaiveDate) -> Vec<Interval> {
        let day = day_bounds(date);
        let inside = self.working_windows(date);
        if inside.is_empty() {
            return vec![day];
        }
        let mut outside = Vec::new();
        let mut cursor = day.start();
        for window in &inside {
            if let Some(gap) = Interval::new(cursor, window.start()) {
                outside.push(gap);
            }
            cursor = cursor.max(window.end());
        }
        if let Some(gap) = Interval::new(cursor, day.end()) {
            outside.push(gap);
        }
        outside
    }
}
