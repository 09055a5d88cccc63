//! Normalized evidence records handed to the engine by collectors.
//!
//! Records are immutable once produced: collectors normalize timestamps
//! into the configured local zone and filter degenerate ranges before
//! anything reaches the engine.

use std::fmt;

use chrono::NaiveDateTime;

use crate::interval::Interval;

/// Which collector produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Version-control commit.
    Git,
    /// Merged code review.
    Review,
    /// Calendar meeting.
    Calendar,
    /// Chat message.
    Chat,
}

impl Source {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Review => "review",
            Self::Calendar => "calendar",
            Self::Chat => "chat",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git" => Ok(Self::Git),
            "review" => Ok(Self::Review),
            "calendar" => Ok(Self::Calendar),
            "chat" => Ok(Self::Chat),
            _ => Err(format!("invalid evidence source: {s}")),
        }
    }
}

/// Evidence pinned to a single instant (commit, review merge, message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantRecord {
    pub source: Source,
    /// Free-text origin: repository name, channel name.
    pub location: String,
    /// Local civil time in the configured zone.
    pub timestamp: NaiveDateTime,
    pub detail: String,
}

/// Evidence covering a time range (calendar meeting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRecord {
    pub source: Source,
    pub location: String,
    span: Interval,
    pub detail: String,
}

impl RangeRecord {
    /// Creates a range record; `None` when `end <= start`.
    #[must_use]
    pub fn new(
        source: Source,
        location: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        detail: impl Into<String>,
    ) -> Option<Self> {
        Interval::new(start, end).map(|span| Self {
            source,
            location: location.into(),
            span,
            detail: detail.into(),
        })
    }

    #[must_use]
    pub const fn span(&self) -> Interval {
        self.span
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.span.start()
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.span.end()
    }
}

/// A uniform, borrowed view over any evidence record, used for note
/// building and row-level export. Range records are viewed at their
/// start instant.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceRow<'a> {
    pub timestamp: NaiveDateTime,
    pub source: Source,
    pub location: &'a str,
    pub detail: &'a str,
}

/// All evidence collected for one run, grouped by source.
///
/// An empty collection for any source is not an error; it simply
/// contributes nothing.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    pub commits: Vec<InstantRecord>,
    pub reviews: Vec<InstantRecord>,
    pub meetings: Vec<RangeRecord>,
    pub messages: Vec<InstantRecord>,
}

impl EvidenceSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.commits.len() + self.reviews.len() + self.meetings.len() + self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All instant timestamps pooled into one timeline.
    ///
    /// Commits, reviews, and messages are proxies for the same "was
    /// actively working" signal, so they cluster into sessions together.
    #[must_use]
    pub fn instant_timestamps(&self) -> Vec<NaiveDateTime> {
        self.instants().map(|record| record.timestamp).collect()
    }

    /// Every record, instant and ranged, sorted by timestamp ascending.
    #[must_use]
    pub fn chronological(&self) -> Vec<EvidenceRow<'_>> {
        let mut rows: Vec<EvidenceRow<'_>> = self
            .instants()
            .map(|record| EvidenceRow {
                timestamp: record.timestamp,
                source: record.source,
                location: &record.location,
                detail: &record.detail,
            })
            .chain(self.meetings.iter().map(|meeting| EvidenceRow {
                timestamp: meeting.start(),
                source: meeting.source,
                location: &meeting.location,
                detail: &meeting.detail,
            }))
            .collect();
        rows.sort_by_key(|row| row.timestamp);
        rows
    }

    fn instants(&self) -> impl Iterator<Item = &InstantRecord> {
        self.commits
            .iter()
            .chain(&self.reviews)
            .chain(&self.messages)
    }
}
