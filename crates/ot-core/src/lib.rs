//! Core overtime estimation engine.
//!
//! This crate contains the pure interval/session reconciliation logic:
//! - Calendar: per-weekday working windows with a holiday/PTO exception set
//! - Interval algebra: merge, outside-hours intersection, free gaps
//! - Session builder: clustering instant evidence into active sessions
//! - Overtime engine: per-day aggregation with the lunch-gap heuristic
//!
//! Everything here is synchronous, deterministic, and I/O-free; evidence
//! collection lives in `ot-sources`.

pub mod calendar;
pub mod engine;
pub mod evidence;
pub mod interval;
pub mod notes;
pub mod session;
pub mod timestamp;

pub use calendar::{WindowOfDay, WorkCalendar};
pub use engine::{DailySummary, EngineConfig, LUNCH_NOTE, compute_overtime};
pub use evidence::{EvidenceRow, EvidenceSet, InstantRecord, RangeRecord, Source};
pub use interval::Interval;
pub use notes::NoteBuffer;
pub use session::{SessionConfig, build_sessions};
pub use timestamp::{TimestampError, parse_local};
