//! JSONL loaders for pre-fetched evidence exports.
//!
//! Upstream fetchers (review APIs, calendar exports, chat search) land
//! their results as JSONL files, one record per line. Loading is
//! best-effort: malformed lines and unparseable timestamps are skipped
//! with debug logging, and a missing file contributes nothing.

use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono_tz::Tz;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use ot_core::{InstantRecord, RangeRecord, Source, timestamp};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An instant evidence line: review merge or chat message.
#[derive(Debug, Deserialize)]
struct InstantRow {
    #[serde(default)]
    location: String,
    timestamp: String,
    detail: String,
}

/// A meeting line from a calendar export.
#[derive(Debug, Deserialize)]
struct MeetingRow {
    #[serde(default)]
    location: String,
    start: String,
    end: String,
    title: String,
}

/// Loads instant records (tagged with `source`) from a JSONL file.
pub fn load_instants(
    path: &Path,
    source: Source,
    tz: Tz,
) -> Result<Vec<InstantRecord>, LoadError> {
    let rows: Vec<InstantRow> = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        match timestamp::parse_local(&row.timestamp, tz) {
            Ok(at) => records.push(InstantRecord {
                source,
                location: row.location,
                timestamp: at,
                detail: row.detail,
            }),
            Err(error) => tracing::debug!(%source, %error, "skipping record"),
        }
    }
    Ok(records)
}

/// Loads meeting records from a JSONL file.
///
/// Meetings whose title is in `excluded_titles` (case-insensitive exact
/// match after trimming) and meetings whose end does not follow their
/// start never reach the engine.
pub fn load_meetings(
    path: &Path,
    tz: Tz,
    excluded_titles: &[String],
) -> Result<Vec<RangeRecord>, LoadError> {
    let excluded: HashSet<String> = excluded_titles
        .iter()
        .map(|title| title.trim().to_lowercase())
        .collect();

    let rows: Vec<MeetingRow> = read_rows(path)?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        if excluded.contains(&row.title.trim().to_lowercase()) {
            continue;
        }
        let (Ok(start), Ok(end)) = (
            timestamp::parse_local(&row.start, tz),
            timestamp::parse_local(&row.end, tz),
        ) else {
            tracing::debug!(title = %row.title, "skipping meeting with bad timestamps");
            continue;
        };
        let detail = format!("Meeting: {}", row.title);
        match RangeRecord::new(Source::Calendar, row.location, start, end, detail) {
            Some(record) => records.push(record),
            None => tracing::debug!(title = %row.title, "skipping degenerate meeting"),
        }
    }
    Ok(records)
}

/// Reads and deserializes JSONL rows, skipping lines that don't parse.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "evidence file not found");
            return Ok(Vec::new());
        }
        Err(error) => return Err(error.into()),
    };

    let reader = BufReader::new(file);
    let mut rows = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let Ok(line) = line_result else {
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(row) => rows.push(row),
            Err(error) => {
                tracing::debug!(line = line_num + 1, %error, "skipping malformed line");
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn loads_instants_and_skips_bad_lines() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "messages.jsonl",
            concat!(
                r##"{"location":"#dev","timestamp":"2025-06-03T22:00:00-03:00","detail":"msg in #dev: shipping"}"##,
                "\n",
                "not json\n",
                "\n",
                r##"{"location":"#dev","timestamp":"garbage","detail":"lost"}"##,
                "\n",
            ),
        );

        let records = load_instants(&path, Source::Chat, chrono_tz::America::Sao_Paulo).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, Source::Chat);
        assert_eq!(records[0].location, "#dev");
        assert_eq!(records[0].timestamp.format("%H:%M").to_string(), "22:00");
    }

    #[test]
    fn missing_file_contributes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.jsonl");
        assert!(load_instants(&path, Source::Review, chrono_tz::UTC)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn meetings_filter_excluded_titles_and_degenerate_ranges() {
        let temp = TempDir::new().unwrap();
        let path = write_file(
            &temp,
            "meetings.jsonl",
            concat!(
                r#"{"start":"2025-06-03T10:00:00","end":"2025-06-03T11:00:00","title":"planning"}"#,
                "\n",
                r#"{"start":"2025-06-03T12:00:00","end":"2025-06-03T13:00:00","title":" out of office "}"#,
                "\n",
                r#"{"start":"2025-06-03T14:00:00","end":"2025-06-03T14:00:00","title":"zero length"}"#,
                "\n",
            ),
        );

        let excluded = vec!["Out of office".to_string(), "PTO".to_string()];
        let records = load_meetings(&path, chrono_tz::UTC, &excluded).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].detail, "Meeting: planning");
        assert_eq!(records[0].source, Source::Calendar);
    }
}
