//! Implementation of the `ot report` command.
//!
//! Collects evidence from every configured source, runs the overtime
//! engine, and writes a row-level evidence CSV plus a daily summary
//! (CSV, or JSON on stdout with `--json`).

use std::fs;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use ot_core::{DailySummary, EvidenceSet, Source, compute_overtime};
use ot_sources::{GitConfig, collect_commits, load_instants, load_meetings};

use crate::Config;

/// Runs the report: collect, compute, write.
pub fn run(
    config: &Config,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    json: bool,
    out_dir: &Path,
) -> Result<()> {
    let tz = config.local_zone()?;
    let until = until
        .or(config.until)
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let since = since.or(config.since).unwrap_or(until - Duration::days(90));
    anyhow::ensure!(since <= until, "since ({since}) must not be after until ({until})");
    tracing::debug!(%since, %until, zone = %tz, "reporting range resolved");

    let calendar = config.work_calendar()?;
    let evidence = collect_evidence(config, tz, since, until)?;
    tracing::info!(records = evidence.len(), "evidence collected");

    let summary = compute_overtime(&evidence, &calendar, &config.engine_config());

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let evidence_path = out_dir.join("evidence.csv");
    write_evidence_csv(&evidence_path, &evidence)
        .with_context(|| format!("failed to write {}", evidence_path.display()))?;

    if json {
        let out = stdout();
        let mut writer = out.lock();
        serde_json::to_writer_pretty(&mut writer, &summary)
            .context("failed to serialize summary")?;
        writeln!(writer)?;
    } else {
        let summary_path = out_dir.join("summary.csv");
        write_summary_csv(&summary_path, &summary)
            .with_context(|| format!("failed to write {}", summary_path.display()))?;

        let total_minutes: i64 = summary.values().map(|day| day.minutes).sum();
        println!(
            "{} evidence record(s), {} day(s), {} estimated extra -> {}",
            evidence.len(),
            summary.len(),
            format_hours(total_minutes),
            out_dir.display()
        );
    }

    Ok(())
}

/// Gathers all configured sources into one evidence set, bounded to the
/// reporting range.
fn collect_evidence(
    config: &Config,
    tz: Tz,
    since: NaiveDate,
    until: NaiveDate,
) -> Result<EvidenceSet> {
    let mut evidence = EvidenceSet::default();

    if let Some(repos_root) = config.repos_root.clone().or_else(dirs::home_dir) {
        let git = GitConfig {
            repos_root,
            emails: config.emails.clone(),
            since,
            until,
        };
        evidence.commits = collect_commits(&git, tz).context("failed to collect git commits")?;
    }

    if let Some(path) = &config.reviews_file {
        evidence.reviews = load_instants(path, Source::Review, tz)
            .with_context(|| format!("failed to load reviews from {}", path.display()))?;
    }
    if let Some(path) = &config.meetings_file {
        evidence.meetings = load_meetings(path, tz, &config.excluded_meeting_titles)
            .with_context(|| format!("failed to load meetings from {}", path.display()))?;
    }
    if let Some(path) = &config.messages_file {
        evidence.messages = load_instants(path, Source::Chat, tz)
            .with_context(|| format!("failed to load messages from {}", path.display()))?;
    }

    // File-loaded evidence may cover more than the reporting range.
    let in_range = |date: NaiveDate| date >= since && date <= until;
    evidence.reviews.retain(|r| in_range(r.timestamp.date()));
    evidence.messages.retain(|r| in_range(r.timestamp.date()));
    evidence
        .meetings
        .retain(|m| m.start().date() <= until && m.end().date() >= since);

    Ok(evidence)
}

/// Writes the row-level evidence export, oldest first.
fn write_evidence_csv(path: &Path, evidence: &EvidenceSet) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "date,time,weekday,source,location,detail")?;
    for row in evidence.chronological() {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            row.timestamp.date(),
            row.timestamp.format("%H:%M:%S"),
            row.timestamp.date().format("%a"),
            row.source,
            csv_field(row.location),
            csv_field(row.detail),
        )?;
    }
    Ok(())
}

/// Writes the per-day summary, dates ascending.
fn write_summary_csv(
    path: &Path,
    summary: &std::collections::BTreeMap<NaiveDate, DailySummary>,
) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "date,weekday,hours_extra_estimated,examples")?;
    for (date, day) in summary {
        writeln!(
            writer,
            "{},{},{},{}",
            date,
            date.format("%a"),
            format_fractional_hours(day.minutes),
            csv_field(&day.notes.join("; ")),
        )?;
    }
    Ok(())
}

/// Minutes as decimal hours with two places, e.g. `0.42`.
#[allow(
    clippy::cast_precision_loss,
    reason = "minute totals are far below f64's integer precision"
)]
fn format_fractional_hours(minutes: i64) -> String {
    format!("{:.2}", minutes as f64 / 60.0)
}

/// Minutes as "Xh Ym" for the stdout summary line.
fn format_hours(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Quotes a CSV field when needed (RFC 4180 style).
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_field_quotes_only_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn fractional_hours_round_to_two_places() {
        assert_eq!(format_fractional_hours(25), "0.42");
        assert_eq!(format_fractional_hours(0), "0.00");
        assert_eq!(format_fractional_hours(90), "1.50");
    }

    #[test]
    fn hours_formatting() {
        assert_eq!(format_hours(45), "45m");
        assert_eq!(format_hours(60), "1h 0m");
        assert_eq!(format_hours(135), "2h 15m");
    }

    #[test]
    fn weekday_column_uses_short_names() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(date.format("%a").to_string(), "Tue");
    }
}
