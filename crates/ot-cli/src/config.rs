//! Configuration loading and management.
//!
//! One immutable configuration object covers the whole run: the zone,
//! date bounds, evidence source locations, the work schedule, and the
//! engine thresholds. Values layer as defaults, then the platform
//! config file, then an explicit `--config` file, then `OT_*`
//! environment variables.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use ot_core::{EngineConfig, SessionConfig, WindowOfDay, WorkCalendar};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone every evidence timestamp is normalized into.
    pub timezone: String,

    /// Inclusive start of the reporting range; defaults to 90 days
    /// before `until` when unset.
    pub since: Option<NaiveDate>,

    /// Inclusive end of the reporting range; defaults to today in the
    /// configured zone when unset.
    pub until: Option<NaiveDate>,

    /// Author emails identifying the tracked individual. Empty skips
    /// git collection.
    pub emails: Vec<String>,

    /// Root scanned recursively for git repositories. Defaults to the
    /// home directory.
    pub repos_root: Option<PathBuf>,

    /// JSONL exports of pre-fetched evidence, one record per line.
    pub reviews_file: Option<PathBuf>,
    pub meetings_file: Option<PathBuf>,
    pub messages_file: Option<PathBuf>,

    /// Working windows per weekday (Monday first), each "HH:MM-HH:MM".
    pub workweek: Vec<Vec<String>>,

    /// Dates with no working hours.
    pub holidays: Vec<NaiveDate>,
    pub pto_days: Vec<NaiveDate>,

    /// Meeting titles discarded before the engine runs (case-insensitive
    /// exact match).
    pub excluded_meeting_titles: Vec<String>,

    /// Session clustering thresholds (minutes).
    pub session_gap_minutes: i64,
    pub session_pad_before_minutes: i64,
    pub session_pad_after_minutes: i64,

    /// Minimum free working-hours gap counted as a lunch break, and the
    /// penalty added when it is missing (minutes).
    pub lunch_break_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        let workday = vec!["09:00-18:00".to_string()];
        Self {
            timezone: "America/New_York".to_string(),
            since: None,
            until: None,
            emails: Vec::new(),
            repos_root: None,
            reviews_file: None,
            meetings_file: None,
            messages_file: None,
            workweek: vec![
                workday.clone(),
                workday.clone(),
                workday.clone(),
                workday.clone(),
                workday,
                Vec::new(),
                Vec::new(),
            ],
            holidays: Vec::new(),
            pto_days: Vec::new(),
            excluded_meeting_titles: vec![
                "Out of office".to_string(),
                "PTO".to_string(),
                "OOO".to_string(),
            ],
            session_gap_minutes: 45,
            session_pad_before_minutes: 10,
            session_pad_after_minutes: 15,
            lunch_break_minutes: 60,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (OT_*)
        figment = figment.merge(Env::prefixed("OT_"));

        figment.extract()
    }

    /// The configured local zone.
    pub fn local_zone(&self) -> anyhow::Result<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|error| anyhow::anyhow!("invalid timezone {:?}: {error}", self.timezone))
    }

    /// Builds the work calendar from the weekday windows and the
    /// holiday/PTO lists.
    pub fn work_calendar(&self) -> anyhow::Result<WorkCalendar> {
        anyhow::ensure!(
            self.workweek.len() == 7,
            "workweek must list windows for all 7 weekdays (Monday first), got {}",
            self.workweek.len()
        );
        let mut weekday_windows: [Vec<WindowOfDay>; 7] = std::array::from_fn(|_| Vec::new());
        for (weekday, specs) in self.workweek.iter().enumerate() {
            for spec in specs {
                weekday_windows[weekday].push(
                    parse_window(spec)
                        .with_context(|| format!("invalid working window {spec:?}"))?,
                );
            }
        }

        let mut calendar = WorkCalendar::new(weekday_windows, std::collections::BTreeMap::new());
        for &date in &self.holidays {
            calendar.add_exception(date, "holiday");
        }
        for &date in &self.pto_days {
            calendar.add_exception(date, "PTO");
        }
        Ok(calendar)
    }

    /// Engine thresholds from the configured minutes.
    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            session: SessionConfig {
                gap_minutes: self.session_gap_minutes,
                pad_before_minutes: self.session_pad_before_minutes,
                pad_after_minutes: self.session_pad_after_minutes,
            },
            lunch_break_minutes: self.lunch_break_minutes,
            max_notes: 5,
        }
    }
}

/// Parses a "HH:MM-HH:MM" window specification.
fn parse_window(spec: &str) -> anyhow::Result<WindowOfDay> {
    let (start, end) = spec
        .split_once('-')
        .context("expected HH:MM-HH:MM")?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").context("bad start time")?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").context("bad end time")?;
    anyhow::ensure!(end > start, "window end must be after start");
    Ok((start, end))
}

/// Returns the platform-specific config directory for ot.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ot"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_workweek_is_monday_to_friday() {
        let config = Config::default();
        let calendar = config.work_calendar().unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2025, 6, 7).unwrap();
        assert_eq!(calendar.working_windows(monday).len(), 1);
        assert!(calendar.working_windows(saturday).is_empty());
    }

    #[test]
    fn pto_days_become_labeled_exceptions() {
        let mut config = Config::default();
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        config.pto_days.push(date);
        let calendar = config.work_calendar().unwrap();
        assert_eq!(calendar.exception_label(date), Some("PTO"));
        assert!(calendar.working_windows(date).is_empty());
    }

    #[test]
    fn window_spec_parsing() {
        assert_eq!(
            parse_window("09:00-18:00").unwrap(),
            (
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap()
            )
        );
        assert!(parse_window("18:00-09:00").is_err());
        assert!(parse_window("whenever").is_err());
    }

    #[test]
    fn default_timezone_resolves() {
        assert!(Config::default().local_zone().is_ok());
    }

    #[test]
    fn engine_config_mirrors_thresholds() {
        let mut config = Config::default();
        config.session_gap_minutes = 30;
        config.lunch_break_minutes = 45;
        let engine = config.engine_config();
        assert_eq!(engine.session.gap_minutes, 30);
        assert_eq!(engine.lunch_break_minutes, 45);
        assert_eq!(engine.max_notes, 5);
    }
}
