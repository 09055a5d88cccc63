//! Git commit evidence collector.
//!
//! Walks a root directory for git repositories, shells out to
//! `git log`, and keeps commits authored by the tracked individual.
//! A repository whose log cannot be read is skipped with a debug log;
//! this collector never fails the run over one bad repo.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use chrono::NaiveDate;
use chrono_tz::Tz;
use regex::Regex;
use thiserror::Error;

use ot_core::{InstantRecord, Source, timestamp};

/// Commit subjects that are noise, not evidence of work at that instant.
static NOISE_SUBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(merge pull request|dependabot|bump version|chore:?)\b").unwrap()
});

#[derive(Debug, Error)]
pub enum GitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where and what to collect.
#[derive(Debug, Clone)]
pub struct GitConfig {
    /// Directory scanned recursively for repositories.
    pub repos_root: PathBuf,

    /// Author emails that identify the tracked individual.
    /// Compared case-insensitively. Empty means: skip git entirely.
    pub emails: Vec<String>,

    /// Inclusive date bounds on commit timestamps (local dates).
    pub since: NaiveDate,
    pub until: NaiveDate,
}

/// Collects matching commits under the configured root as instant
/// evidence, timestamps normalized to `tz`.
pub fn collect_commits(config: &GitConfig, tz: Tz) -> Result<Vec<InstantRecord>, GitError> {
    if config.emails.is_empty() {
        tracing::info!("no author emails configured; skipping git commits");
        return Ok(Vec::new());
    }
    let emails: HashSet<String> = config
        .emails
        .iter()
        .map(|email| email.trim().to_lowercase())
        .collect();

    let mut records = Vec::new();
    for repo in find_repositories(&config.repos_root)? {
        let log = match log_output(&repo, config) {
            Ok(log) => log,
            Err(error) => {
                tracing::debug!(repo = %repo.display(), %error, "skipping repository");
                continue;
            }
        };
        let location = repo
            .strip_prefix(&config.repos_root)
            .unwrap_or(&repo)
            .display()
            .to_string();
        records.extend(parse_log(&log, &location, &emails, config, tz));
    }
    tracing::debug!(commits = records.len(), "git collection complete");
    Ok(records)
}

/// Finds directories containing `.git` under `root`, without descending
/// into repositories already found.
fn find_repositories(root: &Path) -> Result<Vec<PathBuf>, GitError> {
    let mut repos = Vec::new();
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "repos root is not a directory");
        return Ok(repos);
    }
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        if dir.join(".git").exists() {
            repos.push(dir);
            continue;
        }
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::debug!(dir = %dir.display(), %error, "unreadable directory");
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            // Non-following metadata: don't chase symlink cycles.
            if path.symlink_metadata().is_ok_and(|meta| meta.is_dir()) {
                pending.push(path);
            }
        }
    }
    repos.sort_unstable();
    Ok(repos)
}

/// Runs `git log` for one repository and returns its stdout.
fn log_output(repo: &Path, config: &GitConfig) -> std::io::Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .arg("log")
        .arg(format!("--since={}", config.since))
        .arg(format!("--until={}", config.until))
        .arg("--no-merges")
        .arg("--pretty=format:%H|%an|%ae|%cI|%s")
        .output()?;
    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "git log exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parses pretty-format log lines into records, applying the author,
/// noise-subject, and date-bound filters.
fn parse_log(
    log: &str,
    location: &str,
    emails: &HashSet<String>,
    config: &GitConfig,
    tz: Tz,
) -> Vec<InstantRecord> {
    let mut records = Vec::new();
    for line in log.lines() {
        let mut fields = line.splitn(5, '|');
        let (Some(sha), Some(_author), Some(email), Some(committed), Some(subject)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            continue;
        };
        if !emails.contains(&email.to_lowercase()) {
            continue;
        }
        if NOISE_SUBJECT_RE.is_match(subject) {
            continue;
        }
        let timestamp = match timestamp::parse_local(committed, tz) {
            Ok(timestamp) => timestamp,
            Err(error) => {
                tracing::debug!(%sha, %error, "skipping commit with bad timestamp");
                continue;
            }
        };
        if timestamp.date() < config.since || timestamp.date() > config.until {
            continue;
        }
        let short_sha = sha.get(..7).unwrap_or(sha);
        records.push(InstantRecord {
            source: Source::Git,
            location: location.to_string(),
            timestamp,
            detail: format!("commit {short_sha}: {subject}"),
        });
    }
    records
}
