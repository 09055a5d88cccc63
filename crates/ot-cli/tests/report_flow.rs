//! End-to-end tests for the report flow: config + evidence files in,
//! CSV/JSON out.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn ot_binary() -> String {
    env!("CARGO_BIN_EXE_ot").to_string()
}

/// Writes a config plus JSONL fixtures into `temp` and returns the
/// config path. Git collection stays disabled (no emails configured).
fn write_fixtures(temp: &TempDir) -> std::path::PathBuf {
    let meetings = temp.path().join("meetings.jsonl");
    fs::write(
        &meetings,
        concat!(
            r#"{"location":"cal","start":"2025-06-04T10:00:00","end":"2025-06-04T11:00:00","title":"planning"}"#,
            "\n",
            r#"{"location":"cal","start":"2025-06-04T13:00:00","end":"2025-06-04T14:00:00","title":"Out of office"}"#,
            "\n",
        ),
    )
    .unwrap();

    let messages = temp.path().join("messages.jsonl");
    fs::write(
        &messages,
        concat!(
            r#"{"location":"dev","timestamp":"2025-06-03T22:00:00","detail":"msg in dev: shipping"}"#,
            "\n",
        ),
    )
    .unwrap();

    let config = temp.path().join("config.toml");
    fs::write(
        &config,
        format!(
            r#"
timezone = "UTC"
since = "2025-06-01"
until = "2025-06-30"
meetings_file = "{}"
messages_file = "{}"
"#,
            meetings.display(),
            messages.display()
        ),
    )
    .unwrap();
    config
}

fn run_report(temp: &TempDir, extra_args: &[&str]) -> std::process::Output {
    let config = write_fixtures(temp);
    let out_dir = temp.path().join("out");
    Command::new(ot_binary())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path())
        .arg("--config")
        .arg(&config)
        .arg("report")
        .arg("--out-dir")
        .arg(&out_dir)
        .args(extra_args)
        .output()
        .expect("failed to run ot report")
}

#[test]
fn report_writes_evidence_and_summary_csv() {
    let temp = TempDir::new().unwrap();
    let output = run_report(&temp, &[]);
    assert!(
        output.status.success(),
        "ot report should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let evidence = fs::read_to_string(temp.path().join("out/evidence.csv")).unwrap();
    let lines: Vec<&str> = evidence.lines().collect();
    assert_eq!(lines[0], "date,time,weekday,source,location,detail");
    // One chat message and one meeting; the excluded title never lands.
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2025-06-03,22:00:00,Tue,chat,dev,"));
    assert!(lines[2].starts_with("2025-06-04,10:00:00,Wed,calendar,cal,"));
    assert!(!evidence.contains("Out of office"));

    let summary = fs::read_to_string(temp.path().join("out/summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "date,weekday,hours_extra_estimated,examples");
    // Padded session 21:50-22:15 -> 25 outside minutes -> 0.42h.
    assert!(lines[1].starts_with("2025-06-03,Tue,0.42,"));
    // The in-hours meeting contributes a day with notes but no minutes.
    assert!(lines[2].starts_with("2025-06-04,Wed,0.00,"));
    assert!(lines[2].contains("Meeting: planning"));
}

#[test]
fn report_json_prints_summary_map() {
    let temp = TempDir::new().unwrap();
    let output = run_report(&temp, &["--json"]);
    assert!(
        output.status.success(),
        "ot report --json should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["2025-06-03"]["minutes"], 25);
    assert_eq!(parsed["2025-06-04"]["minutes"], 0);
    let notes = parsed["2025-06-03"]["notes"].as_array().unwrap();
    assert_eq!(notes[0], "[chat] msg in dev: shipping");

    // The evidence CSV is still written in JSON mode.
    assert!(temp.path().join("out/evidence.csv").exists());
}
