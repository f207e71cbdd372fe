use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("agent-digest-{nanos}-{file_name}"))
}

fn ago(age: Duration) -> String {
    (OffsetDateTime::now_utc() - age).format(&Rfc3339).unwrap()
}

fn task(id: &str, age: Duration, state: &str, has_errored: Option<bool>) -> serde_json::Value {
    serde_json::json!({
        "knowledge_set": id,
        "metadata": {
            "insert_date": ago(age),
            "conversation": {
                "state": state,
                "has_errored": has_errored,
                "title": format!("Task {id}")
            }
        }
    })
}

fn action(title: &str) -> serde_json::Value {
    serde_json::json!({ "message": { "chain_config": { "title": title } } })
}

fn write_snapshot(path: &Path) {
    let mut errored = task("o2", Duration::hours(3), "errored-pending-approval", Some(true));
    errored["metadata"]["conversation"]["title"] = "Harbour Florist".into();

    let content = serde_json::json!({
        "schema_version": 1,
        "agents": {
            "suburb-agent": [
                task("s1", Duration::minutes(30), "completed", Some(false)),
                task("s2", Duration::hours(5), "idle", None),
                task("s-old", Duration::hours(40), "completed", Some(true))
            ],
            "outreach-agent": [
                task("o1", Duration::hours(2), "completed", None),
                errored,
                task("o3", Duration::minutes(10), "running", None)
            ]
        },
        "transcripts": {
            "o1": [
                action("Send Outlook email"),
                action("Send Outlook email"),
                action("Call Business via Bland AI"),
                { "message": { "role": "assistant" } }
            ],
            "o3": [ action("Send Outlook Email") ]
        }
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn digest_command(snapshot: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_digest_cli"));
    command
        .current_dir(std::env::temp_dir())
        .env("AGENT_DIGEST_SNAPSHOT_PATH", snapshot)
        .env("SUBURB_AGENT_ID", "suburb-agent")
        .env("OUTREACH_AGENT_ID", "outreach-agent")
        .env("AGENT_DIGEST_DISABLE_NOTES", "1")
        .env("AGENT_DIGEST_CONFIG_PATH", temp_path("absent-config.json"))
        .env("AGENT_DIGEST_ENV_FILE", temp_path("absent-config.env"))
        .env_remove("AGENT_DIGEST_MAX_RESULTS")
        .env_remove("AGENT_DIGEST_DEFAULT_HOURS")
        .env_remove("RUST_LOG");
    command
}

#[test]
fn default_run_prints_notes_report() {
    let snapshot = temp_path("snapshot-notes.json");
    write_snapshot(&snapshot);

    let output = digest_command(&snapshot)
        .output()
        .expect("failed to run digest");

    std::fs::remove_file(&snapshot).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("📊 Daily Report - "));
    assert!(stdout.contains("🏢 Suburbs: 2 processed (100% success)"));
    assert!(stdout.contains("🏪 Businesses: 2 processed (67% success)"));
    assert!(stdout.contains("📧 Communications: 2 emails, 1 calls"));
    assert!(stdout.contains("⚠️ Errors: 1 total (0 Suburbs, 1 Businesses)"));
    assert!(stdout.contains("🏃 Currently running: 1 tasks"));
    assert!(stdout.contains("   1. Harbour Florist"));
}

#[test]
fn hours_argument_narrows_the_window() {
    let snapshot = temp_path("snapshot-hours.json");
    write_snapshot(&snapshot);

    let output = digest_command(&snapshot)
        .args(["1", "--json"])
        .output()
        .expect("failed to run digest");

    std::fs::remove_file(&snapshot).ok();
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed["hours"], 1);
    assert_eq!(parsed["suburbs"]["total_tasks"], 1);
    assert_eq!(parsed["outreach"]["total_tasks"], 1);
    assert_eq!(parsed["outreach"]["running_tasks"], 1);
    assert_eq!(parsed["emails"]["target_action_count"], 0);
    assert_eq!(parsed["emails"]["total_conversations_checked"], 1);
}

#[test]
fn invalid_hours_warns_and_uses_default() {
    let snapshot = temp_path("snapshot-bad-hours.json");
    write_snapshot(&snapshot);

    let output = digest_command(&snapshot)
        .args(["abc", "--json"])
        .output()
        .expect("failed to run digest");

    std::fs::remove_file(&snapshot).ok();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid hours value: abc, using default 24"));
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(parsed["hours"], 24);
    assert_eq!(parsed["summary"]["emails"]["total_actions"], 2);
    assert_eq!(parsed["summary"]["emails"]["average"]["value"], 2.0);
    assert_eq!(parsed["summary"]["calls"]["conversations_with_action"], 1);
}

#[test]
fn detailed_run_prints_breakdowns() {
    let snapshot = temp_path("snapshot-detailed.json");
    write_snapshot(&snapshot);

    let output = digest_command(&snapshot)
        .arg("--detailed")
        .output()
        .expect("failed to run digest");

    std::fs::remove_file(&snapshot).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SUBURBS TASK SUCCESS AND ERROR ANALYSIS - LAST 24 HOURS"));
    assert!(stdout.contains("Task states breakdown:"));
    assert!(stdout.contains("24-HOUR SUMMARY METRICS"));
    assert!(stdout.contains("Average emails per conversation: 2.0"));
}

#[test]
fn config_override_renames_agents() {
    let snapshot = temp_path("snapshot-override.json");
    write_snapshot(&snapshot);

    let output = digest_command(&snapshot)
        .args(["--config-override", "suburb_agent_name=Discovery"])
        .output()
        .expect("failed to run digest");

    std::fs::remove_file(&snapshot).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("🏢 Discovery: 2 processed (100% success)"));
}
