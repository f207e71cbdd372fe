use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("agent-digest-{nanos}-{file_name}"))
}

fn isolated_command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_digest_cli"));
    command
        .current_dir(std::env::temp_dir())
        .env("AGENT_DIGEST_DISABLE_NOTES", "1")
        .env("AGENT_DIGEST_CONFIG_PATH", temp_path("absent-config.json"))
        .env("AGENT_DIGEST_ENV_FILE", temp_path("absent-config.env"))
        .env_remove("RELEVANCE_REGION")
        .env_remove("RELEVANCE_PROJECT")
        .env_remove("RELEVANCE_API_KEY")
        .env_remove("SUBURB_AGENT_ID")
        .env_remove("OUTREACH_AGENT_ID")
        .env_remove("AGENT_DIGEST_SNAPSHOT_PATH")
        .env_remove("RUST_LOG");
    command
}

#[test]
fn missing_snapshot_prints_error_report() {
    let output = isolated_command()
        .env("AGENT_DIGEST_SNAPSHOT_PATH", temp_path("missing-snapshot.json"))
        .env("SUBURB_AGENT_ID", "suburb-agent")
        .env("OUTREACH_AGENT_ID", "outreach-agent")
        .output()
        .expect("failed to run digest");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("ANALYTICS ERROR\nTimestamp: "));
    assert!(stdout.contains("Error: "));
    assert!(stdout.contains("missing-snapshot.json"));
    assert!(stdout.trim_end().ends_with(&"=".repeat(40)));
    assert!(!stdout.contains("Daily Report"));
}

#[test]
fn missing_credentials_prints_error_report() {
    let output = isolated_command()
        .output()
        .expect("failed to run digest");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("ANALYTICS ERROR"));
    assert!(stdout.contains("missing configuration"));
    assert!(stdout.contains("api_key"));
}

#[test]
fn malformed_config_override_is_rejected() {
    let output = isolated_command()
        .args(["--config-override", "no-equals-sign"])
        .output()
        .expect("failed to run digest");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - override must be in KEY=VALUE format"));
}

#[test]
fn unknown_config_override_key_is_rejected() {
    let output = isolated_command()
        .args(["--config-override", "colour=blue"])
        .output()
        .expect("failed to run digest");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown config field 'colour'"));
}
