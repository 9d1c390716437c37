use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "opencity-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_scenarios_writes_output() {
    let exe = env!("CARGO_BIN_EXE_opencity-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-scenarios", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available scenarios"));
    assert!(content.contains("determinism"));
}

#[test]
fn cli_runs_smoke_with_json_report() {
    let exe = env!("CARGO_BIN_EXE_opencity-tester");
    let output_path = temp_path("run");
    let output = Command::new(exe)
        .args([
            "--report",
            "json",
            "--scenarios",
            "smoke,determinism",
            "--iterations",
            "1",
            "--seeds",
            "1,-2",
            "--max-turns",
            "30",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("OpenCity Automated Tester"));

    let content = std::fs::read_to_string(output_path).expect("read report");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    let results = report.as_array().expect("array of results");
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["passed"] == true));
    assert!(results.iter().any(|r| r["seed"] == 2));
}

#[test]
fn cli_rejects_bad_seed_tokens() {
    let exe = env!("CARGO_BIN_EXE_opencity-tester");
    let output = Command::new(exe)
        .args(["--seeds", "banana", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unrecognized seed token"));
}

#[test]
fn cli_applies_session_config() {
    let exe = env!("CARGO_BIN_EXE_opencity-tester");
    let config_path = temp_path("config.json");
    std::fs::write(&config_path, r#"{"initial_cash": 0, "start_location": "harbor_pier"}"#)
        .expect("write config");
    let output = Command::new(exe)
        .args(["--scenarios", "invariants", "--iterations", "2", "--max-turns", "50"])
        .arg("--config")
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
}

#[test]
fn cli_fails_on_missing_config() {
    let exe = env!("CARGO_BIN_EXE_opencity-tester");
    let output = Command::new(exe)
        .args(["--config", "/nonexistent/opencity-config.json"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
