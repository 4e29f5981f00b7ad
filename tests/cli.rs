use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &Path, api_url: &str, scan_url: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = format!(
        "api_url: {api_url}\nscanner_url: {scan_url}\nresults_url: {scan_url}\nauth_token: test-token\nrequest:\n  retry_attempts: 0\n  timeout_ms: 5000\nscan:\n  max_attempts: 5\n  interval_ms: 10\n"
    );
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn cybrty() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cybrty"));
    for var in [
        "CYBRTY_CONFIG",
        "CYBRTY_FORMAT",
        "CYBRTY_API_URL",
        "CYBRTY_SCANNER_URL",
        "CYBRTY_RESULTS_URL",
        "CYBRTY_TOKEN",
        "CYBRTY_NO_CACHE",
        "CYBRTY_DEBUG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn version_prints_package_version() {
    cybrty()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completion_generates_script() {
    cybrty()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cybrty"));
}

#[test]
fn status_without_config_points_to_init() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let missing = temp.path().join("absent.yaml");

    cybrty()
        .arg("status")
        .arg("--config")
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains("cybrty init"));

    Ok(())
}

#[test]
fn commands_fail_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let missing = temp.path().join("absent.yaml");

    cybrty()
        .args(["incident", "list", "--config"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));

    Ok(())
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    // Nothing listens on the discard port, so both probes fail fast
    let config_path = write_config(temp.path(), "http://127.0.0.1:9/api", "http://127.0.0.1:9");

    let assert = cybrty()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("Session token configured"));
    assert!(stdout.contains("unreachable"));

    Ok(())
}

#[test]
fn invalid_url_override_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:9/api", "http://127.0.0.1:9");

    cybrty()
        .args(["scan", "status", "S1", "--config"])
        .arg(&config_path)
        .env("CYBRTY_SCANNER_URL", "scanner.internal")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must start with http"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn incident_list_renders_table() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let api_url = format!("{}/api", server.url());

    let incidents = server
        .mock("GET", "/api/incidents")
        .match_query(mockito::Matcher::UrlEncoded(
            "severity".into(),
            "high".into(),
        ))
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "data": [
                    { "id": "INC-7", "title": "Phishing campaign", "severity": "high", "status": "open" }
                ],
                "total": 1,
                "page": 1,
                "limit": 20,
                "total_pages": 1
            }"#,
        )
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &api_url, "http://127.0.0.1:9");

    let assert = cybrty()
        .args(["incident", "list", "--severity", "high", "--format", "table", "--config"])
        .arg(&config_path)
        .assert()
        .success();

    incidents.assert();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("INC-7"));
    assert!(stdout.contains("Phishing campaign"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn scan_launch_runs_to_completion() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok"}"#)
        .create();
    let launch = server
        .mock("POST", "/api/v1/scans/launch")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "scanType": "penetration_test",
            "target": { "targets": ["app.example"], "depth": "quick" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"scan_id": "S1", "status": "initiated"}"#)
        .expect(1)
        .create();
    let _status = server
        .mock("GET", "/api/v1/scans/S1/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "completed"}"#)
        .create();
    let results = server
        .mock("GET", "/api/v1/results/S1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "scan_id": "S1",
                "status": "completed",
                "results": {
                    "vulnerabilities": [],
                    "summary": {
                        "total_vulnerabilities": 0,
                        "by_severity": {},
                        "scan_duration": "12m",
                        "coverage": "100%"
                    }
                }
            }"#,
        )
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:9/api", &server.url());

    let assert = cybrty()
        .args([
            "scan",
            "launch",
            "app.example",
            "--depth",
            "quick",
            "--format",
            "json",
            "--config",
        ])
        .arg(&config_path)
        .assert()
        .success();

    launch.assert();
    results.assert();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let output: serde_json::Value = serde_json::from_str(&stdout)?;
    assert_eq!(output["data"]["scan_id"], "S1");
    assert_eq!(output["data"]["results"]["summary"]["coverage"], "100%");

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn scan_cancel_reports_rejection() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _cancel = server
        .mock("POST", "/api/v1/scans/S1/cancel")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "scan already finished"}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:9/api", &server.url());

    cybrty()
        .args(["scan", "cancel", "S1", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not accept cancellation"));

    Ok(())
}
