use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn txalert(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("txalert").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

fn init_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.json");
    txalert(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    path
}

#[test]
fn classify_prints_wire_record() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    let output = txalert(&config)
        .args([
            "classify",
            "--source",
            "com.chase.sig.android",
            "--title",
            "Transaction Alert",
            "--text",
            "You spent $12.50 at Starbucks",
            "--now",
            "1700000000000",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["amount"].as_f64(), Some(12.5));
    assert_eq!(record["vendor"], "Starbucks");
    assert_eq!(record["source_app"], "com.chase.sig.android");
    assert_eq!(record["timestamp"].as_i64(), Some(1_700_000_000_000));
}

#[test]
fn classify_reports_rejection_on_stderr() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    txalert(&config)
        .args(["classify", "--source", "com.unknown.app", "--text", "You spent $12.50"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not allowlisted"));
}

#[test]
fn classify_text_format() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    txalert(&config)
        .args([
            "classify",
            "--source",
            "com.venmo",
            "--text",
            "You paid $1,204.00 to Oak Street Rentals",
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amount: $1,204.00"))
        .stdout(predicate::str::contains("Vendor: Oak Street Rentals"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();

    txalert(&dir.path().join("absent.json"))
        .args(["classify", "--source", "com.venmo", "--text", "paid $1.00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn watch_relays_stream_in_order() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    let input = [
        r#"{"source_app":"com.venmo","short_body":"You paid $4.00 to Joe's Pizza"}"#,
        r#"{"source_app":"com.example.game","short_body":"You spent $9.99 on gems"}"#,
        r#"{"source_app":"com.squareup.cash","short_body":"You received $20.00 from Dana Lee"}"#,
    ]
    .join("\n");

    let output = txalert(&config)
        .arg("watch")
        .write_stdin(input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let vendors: Vec<String> = stdout
        .lines()
        .map(|l| {
            let v: serde_json::Value = serde_json::from_str(l).unwrap();
            v["vendor"].as_str().unwrap().to_string()
        })
        .collect();

    assert_eq!(vendors, vec!["Joe's Pizza", "Dana Lee"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Relayed 2 of 3"));
}

#[test]
fn batch_writes_records_and_summary() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    let events = dir.path().join("march.jsonl");
    fs::write(
        &events,
        concat!(
            r#"{"source_app":"com.chase.sig.android","title":"Purchase","short_body":"$18.40 at Corner Market for groceries"}"#,
            "\n",
            r#"{"source_app":"com.chase.sig.android","title":"Offer","short_body":"Get 5% back"}"#,
            "\n",
        ),
    )
    .unwrap();
    let out_dir = dir.path().join("out");

    txalert(&config)
        .args(["batch"])
        .arg(dir.path().join("*.jsonl").to_str().unwrap())
        .arg("--output-dir")
        .arg(&out_dir)
        .arg("--summary")
        .assert()
        .success();

    let records = fs::read_to_string(out_dir.join("march.records.jsonl")).unwrap();
    assert_eq!(records.lines().count(), 1);
    assert!(records.contains("\"vendor\":\"Corner Market\""));

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert!(summary.starts_with("file,received,relayed"));
    assert!(summary.contains(",2,1,"));
}

#[test]
fn sources_add_remove_and_check() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    txalert(&config)
        .args(["sources", "add", "ca.td.mobile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 app(s)"));

    txalert(&config)
        .args(["sources", "check", "ca.td.mobile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is monitored"));

    txalert(&config)
        .args(["sources", "remove", "com.venmo"])
        .assert()
        .success();

    txalert(&config)
        .args(["sources", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ca.td.mobile"))
        .stdout(predicate::str::contains("com.venmo").not());
}

#[test]
fn config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = init_config(&dir);

    txalert(&config)
        .args(["config", "set", "classifier.match_policy", "first_valid"])
        .assert()
        .success();

    txalert(&config)
        .args(["config", "get", "classifier.match_policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"first_valid\""));

    txalert(&config)
        .args(["config", "set", "classifier.no_such_key", "1"])
        .assert()
        .failure();
}
