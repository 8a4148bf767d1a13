use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn parse_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is a JSON object"))
        .collect()
}

fn amount_of(view: &Value) -> Decimal {
    view["amount"].as_str().unwrap().parse().unwrap()
}

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg("tests/fixtures/instructions.csv");

    let output = cmd.assert().success().get_output().stdout.clone();
    let views = parse_lines(&output);
    assert_eq!(views.len(), 3);

    assert_eq!(views[0]["type"], "deposit");
    assert_eq!(views[0]["gateway"], "gateway_a");
    assert_eq!(views[0]["status"], "completed");
    assert_eq!(amount_of(&views[0]), dec!(100.0));
    assert_eq!(views[0]["supplement"]["xml_response"], "i am xml response");

    assert_eq!(views[1]["type"], "withdrawal");
    assert_eq!(views[1]["gateway"], "gateway_b");
    assert_eq!(views[1]["status"], "failed");
    assert_eq!(amount_of(&views[1]), dec!(50.0));

    assert_eq!(views[2]["status"], "pending");
    assert_eq!(amount_of(&views[2]), dec!(1.5));

    Ok(())
}

#[test]
fn test_unknown_gateway_row_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type, gateway, amount, outcome").unwrap();
    writeln!(file, "deposit, gateway_z, 10.0, completed").unwrap();
    writeln!(file, "deposit, gateway_a, 10.0, completed").unwrap();

    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg(file.path());

    let assert = cmd.assert().success().stderr(predicate::str::contains(
        "Error processing payment: unknown gateway: gateway_z",
    ));
    let views = parse_lines(&assert.get_output().stdout);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["gateway"], "gateway_a");
}

#[test]
fn test_config_file_gateways() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(
        config,
        r#"{{
            "gateways": [
                {{"name": "gateway_c", "callback_format": "xml", "enrichment": "wire_echo"}},
                {{"name": "gateway_d", "callback_format": "json", "failure": "decline"}}
            ]
        }}"#
    )
    .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type, gateway, amount, outcome").unwrap();
    writeln!(file, "deposit, gateway_c, 12.0, completed").unwrap();
    writeln!(file, "withdrawal, gateway_d, 3.0, completed").unwrap();
    writeln!(file, "deposit, gateway_a, 1.0, ").unwrap();

    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg(file.path()).arg("--config").arg(config.path());

    let assert = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("gateway gateway_d failed: declined"))
        .stderr(predicate::str::contains("unknown gateway: gateway_a"));

    let views = parse_lines(&assert.get_output().stdout);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["status"], "completed");
    assert_eq!(views[0]["supplement"]["wire_format"], "xml");
    assert!(
        views[0]["supplement"]["echo"]
            .as_str()
            .unwrap()
            .contains("<status>completed</status>")
    );
}

#[test]
fn test_gateway_timeout_flag() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(
        config,
        r#"{{"gateways": [{{"name": "gateway_slow", "callback_format": "json", "latency_ms": 2000}}]}}"#
    )
    .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type, gateway, amount, outcome").unwrap();
    writeln!(file, "deposit, gateway_slow, 10.0, ").unwrap();

    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg(file.path())
        .arg("--config")
        .arg(config.path())
        .arg("--gateway-timeout-ms")
        .arg("50");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("deadline of 50ms exceeded"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_failed_merge_is_reported_per_row() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(
        config,
        r#"{{
            "gateways": [
                {{"name": "gateway_a", "callback_format": "json"}},
                {{"name": "gateway_slow", "callback_format": "json", "enrichment_latency_ms": 2000}}
            ],
            "enrichment_timeout_ms": 50
        }}"#
    )
    .unwrap();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "type, gateway, amount, outcome").unwrap();
    writeln!(file, "deposit, gateway_slow, 10.0, completed").unwrap();
    writeln!(file, "deposit, gateway_a, 20.0, completed").unwrap();

    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg(file.path()).arg("--config").arg(config.path());

    let assert = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("Error merging transaction: merge failed"));
    let views = parse_lines(&assert.get_output().stdout);
    assert_eq!(views.len(), 1);
    assert_eq!(views[0]["gateway"], "gateway_a");
    assert_eq!(views[0]["status"], "completed");
}

#[test]
fn test_invalid_config_file() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, r#"{{"gateways": []}}"#).unwrap();

    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg("tests/fixtures/instructions.csv")
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("at least one gateway"));
}

#[test]
fn test_missing_input_file() {
    let mut cmd = Command::new(cargo_bin!("payroute"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}
