use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

use cachesim::errors::SimulatorError;
use cachesim::CachePolicy;

#[test]
fn cache_policy_rejects_non_power_of_two_cache_size() {
    match CachePolicy::new(100, 64, 1, 1, 1) {
        Err(SimulatorError::InvalidPolicy(_)) => {},
        other => panic!("expected InvalidPolicy, got {:?}", other),
    }
}

#[test]
fn cache_policy_rejects_associativity_not_dividing_block_num() {
    match CachePolicy::new(1024, 64, 3, 1, 1) {
        Err(SimulatorError::InvalidPolicy(_)) => {},
        other => panic!("expected InvalidPolicy, got {:?}", other),
    }
}

#[test]
fn cli_rejects_missing_trace_argument() {
    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.arg("run");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--trace"));
}

#[test]
fn cli_reports_unopenable_trace_file() {
    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.args(["run", "--trace", "/nonexistent/path/to/trace.txt"]);
    cmd.assert().failure();
}

#[test]
fn cli_reports_unknown_trace_operation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "x 0x10").unwrap();

    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.args(["run", "--trace"]).arg(file.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized trace operation"));
}
