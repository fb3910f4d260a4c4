use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn run_replays_a_trace_and_prints_the_statistics_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "r 0x0").unwrap();
    writeln!(file, "r 0x0").unwrap();
    writeln!(file, "w 0x40").unwrap();

    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.args(["run", "--trace"])
        .arg(file.path())
        .args(["--l1-size", "64", "--l1-assoc", "1", "--l1-block", "64"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("L1 Cache:"))
        .stdout(predicate::str::contains("LOWER CACHE"));
}

#[test]
fn run_with_no_prefetch_still_produces_a_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "r 0x0").unwrap();

    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.args(["run", "--trace"])
        .arg(file.path())
        .arg("--no-prefetch");

    cmd.assert().success();
}

#[test]
fn run_loads_a_hierarchy_from_a_config_file() {
    let mut trace_file = tempfile::NamedTempFile::new().unwrap();
    writeln!(trace_file, "r 0x0").unwrap();

    let mut config_file = tempfile::NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"{{
            "levels": [
                {{ "cache_size": 64, "block_size": 64, "associativity": 1, "hit_latency": 1, "miss_latency": 1 }}
            ],
            "write_back": true,
            "write_allocate": true,
            "full_block_fill": false
        }}"#
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.args(["run", "--trace"])
        .arg(trace_file.path())
        .args(["--config"])
        .arg(config_file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("L1 Cache:"))
        .stdout(predicate::str::contains("LOWER CACHE").not());
}

#[test]
fn run_rejects_an_invalid_cache_geometry() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "r 0x0").unwrap();

    let mut cmd = Command::cargo_bin("cachesim").unwrap();
    cmd.args(["run", "--trace"])
        .arg(file.path())
        .args(["--l1-size", "100"]); // not a power of two

    cmd.assert().failure();
}
