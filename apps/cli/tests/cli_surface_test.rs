//! CLI surface tests: argument parsing and configuration resolution.
//!
//! Nothing here touches the network; commands that would are only exercised
//! through their failure paths (missing configuration).

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

/// A command with all `HEIRLOOM_*` ambient configuration stripped.
fn heirloom() -> Command {
    let mut cmd = Command::cargo_bin("heirloom").unwrap();
    for var in [
        "HEIRLOOM_CONTRACT_ADDRESS",
        "HEIRLOOM_INDEXER_URI",
        "HEIRLOOM_INDEXER_WS_URI",
        "HEIRLOOM_WALLET_URI",
        "HEIRLOOM_PROOF_ARTIFACTS",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    heirloom()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("execute"))
        .stdout(predicate::str::contains("inheritance contract"));
}

#[test]
fn test_config_requires_contract_address() {
    heirloom()
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("contract_address"));
}

#[test]
fn test_config_prints_resolved_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "contract_address = '0200cafe'").unwrap();
    writeln!(file, "indexer_uri = 'http://indexer.test:9000/query'").unwrap();

    heirloom()
        .arg("-C")
        .arg(file.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("contract_address = \"0200cafe\""))
        .stdout(predicate::str::contains("http://indexer.test:9000/query"));
}

#[test]
fn test_env_override_wins_over_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "contract_address = '0200cafe'").unwrap();

    heirloom()
        .arg("-C")
        .arg(file.path())
        .arg("config")
        .env("HEIRLOOM_CONTRACT_ADDRESS", "0200beef")
        .assert()
        .success()
        .stdout(predicate::str::contains("0200beef"));
}

#[test]
fn test_missing_config_file_fails() {
    heirloom()
        .arg("-C")
        .arg("/nonexistent/heirloom.toml")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("read config"));
}

#[test]
fn test_register_requires_both_addresses() {
    heirloom()
        .arg("register")
        .arg("--parent")
        .arg("11")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--child"));
}
