use assert_cmd::Command;
use predicates::prelude::*;

fn clbench() -> Command {
    let mut cmd = Command::cargo_bin("clbench").unwrap();
    cmd.env_remove("CLBENCH_CONFIG").env_remove("CLBENCH_LOG_LEVEL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_works() {
    clbench().arg("--help").assert().success();
}

#[test]
fn version_works() {
    clbench().arg("--version").assert().success().stdout(predicate::str::contains("clbench"));
}

#[test]
fn help_mentions_core_flags() {
    let out = clbench().arg("--help").assert().success().get_output().stdout.clone();
    let s = String::from_utf8(out).unwrap();

    for needle in ["-d", "--device", "-v", "--verbose", "--kernel", "--list-devices"] {
        assert!(s.contains(needle), "help missing `{needle}`");
    }
}

#[test]
fn missing_kernel_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    clbench()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load kernel."));
}

#[test]
fn missing_explicit_kernel_path_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    clbench()
        .current_dir(dir.path())
        .args(["--kernel", "kernels/none.cl", "--format", "json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load kernel."));
}

#[test]
fn list_devices_prints_header() {
    let dir = tempfile::tempdir().unwrap();
    clbench()
        .current_dir(dir.path())
        .arg("--list-devices")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Available Devices:\n\n"));
}

#[test]
fn list_devices_json_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let out = clbench()
        .current_dir(dir.path())
        .args(["--list-devices", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).expect("stdout is JSON");
    assert!(value["platforms"].is_array());
    assert!(value.get("benchmark").is_none());
}

#[test]
fn invalid_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    clbench()
        .current_dir(dir.path())
        .args(["--size", "1000"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a multiple"));
}

#[test]
fn missing_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    clbench()
        .current_dir(dir.path())
        .args(["--config", "absent.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn default_config_file_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clbench.toml"), "kernel_path = \"custom.cl\"\n").unwrap();
    // The configured kernel does not exist either, so this still fails with
    // the missing-kernel exit code.
    clbench()
        .current_dir(dir.path())
        .args(["--format", "json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load kernel."));
}

#[test]
fn misspelled_config_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("clbench.toml"), "iterations = 8\n").unwrap();
    clbench()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown field `iterations`"));
}

#[test]
fn invalid_flag_fails() {
    clbench().arg("--nonexistent-flag").assert().failure();
}
