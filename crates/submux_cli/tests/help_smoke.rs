use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_works() {
    let mut cmd = Command::cargo_bin("submux").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn missing_input_path_is_fatal() {
    let mut cmd = Command::cargo_bin("submux").unwrap();
    cmd.args(["-i", "/definitely/not/a/real/path"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}
