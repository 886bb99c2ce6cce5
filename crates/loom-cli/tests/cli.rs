use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;

fn loom() -> Command {
    Command::cargo_bin("loom").unwrap()
}

fn script_with(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_run_evaluates_script_and_exits_zero() {
    let script = script_with("x = 2\nx * 21\n");
    loom()
        .arg("run")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn test_run_exits_nonzero_on_eval_error() {
    let script = script_with("1/0\n");
    loom().arg("run").arg(script.path()).assert().failure();
}

#[test]
fn test_run_reports_missing_file() {
    loom()
        .arg("run")
        .arg("/nonexistent/path/to/script.loom")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn test_repl_reads_stdin_and_prints_prompt() {
    loom()
        .write_stdin("2+2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(">> "))
        .stdout(predicate::str::contains('4'));
}
