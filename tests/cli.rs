//! End-to-end tests for the runfile binary

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const DEFINITION: &str = "\
.PHONY: fetch build alpha beta
.IGNORE: tidy

fetch: ## Fetch sources
\t@echo fetching

build: fetch ## Build the project
\techo building ${MODE}

alpha: ## does a
\t@echo a

beta:
\t@echo b

fail:
\texit 3

after-fail: fail
\ttouch never.txt

tidy:
\tfalse
\t@echo tidied

loop-a: loop-b
loop-b: loop-a
";

fn runfile() -> Command {
    let mut cmd = Command::cargo_bin("runfile").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("MODE");
    cmd
}

#[test]
fn test_help_lists_documented_targets_sorted() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  alpha  does a\n  build  Build the project\n  fetch  Fetch sources\n",
        ))
        .stdout(predicate::str::contains("beta").not());
}

#[test]
fn test_no_arguments_prints_help() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Targets:"));
}

#[test]
fn test_help_is_byte_identical() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    let first = runfile().current_dir(temp_dir.path()).arg("help").output().unwrap();
    let second = runfile().current_dir(temp_dir.path()).arg("help").output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_run_with_override() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "build", "MODE=release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fetching\nbuilding release\n"))
        .stderr(predicate::str::contains("[RUN] echo building release"))
        .stderr(predicate::str::contains("echo fetching").not());
}

#[test]
fn test_undefined_variable_warns() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "build"])
        .assert()
        .success()
        .stderr(predicate::str::contains("variable 'MODE' is not set"));
}

#[test]
fn test_failing_target_exit_code() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "after-fail"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("target 'fail' failed with exit code 3: exit 3"));

    assert!(!temp_dir.path().join("never.txt").exists());
}

#[test]
fn test_best_effort_target_succeeds() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "tidy", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tidied\na\n"))
        .stderr(predicate::str::contains("ignored exit code 1"));
}

#[test]
fn test_unknown_target_exit_code() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "alpha", "nope"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Target 'nope' is not defined"));
}

#[test]
fn test_cycle_exit_code() {
    let (temp_dir, _path) = common::create_test_definition(DEFINITION);

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "loop-a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("loop-a -> loop-b -> loop-a"));
}

#[test]
fn test_parse_error_runs_nothing() {
    let (temp_dir, _path) = common::create_test_definition("ok:\n\ttouch ran.txt\n\n???\n");

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "ok"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("line 4, column 1"));

    assert!(!temp_dir.path().join("ran.txt").exists());
}

#[test]
fn test_explicit_file_and_dry_run() {
    let (temp_dir, path) = common::create_test_definition("make-file:\n\ttouch made.txt\n");

    runfile()
        .current_dir(temp_dir.path())
        .args(["--dry-run", "--file"])
        .arg(&path)
        .args(["run", "make-file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("touch made.txt"));

    assert!(!temp_dir.path().join("made.txt").exists());
}

#[test]
fn test_definition_found_from_subdirectory() {
    let (_temp_dir, _path, sub_dir) = common::create_test_definition_in_subdir(DEFINITION);

    runfile()
        .current_dir(&sub_dir)
        .args(["-q", "run", "alpha"])
        .assert()
        .success()
        .stdout("a\n");
}

#[test]
fn test_dotenv_and_project_settings() {
    let (temp_dir, _path) =
        common::create_test_definition("show:\n\t@echo ${FROM_DOTENV}-$$FROM_DOTENV\n");
    fs::write(temp_dir.path().join(".env"), "FROM_DOTENV=yes\n").unwrap();

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "show"])
        .assert()
        .success()
        .stdout("yes-yes\n");

    fs::write(temp_dir.path().join(".runfile.yml"), "dotenv: false\n").unwrap();

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "show"])
        .assert()
        .success()
        .stdout("-\n");
}

#[test]
fn test_invalid_settings_exit_code() {
    let (temp_dir, _path) = common::create_test_definition("a:\n\ttrue\n");
    fs::write(temp_dir.path().join(".runfile.yml"), "bogus: 1\n").unwrap();

    runfile()
        .current_dir(temp_dir.path())
        .args(["run", "a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid settings"));
}

#[test]
fn test_completions() {
    runfile()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("runfile"));
}

fn wait_for_file(path: &Path, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if path.exists() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

#[test]
fn test_interrupt_stops_plan() {
    let (temp_dir, _path) = common::create_test_definition(
        "\
first:
\ttouch started.txt
\tsleep 5
\ttouch second-line.txt

after: first
\ttouch after.txt
",
    );

    let mut child = StdCommand::new(assert_cmd::cargo::cargo_bin("runfile"))
        .args(["run", "after"])
        .current_dir(temp_dir.path())
        .env("NO_COLOR", "1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .unwrap();

    assert!(wait_for_file(
        &temp_dir.path().join("started.txt"),
        Duration::from_secs(10)
    ));
    thread::sleep(Duration::from_millis(200));

    // The whole group gets the signal, as a terminal's Ctrl-C would deliver it
    let rc = unsafe { libc::killpg(child.id() as libc::pid_t, libc::SIGINT) };
    assert_eq!(rc, 0);

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(130));
    assert!(!temp_dir.path().join("second-line.txt").exists());
    assert!(!temp_dir.path().join("after.txt").exists());
}
