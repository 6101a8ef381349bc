use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

// Every test here must work offline: only help output and failures that
// happen before a request is sent are exercised at the binary level.

fn run_observatory(cwd: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_observatory");
    Command::new(bin)
        .current_dir(cwd)
        .args(args)
        .output()
        .unwrap()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(dir.path(), &[]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("usage: observatory"));
}

#[test]
fn unknown_command_prints_usage_and_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(dir.path(), &["--bogus", "host=example.com"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("usage: observatory"));
}

#[test]
fn help_lists_all_commands() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(dir.path(), &["--help"]);

    assert!(
        out.status.success(),
        "stderr: {}",
        stderr(&out)
    );
    let text = stdout(&out);
    for name in [
        "--gradeDistribution",
        "--scannerStates",
        "--recentScans",
        "--retrieveAssessment",
        "--retrieveTestResult",
        "--help",
    ] {
        assert!(text.contains(name), "help should mention {name}");
    }
}

#[test]
fn short_help_flag_works_too() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(dir.path(), &["-h"]);

    assert!(out.status.success());
    assert!(stdout(&out).contains("usage: observatory"));
}

#[test]
fn assessment_without_host_fails_before_any_request() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(dir.path(), &["--retrieveAssessment", "rescan"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("mandatory argument host"));
}

#[test]
fn test_results_without_id_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(dir.path(), &["-t"]);

    assert!(!out.status.success());
    assert!(stderr(&out).contains("mandatory argument id"));
}

#[test]
fn empty_proxy_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let proxy = dir.path().join("empty-proxy");
    std::fs::write(&proxy, "\n").unwrap();

    let out = run_observatory(
        dir.path(),
        &[
            "--proxy-file",
            proxy.to_str().unwrap(),
            "--scannerStates",
        ],
    );

    assert!(!out.status.success());
    assert!(stderr(&out).contains("contains no proxy address"));
}

#[test]
fn missing_explicit_proxy_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let out = run_observatory(
        dir.path(),
        &["--proxy-file", "does-not-exist", "--scannerStates"],
    );

    assert!(!out.status.success());
    assert!(stderr(&out).contains("failed to read proxy file"));
}
