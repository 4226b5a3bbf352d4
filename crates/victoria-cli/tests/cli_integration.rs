//! CLI integration tests for `victoria run`, `check` and `fmt`.
//!
//! These tests invoke the compiled binary to verify end-to-end behavior.

use std::path::PathBuf;
use std::process::{Command, Output};

fn victoria_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_victoria"));
    cmd.env_remove("RUST_LOG").env("VICTORIA_JOKES", "off");
    cmd
}

fn write_source(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let file = dir.path().join(name);
    std::fs::write(&file, src).expect("write source");
    file
}

fn run(args: &[&str]) -> Output {
    victoria_bin().args(args).output().expect("run binary")
}

#[test]
fn cli_run_prints_program_output() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "sum.vic", "let x = 2 + 3 * 4; print(x);");

    let output = run(&["run", file.to_str().unwrap()]);

    assert!(
        output.status.success(),
        "victoria run should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "14\n");
}

#[test]
fn cli_run_reports_runtime_error() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "bad.vic", "print(1);\nprintln(\"hi\");\n");

    let output = run(&["--color", "never", "run", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[E0002]"), "stderr: {stderr}");
    assert!(stderr.contains("bad.vic:2:1"), "stderr: {stderr}");
    assert!(!stderr.contains("joke"), "stderr: {stderr}");
}

#[test]
fn cli_json_error_format() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "div.vic", "let a = 1 / 0;");

    let output = run(&["--error-format", "json", "run", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .find(|l| l.starts_with('{'))
        .expect("a JSON diagnostic line");
    let value: serde_json::Value = serde_json::from_str(line).expect("valid JSON");
    assert_eq!(value["code"], "E0007");
    assert_eq!(value["message"], "division by zero");
}

#[test]
fn cli_plain_format_includes_warnings() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "warn.vic", "let a = 9223372036854775807 + 1; print(a);");

    let output = run(&["--error-format", "plain", "run", file.to_str().unwrap()]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("W0003"), "stderr: {stderr}");
}

#[test]
fn cli_check_reports_parse_errors() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let good = write_source(&dir, "good.vic", "let a = 1;\nprint(a);\n");
    let bad = write_source(&dir, "bad.vic", "let = 1;");

    let output = run(&["check", good.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("ok"));

    let output = run(&["--error-format", "plain", "check", bad.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E0004"));
}

#[test]
fn cli_fmt_output_reparses() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "fmt.vic", "let   x=1+2*3;print( x );");

    let output = run(&["fmt", file.to_str().unwrap()]);
    assert!(output.status.success());
    let formatted = String::from_utf8_lossy(&output.stdout).into_owned();

    let again = write_source(&dir, "fmt2.vic", &formatted);
    let output = run(&["fmt", again.to_str().unwrap()]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), formatted);
}

#[test]
fn cli_max_depth_flag_limits_recursion() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(&dir, "deep.vic", "define down(n) { down(n + 1) } down(0);");

    let output = run(&["--max-depth", "20", "--error-format", "plain", "run", file.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E0040"), "stderr: {stderr}");
    assert!(stderr.contains("20"), "stderr: {stderr}");
}

#[test]
fn cli_default_depth_survives_deep_recursion() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = write_source(
        &dir,
        "count.vic",
        "define count(n) { if (n == 0) { return 0; } 1 + count(n - 1) } print(count(900));",
    );

    let output = run(&["run", file.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "900\n");
}

#[test]
fn cli_missing_file() {
    let output = run(&["run", "/nonexistent/nothing.vic"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read"));
}

#[test]
fn cli_rejects_oversized_source() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let big = format!("let a = 1;\n{}", " ".repeat(1_000_001));
    let file = write_source(&dir, "big.vic", &big);

    let output = run(&["run", file.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1MB limit"));
}
