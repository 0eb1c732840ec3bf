//! End-to-end tests driving the ftranspose binary
//!
//! Covers stream selection, delimiter options, diagnostics on stderr and
//! exit status for the fatal error classes.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_ftranspose");

/// Run ftranspose with `input` on stdin
fn run(input: &[u8], args: &[&str]) -> Output {
    let mut cmd = Command::new(BIN)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("failed to spawn {}: {}", BIN, e));

    if let Some(mut stdin) = cmd.stdin.take() {
        stdin.write_all(input).expect("failed to write stdin");
    }

    cmd.wait_with_output().expect("failed to wait")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_stdin_to_stdout() {
    let out = run(b"a,bb,ccc\nd,ee,fff\n", &["-d", ","]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"a,d\nbb,ee\nccc,fff\n");
}

#[test]
fn test_default_delimiter_is_tab() {
    let out = run(b"1\t2\n3\t4\n", &[]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"1\t3\n2\t4\n");
}

#[test]
fn test_tab_escape_for_output_delimiter() {
    let out = run(b"1,2\n3,4\n", &["-d", ",", "-D", "\\t"]);
    assert_eq!(out.stdout, b"1\t3\n2\t4\n");
}

#[test]
fn test_overrun_reports_coordinates() {
    let out = run(b"toolongfield,b\n", &["-d", ",", "-f", "5"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"toolo\nb\n");
    assert!(stderr_of(&out).contains("element @[0,0] size exceeded"));
}

#[test]
fn test_empty_input() {
    let out = run(b"", &["-d", ","]);
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_verbosity_overridden_for_stdout() {
    let out = run(b"a,b\n", &["-d", ",", "-v", "2"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"a\nb\n");
    let stderr = stderr_of(&out);
    assert!(stderr.contains("overridden to 0"));
    assert!(!stderr.contains("reading array"));
}

#[test]
fn test_file_input_and_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "a,b,c\nd,e,f\n").unwrap();

    let out = run(
        b"",
        &[
            "-d", ",",
            "-i", input.to_str().unwrap(),
            "-o", output.to_str().unwrap(),
            "-v", "1",
        ],
    );
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert_eq!(fs::read(&output).unwrap(), b"a,d\nb,e\nc,f\n");

    let stderr = stderr_of(&out);
    assert!(stderr.contains("reading array"));
    assert!(stderr.contains("Total RAM used: 4096 bytes."));
    assert!(stderr.contains("(r=2, c=3), 0 truncated"));
}

/// Run with `-o` to a temp file so verbosity is honoured; returns stderr
fn run_verbose(input: &[u8], args: &[&str]) -> String {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.txt");
    let mut argv = args.to_vec();
    argv.extend(["-o", output.to_str().unwrap()]);
    let out = run(input, &argv);
    assert!(out.status.success(), "stderr: {}", stderr_of(&out));
    stderr_of(&out)
}

#[test]
fn test_summary_reports_truncated_fields() {
    let stderr = run_verbose(b"toolongfield,b
c,alsotoolong
", &["-d", ",", "-f", "5", "-v", "1"]);
    assert!(stderr.contains("(r=2, c=2), 2 truncated"));
}

#[test]
fn test_verbosity_two_echoes_settings_and_rows() {
    let stderr = run_verbose(b"a,b
c,d
", &["-d", ",", "-v", "2"]);
    assert!(stderr.contains("field width  = [20 chars]"));
    assert!(stderr.contains("in_delim     = [,]"));
    assert!(stderr.contains("row=1"));
    assert!(stderr.contains("row=2"));
    assert!(!stderr.contains("attempting realloc"));
}

#[test]
fn test_verbosity_three_reports_each_growth() {
    // 204 default-width slots fit in the first page; 300 forces a second grow
    let input: Vec<u8> = (0..300).flat_map(|_| *b"x,").collect();
    let stderr = run_verbose(&input, &["-d", ",", "-v", "3"]);
    assert!(stderr.contains("attempting realloc(4096)"));
    assert!(stderr.contains("attempting realloc(8192)"));
    assert!(stderr.contains("realloc(8192) passed"));
}

#[test]
fn test_verbosity_three_reports_write_progress() {
    let input: Vec<u8> = (0..10_005).flat_map(|_| *b"x,").collect();
    let stderr = run_verbose(&input, &["-d", ",", "-f", "1", "-v", "3"]);
    assert!(stderr.contains("line=10000"));
    assert!(!stderr.contains("line=20000"));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let out = run(b"", &["-i", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(stderr_of(&out).contains("missing.txt"));
}

#[test]
fn test_unwritable_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("no-such-dir").join("out.txt");
    let out = run(b"a\n", &["-o", output.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("out.txt"));
}

#[test]
fn test_allocation_exhausted_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.txt");
    fs::write(&output, "previous").unwrap();

    let input: Vec<u8> = (0..5000).flat_map(|_| *b"x,").collect();
    let out = run(
        &input,
        &["-d", ",", "-f", "1", "--max-memory", "4096", "-o", output.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("failed to grow element store"));
    assert_eq!(fs::read(&output).unwrap(), b"previous");
}

#[test]
fn test_invalid_delimiter() {
    let out = run(b"", &["-d", "ab"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("Invalid delimiter"));
}

#[test]
fn test_zero_width_rejected() {
    let out = run(b"", &["-f", "0"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr_of(&out).contains("Invalid field width"));
}

#[test]
fn test_unknown_option_is_usage_error() {
    let out = run(b"", &["--bogus"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}
