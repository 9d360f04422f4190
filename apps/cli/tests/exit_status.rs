use std::ffi::OsStr;
use std::fs;
use std::process::{Command, Output};

fn run(args: &[&OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_copilot-metrics"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("run binary")
}

#[test]
fn missing_input_is_reported_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("absent.json");
    let output = run(&[input.as_os_str()]);

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("input not found").count(), 1, "{stderr}");
}

#[test]
fn file_in_place_of_output_dir_is_a_write_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("metrics.json");
    fs::write(&input, "[]").expect("write input");
    let blocker = dir.path().join("out");
    fs::write(&blocker, "").expect("write blocker");

    let output = run(&[
        input.as_os_str(),
        OsStr::new("--output-dir"),
        blocker.as_os_str(),
    ]);
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("conversion failed").count(), 1, "{stderr}");
}
