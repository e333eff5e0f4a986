//! Integration tests for the synvm CLI.
//!
//! These tests invoke the `synvm` binary as a subprocess and check
//! exit codes, stdout, and stderr.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn synvm() -> Command {
    Command::cargo_bin("synvm").unwrap()
}

/// Write `words` as a little-endian image and return its path.
fn write_image(dir: &TempDir, words: &[u16]) -> PathBuf {
    let path = dir.path().join("image.bin");
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    fs::write(&path, bytes).unwrap();
    path
}

const R0: u16 = 32768;

// ---- No-args / help ----

#[test]
fn no_args_prints_usage_and_exits_1() {
    synvm()
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage: synvm"));
}

#[test]
fn help_flag_exits_0() {
    synvm()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Options:"));
}

#[test]
fn unknown_option_exits_1() {
    synvm()
        .arg("--frobnicate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown option"));
}

// ---- Startup errors ----

#[test]
fn missing_file_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.bin");
    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn odd_length_image_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("odd.bin");
    fs::write(&path, [19u8, 0, 65]).unwrap();
    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("must be a multiple of 2"));
}

// ---- Running ----

#[test]
fn hello_world() {
    let dir = TempDir::new().unwrap();
    let mut words = Vec::new();
    for b in b"Hello\n" {
        words.extend_from_slice(&[19, u16::from(*b)]);
    }
    words.push(0);
    let path = write_image(&dir, &words);

    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout("Hello\n--------------\nProgram exited\n");
}

#[test]
fn ret_on_empty_stack_exits_0() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, &[19, 33, 18, 19, 63]);

    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("!-"));
}

#[test]
fn echo_reads_stdin() {
    // 0: in r0; 2: out r0; 4: eq r1 r0 10; 8: jf r1 0; 11: halt
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, &[20, R0, 19, R0, 4, R0 + 1, R0, 10, 8, R0 + 1, 0, 0]);

    synvm()
        .arg(path.to_str().unwrap())
        .write_stdin("look\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("look\n"));
}

#[test]
fn stack_underflow_exits_2() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, &[21, 3, R0]);

    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("runtime error: stack underflow at address 1"));
}

#[test]
fn unknown_opcode_exits_2() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, &[22]);

    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown opcode 22 at address 0"));
}

#[test]
fn verbose_logs_exit_reason() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, &[21]);

    synvm()
        .args(["--verbose", path.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("[DEBUG]"))
        .stderr(predicate::str::contains("ran past end of memory"));
}

#[test]
fn quiet_by_default() {
    let dir = TempDir::new().unwrap();
    let path = write_image(&dir, &[0]);

    synvm()
        .arg(path.to_str().unwrap())
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
