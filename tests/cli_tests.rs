//! CLI integration tests for aac-enc
//!
//! Runs the built binary and checks exit codes, diagnostics, and which files
//! it touches.

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::write_file;
use util::{pcm16_wav, sine_wave, FmtSpec, RiffBuilder};

fn run_aac_enc<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_aac-enc"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute aac-enc")
}

fn stderr_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_encodes_wav_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "in.wav", &pcm16_wav(2, 44_100, &sine_wave(4096, 2, 44_100, 440.0)));
    let output = dir.path().join("out.aac");

    let result = run_aac_enc(["-r", "96000", path_arg(&input), path_arg(&output)]);

    assert_eq!(result.status.code(), Some(0), "stderr: {}", stderr_string(&result));
    let bytes = std::fs::read(&output).unwrap();
    assert!(!bytes.is_empty());
    assert_eq!(bytes[0], 0xFF);
}

#[test]
fn test_short_input_warns_and_leaves_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "in.wav", &pcm16_wav(1, 8000, &[0; 1000]));
    let output = dir.path().join("out.aac");

    let result = run_aac_enc([path_arg(&input), path_arg(&output)]);

    assert_eq!(result.status.code(), Some(0));
    assert!(stderr_string(&result).contains("dropped 2000 trailing bytes"));
    assert_eq!(std::fs::metadata(&output).unwrap().len(), 0);

    let quiet = run_aac_enc(["-q", path_arg(&input), path_arg(&output)]);
    assert_eq!(quiet.status.code(), Some(0));
    assert!(quiet.stderr.is_empty());
}

#[test]
fn test_unknown_flag_prints_usage() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "in.wav", &pcm16_wav(1, 8000, &[0; 2048]));
    let output = dir.path().join("out.aac");

    let result = run_aac_enc(["-z", path_arg(&input), path_arg(&output)]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr_string(&result).contains("[-r bitrate]"));
    assert!(result.stdout.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_trailing_unknown_flag_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "in.wav", &pcm16_wav(1, 8000, &[0; 2048]));
    let output = dir.path().join("out.aac");

    let result = run_aac_enc([path_arg(&input), path_arg(&output), "-z"]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr_string(&result).contains("[-r bitrate]"));
    assert!(!output.exists());
}

#[test]
fn test_bitrate_between_positionals() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "in.wav", &pcm16_wav(2, 44_100, &sine_wave(4096, 2, 44_100, 440.0)));
    let output = dir.path().join("out.aac");

    let result = run_aac_enc([path_arg(&input), "-r", "96000", path_arg(&output)]);

    assert_eq!(result.status.code(), Some(0), "stderr: {}", stderr_string(&result));
    assert!(output.exists());
}

#[test]
fn test_missing_positionals_print_usage() {
    let result = run_aac_enc(["only-one.wav"]);
    assert_eq!(result.status.code(), Some(1));
    assert!(stderr_string(&result).contains("[-r bitrate]"));

    let result = run_aac_enc(Vec::<&str>::new());
    assert_eq!(result.status.code(), Some(1));
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent.wav");
    let output = dir.path().join("out.aac");

    let result = run_aac_enc([path_arg(&input), path_arg(&output)]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr_string(&result).contains("absent.wav"));
    assert!(!output.exists());
}

#[test]
fn test_unsupported_depth_reports_value() {
    let dir = tempfile::tempdir().unwrap();
    let spec = FmtSpec {
        bits_per_sample: 24,
        ..FmtSpec::pcm16(1, 8000)
    };
    let input = write_file(dir.path(), "in.wav", &RiffBuilder::new().fmt(&spec).data(&[0; 6144]).build());
    let output = dir.path().join("out.aac");

    let result = run_aac_enc([path_arg(&input), path_arg(&output)]);

    assert_eq!(result.status.code(), Some(1));
    assert_eq!(stderr_string(&result).trim(), "Unsupported WAV sample depth 24");
    assert!(!output.exists());
}

#[test]
fn test_not_a_wav_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "in.wav", b"ID3\x03\x00\x00\x00\x00\x00\x00");
    let output = dir.path().join("out.aac");

    let result = run_aac_enc([path_arg(&input), path_arg(&output)]);

    assert_eq!(result.status.code(), Some(1));
    assert!(stderr_string(&result).starts_with("Bad wav file"));
    assert!(!output.exists());
}
