//! End-to-end tests for validating request streams
//!
//! Drives `StreamDriver::run` on temp files and checks the corrected output,
//! the verdict, and the exit status of the `validate` binary.

use songgen_validate::driver::StreamDriver;
use songgen_validate::validators::RecordRules;
use songgen_validate::{Severity, ValidateError, Verdict};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const PLACEHOLDER: &str = "[verse] Placeholder lyric one. Placeholder lyric two";

fn write_input(dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = dir.path().join("songs.jsonl");
    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}

fn output_lines(path: &Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn run(lines: &[&str]) -> (TempDir, PathBuf, songgen_validate::ValidationReport) {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, lines);
    let output = dir.path().join("out.jsonl");
    let report = StreamDriver::default().run(&input, &output).unwrap();
    (dir, output, report)
}

#[test]
fn test_valid_stream_is_unchanged_and_clean() {
    let lines = [
        r#"{"idx":"song1","gt_lyric":"[intro-short]; [verse] We walk the line. Under city lights; [chorus] Hold on; [outro-medium]","auto_prompt_audio_type":"Rock","descriptions":"female, bright, the bpm is 110"}"#,
        r#"{"idx":"song2","gt_lyric":"[verse] 我们一起走. 在夜空下","descriptions":"male, sad"}"#,
    ];
    let (_dir, output, report) = run(&lines);

    assert_eq!(report.verdict, Verdict::Clean);
    assert!(report.diagnostics.is_empty());
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, format!("{}\n{}\n", lines[0], lines[1]));
}

#[test]
fn test_corrected_output_is_idempotent() {
    let (dir, first_output, first) = run(&[
        r#"{"idx":"a1","gt_lyric":"[verse] Hello there. Wow!; [inst] "}"#,
        r#"{"gt_lyric":""}"#,
        r#"{"idx":"b","gt_lyric":"[hook] Yeah, yeah; [intro-short] noise","prompt_audio_path":"missing.mp3","auto_prompt_audio_type":"Pop"}"#,
        r#"{"idx":"c","gt_lyric":"[outro-short]","auto_prompt_audio_type":"Polka","descriptions":",,"}"#,
    ]);
    assert_eq!(first.verdict, Verdict::ManualFixRequired);

    let second_output = dir.path().join("second.jsonl");
    let second = StreamDriver::default()
        .run(&first_output, &second_output)
        .unwrap();

    assert_eq!(second.verdict, Verdict::Clean);
    assert_eq!(
        fs::read(&first_output).unwrap(),
        fs::read(&second_output).unwrap()
    );
}

#[test]
fn test_unrecognized_descriptions_stay_advisory_on_rerun() {
    let (dir, first_output, first) = run(&[
        r#"{"idx":"s1","gt_lyric":"[verse] Hello there. Wow!","descriptions":"male, hip-hop, 120bpm"}"#,
    ]);
    assert_eq!(first.verdict, Verdict::AutoCorrected);

    let second_output = dir.path().join("second.jsonl");
    let second = StreamDriver::default()
        .run(&first_output, &second_output)
        .unwrap();

    // Descriptions are kept as written, so the warnings repeat
    assert_eq!(second.verdict, Verdict::AutoCorrected);
    assert_eq!(second.diagnostics.count(Severity::Warning), 2);
    assert_eq!(second.diagnostics.count(Severity::Correction), 0);
    assert_eq!(
        fs::read(&first_output).unwrap(),
        fs::read(&second_output).unwrap()
    );
}

#[test]
fn test_missing_ids_are_synthesized_and_unique() {
    let (_dir, output, report) = run(&[
        r#"{"gt_lyric":"[verse] One"}"#,
        r#"{"gt_lyric":"[verse] Two"}"#,
        r#"{"idx":"","gt_lyric":"[verse] Three"}"#,
    ]);
    assert_eq!(report.verdict, Verdict::AutoCorrected);

    let ids: Vec<String> = output_lines(&output)
        .iter()
        .map(|v| v["idx"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id.starts_with("song_")));
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 3);
}

#[test]
fn test_zero_vocal_segments_need_manual_fix() {
    let (_dir, output, report) = run(&[r#"{"idx":"x","gt_lyric":"[intro-medium]; [inst-short] la la"}"#]);
    assert_eq!(report.verdict, Verdict::ManualFixRequired);
    let records = output_lines(&output);
    let lyric = records[0]["gt_lyric"].as_str().unwrap();
    assert_eq!(lyric, format!("[intro-medium]; [inst-short]; {}", PLACEHOLDER));
}

#[test]
fn test_both_prompt_fields_keep_audio_path() {
    let dir = TempDir::new().unwrap();
    let audio = dir.path().join("ref.flac");
    fs::write(&audio, b"fLaC").unwrap();
    let line = format!(
        r#"{{"idx":"p","gt_lyric":"[verse] Hi","prompt_audio_path":"{}","auto_prompt_audio_type":"Jazz"}}"#,
        audio.display()
    );
    let input = write_input(&dir, &[line.as_str()]);
    let output = dir.path().join("out.jsonl");
    let report = StreamDriver::default().run(&input, &output).unwrap();

    assert_eq!(report.verdict, Verdict::AutoCorrected);
    let record = &output_lines(&output)[0];
    assert_eq!(record["prompt_audio_path"], audio.display().to_string());
    assert!(record.get("auto_prompt_audio_type").is_none());
}

#[test]
fn test_punctuation_and_forbidden_tag_scenario() {
    let (_dir, output, report) =
        run(&[r#"{"idx":"a1","gt_lyric":"[verse] Hello there. Wow!; [inst] "}"#]);
    assert_eq!(report.verdict, Verdict::AutoCorrected);
    assert_eq!(
        output_lines(&output)[0]["gt_lyric"],
        "[verse] Hello there. Wow; [inst-medium]"
    );
}

#[test]
fn test_missing_id_and_empty_lyric_scenario() {
    let (_dir, output, report) = run(&[r#"{"gt_lyric":""}"#]);
    assert_eq!(report.verdict, Verdict::ManualFixRequired);
    let record = &output_lines(&output)[0];
    assert_eq!(record["gt_lyric"], PLACEHOLDER);
    assert!(record["idx"].as_str().unwrap().starts_with("song_1_"));
}

#[test]
fn test_invalid_json_line_dropped() {
    let (_dir, output, report) = run(&[
        r#"{"idx":"a","gt_lyric":"[verse] One"}"#,
        r#"{"idx":"b", "gt_lyric": "[verse] Two""#,
        r#"{"idx":"c","gt_lyric":"[verse] Three"}"#,
    ]);
    let ids: Vec<_> = output_lines(&output)
        .iter()
        .map(|v| v["idx"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["a", "c"]);

    let errors: Vec<_> = report.diagnostics.with_severity(Severity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line_number, 2);
    assert_eq!(report.lines_dropped, 1);
    assert_eq!(report.records_written, 2);
    assert_eq!(report.verdict, Verdict::ManualFixRequired);
}

#[test]
fn test_parallel_run_preserves_order() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (1..=64)
        .map(|i| format!(r#"{{"idx":"n{}","gt_lyric":"[verse] Number {}!"}}"#, i, i))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let input = write_input(&dir, &refs);
    let output = dir.path().join("out.jsonl");

    let report = StreamDriver::new(RecordRules::default(), 8)
        .run(&input, &output)
        .unwrap();

    assert_eq!(report.verdict, Verdict::AutoCorrected);
    let ids: Vec<String> = output_lines(&output)
        .iter()
        .map(|v| v["idx"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = (1..=64).map(|i| format!("n{}", i)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = StreamDriver::default().run(&dir.path().join("nope.jsonl"), &dir.path().join("o"));
    assert!(matches!(result, Err(ValidateError::InputNotFound(_))));
    assert!(!dir.path().join("o").exists());
}

fn run_binary(dir: &TempDir, args: &[&str]) -> std::process::Output {
    let config = dir.path().join("validate.toml");
    fs::write(&config, "[logging]\nlevel = \"error\"\n").unwrap();
    Command::new(env!("CARGO_BIN_EXE_validate"))
        .args(args)
        .arg("--config")
        .arg(&config)
        .env_remove("RUST_LOG")
        .env_remove("SONGGEN_WORKERS")
        .output()
        .unwrap()
}

#[test]
fn test_binary_exit_codes() {
    let dir = TempDir::new().unwrap();

    let fixable = dir.path().join("fixable.jsonl");
    fs::write(&fixable, "{\"idx\":\"a1\",\"gt_lyric\":\"[verse] Hello there. Wow!; [inst] \"}\n").unwrap();
    let out = run_binary(&dir, &[fixable.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Warnings:"));
    assert!(stdout.contains("[AutoCorrected]"));
    assert!(dir.path().join("corrected_fixable.jsonl").exists());

    let broken = dir.path().join("broken.jsonl");
    fs::write(&broken, "{\"gt_lyric\":\"\"}\n").unwrap();
    let custom = dir.path().join("custom.jsonl");
    let out = run_binary(&dir, &[broken.to_str().unwrap(), custom.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(custom.exists());

    let out = run_binary(&dir, &[dir.path().join("absent.jsonl").to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("not found"));
}

#[test]
fn test_binary_export_report() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.jsonl");
    fs::write(&input, "{\"idx\":\"a\",\"gt_lyric\":\"[verse] Fine\"}\n").unwrap();
    let export = dir.path().join("report.json");

    let out = run_binary(
        &dir,
        &[input.to_str().unwrap(), "--export", export.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(0));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(report["verdict"], "Clean");
    assert_eq!(report["records_written"], 1);
}

#[cfg(target_os = "linux")]
#[test]
fn test_binary_reports_ignored_user_config() {
    let dir = TempDir::new().unwrap();
    let config_home = dir.path().join("xdg");
    fs::create_dir_all(config_home.join("songgen")).unwrap();
    fs::write(config_home.join("songgen").join("validate.toml"), "[runtime\nworkers=").unwrap();
    let input = dir.path().join("in.jsonl");
    fs::write(&input, "{\"idx\":\"a\",\"gt_lyric\":\"[verse] Fine\"}\n").unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_validate"))
        .arg(&input)
        .env("XDG_CONFIG_HOME", &config_home)
        .env_remove("SONGGEN_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("SONGGEN_WORKERS")
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("[Clean]"));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Ignoring user config"), "stderr: {stderr}");
}
