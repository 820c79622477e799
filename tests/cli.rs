//! CLI integration tests for the pericope binary
//!
//! Exercises the exit-code contract: 0 success, 1 usage/fatal error,
//! 2 strict-mode abort.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSES_CSV: &str = "chapter,verse,text\n\
    1,1,ἐν 1722 {PREP} ἀρχῇ 746 {N-DSF}\n\
    1,2,ἦν 1510 {V-IAI3S}\n";

const PERICOPES_CSV: &str = "pericope_id,title,chapter,start_verse,end_verse\n\
    P1,Opening,1,1,2\n";

const OVERLAPPING_PERICOPES_CSV: &str = "pericope_id,title,chapter,start_verse,end_verse\n\
    P1,Opening,1,1,2\n\
    P2,Again,1,2,2\n";

struct Inputs {
    _dir: TempDir,
    verses: String,
    pericopes: String,
    output: String,
}

fn inputs(verses_csv: &str, pericopes_csv: &str) -> Inputs {
    let dir = TempDir::new().expect("create temp dir");
    let verses = dir.path().join("verses.csv");
    let pericopes = dir.path().join("pericopes.csv");
    let output = dir.path().join("out.json");
    fs::write(&verses, verses_csv).expect("write verses csv");
    fs::write(&pericopes, pericopes_csv).expect("write pericopes csv");
    Inputs {
        verses: verses.to_string_lossy().into_owned(),
        pericopes: pericopes.to_string_lossy().into_owned(),
        output: output.to_string_lossy().into_owned(),
        _dir: dir,
    }
}

fn pericope_cmd() -> Command {
    Command::cargo_bin("pericope").expect("binary builds")
}

#[test]
fn missing_arguments_exit_with_usage_error() {
    pericope_cmd().assert().failure().code(1);
}

#[test]
fn clean_run_writes_json_and_prints_summary() {
    let inputs = inputs(VERSES_CSV, PERICOPES_CSV);
    pericope_cmd()
        .args([&inputs.verses, &inputs.pericopes, &inputs.output])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: wrote"))
        .stdout(predicate::str::contains("1 chapters, 2 verses, 1 pericopes"));

    let written = fs::read_to_string(&inputs.output).expect("output exists");
    let value: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(value[0]["chapter"], 1);
    assert_eq!(
        value[0]["pericopes"][0]["verses"][0]["tokens"][0]["greek"],
        "ἐν"
    );
}

#[test]
fn strict_mode_aborts_with_exit_code_2_and_no_output() {
    let inputs = inputs(VERSES_CSV, OVERLAPPING_PERICOPES_CSV);
    pericope_cmd()
        .args([
            inputs.verses.as_str(),
            inputs.pericopes.as_str(),
            inputs.output.as_str(),
            "--strict",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("strict mode"));
    assert!(!std::path::Path::new(&inputs.output).exists());
}

#[test]
fn overlap_without_strict_still_writes_output_but_fails() {
    let inputs = inputs(VERSES_CSV, OVERLAPPING_PERICOPES_CSV);
    pericope_cmd()
        .args([&inputs.verses, &inputs.pericopes, &inputs.output])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("overlap"));
    assert!(std::path::Path::new(&inputs.output).exists());
}

#[test]
fn coverage_mismatch_fails_only_under_the_coverage_flag() {
    let short = "pericope_id,title,chapter,start_verse,end_verse\n\
        P1,Opening,1,1,1\n";
    // Without the flag the short coverage is only warned about.
    let inputs = inputs(VERSES_CSV, short);
    pericope_cmd()
        .args([&inputs.verses, &inputs.pericopes, &inputs.output])
        .assert()
        .success()
        .stderr(predicate::str::contains("warning"));

    let inputs = self::inputs(VERSES_CSV, short);
    pericope_cmd()
        .args([
            inputs.verses.as_str(),
            inputs.pericopes.as_str(),
            inputs.output.as_str(),
            "--require-full-coverage",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn missing_column_exits_1_naming_the_column() {
    let inputs = inputs("chapter,versicle,text\n1,1,foo\n", PERICOPES_CSV);
    pericope_cmd()
        .args([&inputs.verses, &inputs.pericopes, &inputs.output])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("verse"));
}

#[test]
fn lemmas_flag_switches_token_naming() {
    let inputs = inputs(VERSES_CSV, PERICOPES_CSV);
    pericope_cmd()
        .args([
            inputs.verses.as_str(),
            inputs.pericopes.as_str(),
            inputs.output.as_str(),
            "--lemmas",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&inputs.output).expect("output exists");
    let value: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    let token = &value[0]["pericopes"][0]["verses"][0]["tokens"][0];
    assert_eq!(token["lemma"], "ἐν");
    assert!(token.get("greek").is_none());
}

#[test]
fn log_file_receives_warnings() {
    let inputs = inputs(VERSES_CSV, OVERLAPPING_PERICOPES_CSV);
    let log_path = inputs._dir.path().join("run.log");
    pericope_cmd()
        .args([
            inputs.verses.as_str(),
            inputs.pericopes.as_str(),
            inputs.output.as_str(),
            "--log-file",
            log_path.to_string_lossy().as_ref(),
        ])
        .assert()
        .code(1);

    let log = fs::read_to_string(&log_path).expect("log file written");
    assert!(log.contains("warning"));
}
