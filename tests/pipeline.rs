//! End-to-end pipeline tests: load → validate → assemble → serialize

use std::io::Write;

use pericope::corpus::pipeline::{to_json, Pipeline, PipelineError, PipelineOptions};
use pericope::corpus::tokens::TokenMode;
use tempfile::NamedTempFile;

const VERSES_CSV: &str = "chapter,verse,text\n\
    1,1,ἐν 1722 {PREP} ἀρχῇ 746 {N-DSF}\n\
    1,2,ἦν 1510 {V-IAI3S}\n\
    1,3,λόγος 3056 {N-NSM}\n";

const PERICOPES_CSV: &str = "pericope_id,title,chapter,start_verse,end_verse\n\
    P1,Opening,1,1,2\n\
    P2,Word,1,3,3\n";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn clean_run_produces_the_full_tree() {
    let verses = write_temp(VERSES_CSV);
    let pericopes = write_temp(PERICOPES_CSV);

    let pipeline = Pipeline::new(PipelineOptions::default());
    let output = pipeline
        .run_files(verses.path(), pericopes.path())
        .expect("pipeline runs");

    assert!(output.report.ok);
    assert!(output.report.warnings.is_empty());
    assert_eq!(output.summary.chapters, 1);
    assert_eq!(output.summary.verses, 3);
    assert_eq!(output.summary.pericopes, 2);
    assert_eq!(output.summary.warnings, 0);

    let value: serde_json::Value =
        serde_json::from_str(&to_json(&output.chapters).unwrap()).unwrap();
    assert_eq!(value[0]["pericopes"][0]["verses"][0]["tokens"][0]["greek"], "ἐν");
}

#[test]
fn rerunning_unchanged_inputs_is_byte_identical() {
    let verses = write_temp(VERSES_CSV);
    let pericopes = write_temp(PERICOPES_CSV);
    let pipeline = Pipeline::new(PipelineOptions::default());

    let first = pipeline
        .run_files(verses.path(), pericopes.path())
        .expect("first run");
    let second = pipeline
        .run_files(verses.path(), pericopes.path())
        .expect("second run");

    assert_eq!(
        to_json(&first.chapters).unwrap(),
        to_json(&second.chapters).unwrap()
    );
}

#[test]
fn strict_mode_aborts_before_assembly_on_any_warning() {
    // P2 starts at verse 3 while P1 already covers it: overlap.
    let verses = write_temp(VERSES_CSV);
    let pericopes = write_temp(
        "pericope_id,title,chapter,start_verse,end_verse\n\
         P1,Opening,1,1,3\n\
         P2,Word,1,3,3\n",
    );

    let pipeline = Pipeline::new(PipelineOptions {
        strict: true,
        ..PipelineOptions::default()
    });
    let err = pipeline
        .run_files(verses.path(), pericopes.path())
        .unwrap_err();
    match err {
        PipelineError::StrictAbort { warnings } => assert!(!warnings.is_empty()),
        other => panic!("expected strict abort, got {:?}", other),
    }
}

#[test]
fn non_strict_run_assembles_despite_a_failing_verdict() {
    let verses = write_temp(VERSES_CSV);
    let pericopes = write_temp(
        "pericope_id,title,chapter,start_verse,end_verse\n\
         P1,Opening,1,1,3\n\
         P2,Word,1,3,3\n",
    );

    let pipeline = Pipeline::new(PipelineOptions::default());
    let output = pipeline
        .run_files(verses.path(), pericopes.path())
        .expect("assembly proceeds over an invalid partition");
    assert!(!output.report.ok);
    assert_eq!(output.chapters.len(), 1);
    assert_eq!(output.chapters[0].pericopes.len(), 2);
}

#[test]
fn missing_required_column_is_a_load_error() {
    let verses = write_temp("chapter,versicle,text\n1,1,foo\n");
    let pericopes = write_temp(PERICOPES_CSV);

    let pipeline = Pipeline::new(PipelineOptions::default());
    let err = pipeline
        .run_files(verses.path(), pericopes.path())
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("verse"));
    assert!(message.contains("versicle"));
}

#[test]
fn lemma_mode_changes_token_naming_only() {
    let verses = write_temp(VERSES_CSV);
    let pericopes = write_temp(PERICOPES_CSV);

    let pipeline = Pipeline::new(PipelineOptions {
        mode: TokenMode::Lemma,
        ..PipelineOptions::default()
    });
    let output = pipeline
        .run_files(verses.path(), pericopes.path())
        .expect("pipeline runs");

    let value: serde_json::Value =
        serde_json::from_str(&to_json(&output.chapters).unwrap()).unwrap();
    let token = &value[0]["pericopes"][0]["verses"][0]["tokens"][0];
    assert_eq!(token["lemma"], "ἐν");
    assert!(token.get("strongs").is_none());
    // Structure is otherwise identical to full mode.
    assert_eq!(value[0]["pericopes"][0]["id"], "P1");
}

#[test]
fn pericopes_for_an_absent_chapter_warn_but_assemble() {
    let verses = write_temp(VERSES_CSV);
    let pericopes = write_temp(
        "pericope_id,title,chapter,start_verse,end_verse\n\
         P1,Opening,1,1,3\n\
         P9,Ghost,7,1,4\n",
    );

    let pipeline = Pipeline::new(PipelineOptions::default());
    let output = pipeline
        .run_files(verses.path(), pericopes.path())
        .expect("no crash on absent chapter");
    assert!(!output.report.ok);

    let ghost = output
        .chapters
        .iter()
        .find(|c| c.chapter == 7)
        .expect("chapter 7 block exists");
    assert_eq!(ghost.pericopes.len(), 1);
    assert!(ghost.pericopes[0].verses.is_empty());
}
