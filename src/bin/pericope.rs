//! Command-line interface for pericope
//! Converts verse and pericope CSV tables into a nested chapter JSON document.
//!
//! Usage:
//!   pericope `<verses_csv>` `<pericopes_csv>` `<output_json>` [flags]
//!
//! Exit codes: 0 success; 1 usage or fatal load/validation error;
//! 2 strict-mode abort due to validation warnings.

use clap::{Arg, ArgAction, Command};

use pericope::corpus::pipeline::{to_json, Pipeline, PipelineError, PipelineOptions};
use pericope::corpus::report::Reporter;
use pericope::corpus::tokens::TokenMode;

fn main() {
    let command = Command::new("pericope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert verse and pericope CSV tables into nested chapter JSON")
        .arg(
            Arg::new("verses_csv")
                .help("CSV with columns chapter, verse, text")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("pericopes_csv")
                .help("CSV with columns pericope_id, title, chapter, start_verse, end_verse [, order]")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("output_json")
                .help("Path for the output JSON document")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Print progress details to stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Abort before assembly if validation produced any warning")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("require-full-coverage")
                .long("require-full-coverage")
                .help("Treat coverage gaps and mismatches as fatal, not just warned")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("fallback-whitespace")
                .long("fallback-whitespace")
                .help("Whitespace-split verses whose text matches no token pattern")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("lemmas")
                .long("lemmas")
                .help("Emit lemma-only tokens ({\"lemma\": ...}) instead of the full triple")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .help("Mirror diagnostics into this file (best effort)"),
        );

    let matches = match command.try_get_matches() {
        Ok(matches) => matches,
        Err(err)
            if err.kind() == clap::error::ErrorKind::DisplayHelp
                || err.kind() == clap::error::ErrorKind::DisplayVersion =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            // Usage errors exit 1, not clap's default 2; 2 is reserved for
            // strict-mode aborts.
            let _ = err.print();
            std::process::exit(1);
        }
    };

    let verses_csv = matches
        .get_one::<String>("verses_csv")
        .expect("required argument");
    let pericopes_csv = matches
        .get_one::<String>("pericopes_csv")
        .expect("required argument");
    let output_json = matches
        .get_one::<String>("output_json")
        .expect("required argument");

    let verbose = matches.get_flag("verbose");
    let mut reporter = match matches.get_one::<String>("log-file") {
        Some(path) => Reporter::with_log_file(verbose, path),
        None => Reporter::new(verbose),
    };

    let options = PipelineOptions {
        strict: matches.get_flag("strict"),
        require_full_coverage: matches.get_flag("require-full-coverage"),
        fallback_whitespace: matches.get_flag("fallback-whitespace"),
        mode: if matches.get_flag("lemmas") {
            TokenMode::Lemma
        } else {
            TokenMode::Full
        },
    };

    reporter.info(&format!(
        "reading verses from {} and pericopes from {}",
        verses_csv, pericopes_csv
    ));

    let pipeline = Pipeline::new(options);
    let output = match pipeline.run_files(verses_csv, pericopes_csv) {
        Ok(output) => output,
        Err(PipelineError::StrictAbort { warnings }) => {
            for warning in &warnings {
                reporter.warning(&warning.to_string());
            }
            eprintln!(
                "Error: strict mode: {} validation warning(s), no output written",
                warnings.len()
            );
            std::process::exit(2);
        }
        Err(PipelineError::Load(err)) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    for warning in &output.report.warnings {
        reporter.warning(&warning.to_string());
    }
    for note in &output.notes {
        reporter.warning(&note.to_string());
    }

    let json = match to_json(&output.chapters) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("Error serializing output: {}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = std::fs::write(output_json, json) {
        eprintln!("Error writing {}: {}", output_json, err);
        std::process::exit(1);
    }

    println!("OK: wrote {} ({})", output_json, output.summary);

    // Warnings never suppress output, but a failing verdict still fails
    // the run once the document is on disk.
    if !output.report.ok {
        std::process::exit(1);
    }
}
