//! Run diagnostics and reporting
//!
//! The core stages return their findings as values; this module is the sink
//! that turns them into operator-facing output. [`Reporter`] writes to
//! stderr, mirrored into an optional best-effort log file, and
//! [`RunSummary`] renders the one-line tally printed at the end of a run.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Counts for the end-of-run summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub chapters: usize,
    pub verses: usize,
    pub pericopes: usize,
    pub warnings: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chapters, {} verses, {} pericopes, {} warnings",
            self.chapters, self.verses, self.pericopes, self.warnings
        )
    }
}

/// Stderr reporter with an optional log file mirror.
///
/// Info lines are printed only when verbose; warnings always. Every line is
/// also appended to the log file when one is open. Failing to open the log
/// file degrades to stderr-only with a single notice; it never fails a run.
pub struct Reporter {
    verbose: bool,
    log: Option<File>,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Reporter { verbose, log: None }
    }

    /// Attach a log file, best effort.
    pub fn with_log_file<P: AsRef<Path>>(verbose: bool, path: P) -> Self {
        let log = match File::create(path.as_ref()) {
            Ok(file) => Some(file),
            Err(err) => {
                eprintln!(
                    "note: could not open log file {}: {}",
                    path.as_ref().display(),
                    err
                );
                None
            }
        };
        Reporter { verbose, log }
    }

    pub fn info(&mut self, message: &str) {
        if self.verbose {
            eprintln!("{}", message);
        }
        self.log_line(message);
    }

    pub fn warning(&mut self, message: &str) {
        eprintln!("warning: {}", message);
        self.log_line(&format!("warning: {}", message));
    }

    fn log_line(&mut self, line: &str) {
        if let Some(file) = self.log.as_mut() {
            // Best effort; a failing log sink must not fail the run.
            let _ = writeln!(file, "{}", line);
        }
    }
}
