//! Batch pipeline: load → validate → assemble → serialize
//!
//! The pipeline runs to completion within one invocation: both tables are
//! read once and fully materialized, the tree is built in memory, and the
//! JSON document is rendered once at the end. Any fatal condition surfaces
//! as an error immediately; there is no retry or partial output.
//!
//! # Usage
//!
//! ```rust
//! use pericope::corpus::pipeline::{Pipeline, PipelineOptions, to_json};
//!
//! let pipeline = Pipeline::new(PipelineOptions::default());
//! let output = pipeline.run_files("verses.csv", "pericopes.csv")?;
//! let json = to_json(&output.chapters)?;
//! ```

use std::fmt;
use std::path::Path;

use crate::corpus::assemble::{assemble, AssembleOptions, AssemblyNote, ChapterBlock};
use crate::corpus::records::{
    load_pericopes, load_verses, LoadError, PericopeRecord, VerseRecord,
};
use crate::corpus::report::RunSummary;
use crate::corpus::tokens::TokenMode;
use crate::corpus::validate::{validate, ValidationReport, Warning};

/// Run policy for a pipeline invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Abort before assembly if validation produced any warning.
    pub strict: bool,
    /// Treat gaps and coverage mismatches as failing, not just warned.
    pub require_full_coverage: bool,
    /// Enable the degraded whitespace-split tokenizer.
    pub fallback_whitespace: bool,
    /// Output naming for tokens.
    pub mode: TokenMode,
}

/// Errors that end a pipeline run without producing output.
#[derive(Debug)]
pub enum PipelineError {
    /// Fatal load/schema/interval error from either input table
    Load(LoadError),
    /// Strict mode: validation produced warnings, assembly was not attempted
    StrictAbort { warnings: Vec<Warning> },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Load(err) => write!(f, "{}", err),
            PipelineError::StrictAbort { warnings } => write!(
                f,
                "strict mode: aborting with {} validation warning(s)",
                warnings.len()
            ),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<LoadError> for PipelineError {
    fn from(err: LoadError) -> Self {
        PipelineError::Load(err)
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub chapters: Vec<ChapterBlock>,
    pub report: ValidationReport,
    pub notes: Vec<AssemblyNote>,
    pub summary: RunSummary,
}

/// The batch transform, configured once and run over loaded records.
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Pipeline { options }
    }

    /// Validate and assemble already-loaded records.
    ///
    /// Assembly proceeds even over an invalid partition unless strict mode
    /// aborts first; the caller decides what to do with a failing verdict.
    pub fn run(
        &self,
        verses: &[VerseRecord],
        pericopes: &[PericopeRecord],
    ) -> Result<PipelineOutput, PipelineError> {
        let report = validate(verses, pericopes, self.options.require_full_coverage);
        if self.options.strict && !report.warnings.is_empty() {
            return Err(PipelineError::StrictAbort {
                warnings: report.warnings,
            });
        }

        let assembly = assemble(
            verses,
            pericopes,
            AssembleOptions {
                mode: self.options.mode,
                fallback_whitespace: self.options.fallback_whitespace,
            },
        );
        let summary = RunSummary {
            chapters: assembly.chapters.len(),
            verses: verses.len(),
            pericopes: pericopes.len(),
            warnings: report.warnings.len(),
        };
        Ok(PipelineOutput {
            chapters: assembly.chapters,
            report,
            notes: assembly.notes,
            summary,
        })
    }

    /// Load both CSV tables, then run.
    pub fn run_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        verses_csv: P,
        pericopes_csv: Q,
    ) -> Result<PipelineOutput, PipelineError> {
        let verses = load_verses(verses_csv)?;
        let pericopes = load_pericopes(pericopes_csv)?;
        self.run(&verses, &pericopes)
    }
}

/// Render the chapter tree as the output JSON document.
///
/// Pretty-printed with a trailing newline; byte-identical across runs on
/// unchanged inputs.
pub fn to_json(chapters: &[ChapterBlock]) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(chapters)?;
    out.push('\n');
    Ok(out)
}
