//! Tabular input loading and normalization
//!
//! Two CSV tables feed the pipeline: verses (`chapter`, `verse`, `text`) and
//! pericope definitions (`pericope_id`, `title`, `chapter`, `start_verse`,
//! `end_verse`, optional `order`). Column names are matched case-insensitively
//! against a fixed required set; column order is free and extra columns are
//! ignored. Loaders return typed, canonically sorted records or a fatal
//! [`LoadError`] naming the offending input.
//!
//! Sorting uses stable sorts throughout, so rows with equal keys retain their
//! source order. Duplicate (chapter, verse) rows are kept, not deduplicated.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One verse row: chapter/verse coordinates plus the raw token blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRecord {
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

/// One pericope definition: an editor-titled inclusive verse interval within
/// a single chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PericopeRecord {
    pub id: String,
    pub title: String,
    pub chapter: u32,
    pub start_verse: u32,
    pub end_verse: u32,
    /// Explicit ordering within the chapter; when any row carries it, it
    /// takes precedence over (start_verse, end_verse) ordering.
    pub order: Option<u32>,
}

/// Errors that can occur while loading the input tables. All variants are
/// fatal: the pipeline aborts before validation.
#[derive(Debug, Clone)]
pub enum LoadError {
    /// IO error when opening or reading a file
    Io(String),
    /// CSV-level read error (malformed row, bad quoting, ...)
    Csv(String),
    /// A required column is absent from the header row
    MissingColumns {
        table: &'static str,
        missing: Vec<&'static str>,
        found: Vec<String>,
    },
    /// A numeric column holds a value that does not parse as an integer
    InvalidInteger {
        table: &'static str,
        row: usize,
        column: &'static str,
        value: String,
    },
    /// A pericope with start_verse > end_verse
    InvalidInterval {
        id: String,
        chapter: u32,
        start_verse: u32,
        end_verse: u32,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "IO error: {}", msg),
            LoadError::Csv(msg) => write!(f, "CSV error: {}", msg),
            LoadError::MissingColumns {
                table,
                missing,
                found,
            } => write!(
                f,
                "{} table is missing required column(s) [{}]; found columns: [{}]",
                table,
                missing.join(", "),
                found.join(", ")
            ),
            LoadError::InvalidInteger {
                table,
                row,
                column,
                value,
            } => write!(
                f,
                "{} table, data row {}: column '{}' must be an integer, got '{}'",
                table, row, column, value
            ),
            LoadError::InvalidInterval {
                id,
                chapter,
                start_verse,
                end_verse,
            } => write!(
                f,
                "pericope '{}' (chapter {}) has start_verse {} > end_verse {}",
                id, chapter, start_verse, end_verse
            ),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err.to_string())
    }
}

/// Resolve required column names against a header row, case-insensitively.
/// Returns the index of each required name, in the order given.
fn resolve_columns(
    table: &'static str,
    headers: &csv::StringRecord,
    required: &[&'static str],
) -> Result<Vec<usize>, LoadError> {
    let mut indices = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
        {
            Some(idx) => indices.push(idx),
            None => missing.push(*name),
        }
    }
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            table,
            missing,
            found: headers.iter().map(|h| h.to_string()).collect(),
        });
    }
    Ok(indices)
}

/// Resolve an optional column, if present in the header row.
fn resolve_optional(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_integer(
    table: &'static str,
    row: usize,
    column: &'static str,
    raw: Option<&str>,
) -> Result<u32, LoadError> {
    let raw = raw.unwrap_or("").trim();
    raw.parse::<u32>().map_err(|_| LoadError::InvalidInteger {
        table,
        row,
        column,
        value: raw.to_string(),
    })
}

/// Load and normalize the verses table from any reader.
///
/// Output is stably sorted by (chapter, verse) ascending.
pub fn load_verses_from_reader<R: Read>(reader: R) -> Result<Vec<VerseRecord>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = resolve_columns("verses", &headers, &["chapter", "verse", "text"])?;
    let (chapter_col, verse_col, text_col) = (cols[0], cols[1], cols[2]);

    let mut verses = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        let data_row = idx + 1;
        verses.push(VerseRecord {
            chapter: parse_integer("verses", data_row, "chapter", row.get(chapter_col))?,
            verse: parse_integer("verses", data_row, "verse", row.get(verse_col))?,
            text: row.get(text_col).unwrap_or("").to_string(),
        });
    }
    verses.sort_by(|a, b| (a.chapter, a.verse).cmp(&(b.chapter, b.verse)));
    Ok(verses)
}

/// Load and normalize the verses table from a file path.
pub fn load_verses<P: AsRef<Path>>(path: P) -> Result<Vec<VerseRecord>, LoadError> {
    load_verses_from_reader(File::open(path)?)
}

/// Load and normalize the pericopes table from any reader.
///
/// Output is stably sorted by (chapter, order, start_verse, end_verse) when
/// the `order` column is present, else (chapter, start_verse, end_verse).
/// A row with start_verse > end_verse is a fatal interval error.
pub fn load_pericopes_from_reader<R: Read>(reader: R) -> Result<Vec<PericopeRecord>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let cols = resolve_columns(
        "pericopes",
        &headers,
        &["pericope_id", "title", "chapter", "start_verse", "end_verse"],
    )?;
    let (id_col, title_col, chapter_col, start_col, end_col) =
        (cols[0], cols[1], cols[2], cols[3], cols[4]);
    let order_col = resolve_optional(&headers, "order");

    let mut pericopes = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let row = result?;
        let data_row = idx + 1;
        let record = PericopeRecord {
            id: row.get(id_col).unwrap_or("").to_string(),
            title: row.get(title_col).unwrap_or("").to_string(),
            chapter: parse_integer("pericopes", data_row, "chapter", row.get(chapter_col))?,
            start_verse: parse_integer("pericopes", data_row, "start_verse", row.get(start_col))?,
            end_verse: parse_integer("pericopes", data_row, "end_verse", row.get(end_col))?,
            order: match order_col {
                Some(col) => Some(parse_integer("pericopes", data_row, "order", row.get(col))?),
                None => None,
            },
        };
        if record.start_verse > record.end_verse {
            return Err(LoadError::InvalidInterval {
                id: record.id,
                chapter: record.chapter,
                start_verse: record.start_verse,
                end_verse: record.end_verse,
            });
        }
        pericopes.push(record);
    }

    if order_col.is_some() {
        pericopes.sort_by(|a, b| {
            (a.chapter, a.order, a.start_verse, a.end_verse)
                .cmp(&(b.chapter, b.order, b.start_verse, b.end_verse))
        });
    } else {
        pericopes.sort_by(|a, b| {
            (a.chapter, a.start_verse, a.end_verse).cmp(&(b.chapter, b.start_verse, b.end_verse))
        });
    }
    Ok(pericopes)
}

/// Load and normalize the pericopes table from a file path.
pub fn load_pericopes<P: AsRef<Path>>(path: P) -> Result<Vec<PericopeRecord>, LoadError> {
    load_pericopes_from_reader(File::open(path)?)
}
