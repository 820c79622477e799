//! Pericope partition validation
//!
//! Checks, per chapter, that the pericope intervals form a sane partition of
//! the chapter's verses: non-overlapping, contiguous, and covering the full
//! verse range. All findings are collected into a [`ValidationReport`];
//! validation never short-circuits on the first problem.
//!
//! Severity is policy-driven: overlaps, pericopes over verse-less chapters,
//! and intervals running past the chapter's last verse always fail the
//! verdict; gaps and end-of-chapter coverage mismatches only fail it when
//! full coverage is required.

use std::collections::BTreeMap;
use std::fmt;

use crate::corpus::records::{PericopeRecord, VerseRecord};

/// Classification of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A pericope starts at or before the previous pericope's end
    Overlap,
    /// A pericope starts later than one verse past the previous end
    Gap,
    /// The chapter's pericopes stop short of (or past) its last verse
    CoverageMismatch,
    /// A pericope targets a chapter with no verse rows at all
    ChapterWithoutVerses,
    /// A pericope's end_verse exceeds the chapter's last observed verse
    EndBeyondChapter,
}

/// One validation finding, tied to a chapter.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub chapter: u32,
    message: String,
}

impl Warning {
    fn new(kind: WarningKind, chapter: u32, message: String) -> Self {
        Warning {
            kind,
            chapter,
            message,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Outcome of validating the pericope table against verse coverage.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Pass/fail verdict under the active strictness policy.
    pub ok: bool,
    /// Every finding, in chapter order then pericope order.
    pub warnings: Vec<Warning>,
}

/// Validate the pericope partition of every chapter.
///
/// Both inputs are expected in loader order (canonical sort). Per chapter, a
/// running "last covered verse" cursor starts at 0 and advances to
/// `max(cursor, end_verse)` after each pericope, so out-of-order end values
/// are tolerated. The first pericope of a chapter can never trigger the
/// overlap warning (the cursor is still 0); a late start there surfaces as a
/// gap instead.
pub fn validate(
    verses: &[VerseRecord],
    pericopes: &[PericopeRecord],
    require_full_coverage: bool,
) -> ValidationReport {
    let mut chapter_max: BTreeMap<u32, u32> = BTreeMap::new();
    for v in verses {
        let entry = chapter_max.entry(v.chapter).or_insert(0);
        *entry = (*entry).max(v.verse);
    }

    let mut by_chapter: BTreeMap<u32, Vec<&PericopeRecord>> = BTreeMap::new();
    for p in pericopes {
        by_chapter.entry(p.chapter).or_default().push(p);
    }

    let mut ok = true;
    let mut warnings = Vec::new();

    for (&chapter, chapter_pericopes) in &by_chapter {
        let max_verse = chapter_max.get(&chapter).copied();
        let mut last_end = 0u32;

        for p in chapter_pericopes {
            if max_verse.is_none() {
                warnings.push(Warning::new(
                    WarningKind::ChapterWithoutVerses,
                    chapter,
                    format!(
                        "pericope '{}' targets chapter {}, which has no verses",
                        p.id, chapter
                    ),
                ));
                ok = false;
            }

            if p.start_verse <= last_end && last_end != 0 {
                warnings.push(Warning::new(
                    WarningKind::Overlap,
                    chapter,
                    format!(
                        "chapter {}: pericope '{}' starts at verse {}, overlapping coverage up to verse {}",
                        chapter, p.id, p.start_verse, last_end
                    ),
                ));
                ok = false;
            } else if p.start_verse != last_end + 1 {
                warnings.push(Warning::new(
                    WarningKind::Gap,
                    chapter,
                    format!(
                        "chapter {}: gap before pericope '{}' (verses {}..{} uncovered)",
                        chapter,
                        p.id,
                        last_end + 1,
                        p.start_verse.saturating_sub(1)
                    ),
                ));
                if require_full_coverage {
                    ok = false;
                }
            }

            if let Some(max_verse) = max_verse {
                if p.end_verse > max_verse {
                    warnings.push(Warning::new(
                        WarningKind::EndBeyondChapter,
                        chapter,
                        format!(
                            "chapter {}: pericope '{}' ends at verse {}, past the last verse {}",
                            chapter, p.id, p.end_verse, max_verse
                        ),
                    ));
                    ok = false;
                }
            }

            last_end = last_end.max(p.end_verse);
        }

        if let Some(max_verse) = max_verse {
            if last_end != max_verse {
                warnings.push(Warning::new(
                    WarningKind::CoverageMismatch,
                    chapter,
                    format!(
                        "chapter {}: pericopes cover up to verse {}, but the chapter ends at verse {}",
                        chapter, last_end, max_verse
                    ),
                ));
                if require_full_coverage {
                    ok = false;
                }
            }
        }
    }

    ValidationReport { ok, warnings }
}
