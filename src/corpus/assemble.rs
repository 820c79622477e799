//! Hierarchical document assembly
//!
//! Joins verses into their owning pericopes and nests the result as
//! chapter → pericope → verse → token. Assembly is pure and deterministic:
//! it does not consult the validator, because partial or overlapping
//! coverage is a legitimate input the caller may choose to accept.
//!
//! Verses that fall outside every pericope interval are silently excluded
//! from the output. This is deliberate: editions with continuous pericopes
//! treat uncovered verses as editorial leftovers, not content.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::corpus::records::{PericopeRecord, VerseRecord};
use crate::corpus::tokens::{extract_with_fallback, TokenMode, TokenPayload};

/// Top level of the output tree: one chapter and its pericopes.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterBlock {
    pub chapter: u32,
    pub pericopes: Vec<PericopeBlock>,
}

/// One pericope and the verses its interval selects.
#[derive(Debug, Clone, Serialize)]
pub struct PericopeBlock {
    pub id: String,
    pub title: String,
    pub start_verse: u32,
    pub end_verse: u32,
    pub verses: Vec<VerseBlock>,
}

/// One verse, decomposed into tokens.
#[derive(Debug, Clone, Serialize)]
pub struct VerseBlock {
    pub verse: u32,
    pub tokens: Vec<TokenPayload>,
}

/// Non-fatal observations made while assembling, surfaced in diagnostics.
#[derive(Debug, Clone)]
pub enum AssemblyNote {
    /// A selected verse yielded zero tokens; it is still emitted, empty.
    EmptyVerse {
        chapter: u32,
        verse: u32,
        snippet: String,
    },
    /// The whitespace-split fallback fired for a verse.
    FallbackTokenized { chapter: u32, verse: u32 },
}

impl fmt::Display for AssemblyNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyNote::EmptyVerse {
                chapter,
                verse,
                snippet,
            } => write!(
                f,
                "chapter {} verse {}: no tokens extracted from text '{}'",
                chapter, verse, snippet
            ),
            AssemblyNote::FallbackTokenized { chapter, verse } => write!(
                f,
                "chapter {} verse {}: whitespace-split fallback tokenization used",
                chapter, verse
            ),
        }
    }
}

/// Knobs for the assembly pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    /// Output naming for tokens.
    pub mode: TokenMode,
    /// Enable the degraded whitespace-split tokenizer for pattern-less texts.
    pub fallback_whitespace: bool,
}

/// The assembled tree plus the notes gathered along the way.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub chapters: Vec<ChapterBlock>,
    pub notes: Vec<AssemblyNote>,
}

fn snippet(text: &str) -> String {
    const MAX_CHARS: usize = 40;
    let mut out: String = text.chars().take(MAX_CHARS).collect();
    if text.chars().count() > MAX_CHARS {
        out.push_str("...");
    }
    out
}

/// Build the chapter → pericope → verse → token tree.
///
/// Both inputs are expected in loader order (canonical sort). The output
/// covers the union of chapter numbers appearing in either table, ascending;
/// a chapter present in only one table still appears, with the counterpart
/// empty. A pericope whose interval matches zero verses yields an empty
/// `verses` sequence.
pub fn assemble(
    verses: &[VerseRecord],
    pericopes: &[PericopeRecord],
    options: AssembleOptions,
) -> Assembly {
    let mut verses_by_chapter: BTreeMap<u32, Vec<&VerseRecord>> = BTreeMap::new();
    for v in verses {
        verses_by_chapter.entry(v.chapter).or_default().push(v);
    }
    let mut pericopes_by_chapter: BTreeMap<u32, Vec<&PericopeRecord>> = BTreeMap::new();
    for p in pericopes {
        pericopes_by_chapter.entry(p.chapter).or_default().push(p);
    }

    let chapter_numbers: BTreeSet<u32> = verses_by_chapter
        .keys()
        .chain(pericopes_by_chapter.keys())
        .copied()
        .collect();

    let mut chapters = Vec::with_capacity(chapter_numbers.len());
    let mut notes = Vec::new();
    let no_verses = Vec::new();
    let no_pericopes = Vec::new();

    for &chapter in &chapter_numbers {
        let chapter_verses = verses_by_chapter.get(&chapter).unwrap_or(&no_verses);
        let chapter_pericopes = pericopes_by_chapter.get(&chapter).unwrap_or(&no_pericopes);

        let mut blocks = Vec::with_capacity(chapter_pericopes.len());
        for p in chapter_pericopes {
            let mut verse_blocks = Vec::new();
            for v in chapter_verses
                .iter()
                .filter(|v| v.verse >= p.start_verse && v.verse <= p.end_verse)
            {
                let (tokens, degraded) =
                    extract_with_fallback(&v.text, options.fallback_whitespace);
                if degraded {
                    notes.push(AssemblyNote::FallbackTokenized {
                        chapter,
                        verse: v.verse,
                    });
                }
                if tokens.is_empty() {
                    notes.push(AssemblyNote::EmptyVerse {
                        chapter,
                        verse: v.verse,
                        snippet: snippet(&v.text),
                    });
                }
                verse_blocks.push(VerseBlock {
                    verse: v.verse,
                    tokens: tokens
                        .into_iter()
                        .map(|t| t.into_payload(options.mode))
                        .collect(),
                });
            }
            blocks.push(PericopeBlock {
                id: p.id.clone(),
                title: p.title.clone(),
                start_verse: p.start_verse,
                end_verse: p.end_verse,
                verses: verse_blocks,
            });
        }
        chapters.push(ChapterBlock {
            chapter,
            pericopes: blocks,
        });
    }

    Assembly { chapters, notes }
}
