//! Token extraction from raw verse text
//!
//! A verse's `text` field is a run of `<surface> <strongs> {<morph>}` triples,
//! e.g. `λόγος 3056 {N-NSM} ἦν 1510 {V-IAI3S}`. Extraction collects every
//! non-overlapping match of that triple in encounter order; residual text
//! between matches is dropped. A text with no matches yields an empty token
//! list, never an error.
//!
//! Serialization of tokens depends on the selected [`TokenMode`]: the full
//! triple (`greek`/`strongs`/`morph`) or a lemma-only shape (`lemma`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// The triple pattern: a non-whitespace, non-brace run, a decimal code, and a
/// brace-delimited grammar code.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^\s{}]+)\s+(\d+)\s+\{([^}]+)\}").expect("token pattern compiles"));

/// One lexical unit extracted from a verse's raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The surface form (the word as written).
    pub surface: String,
    /// Numeric lexicon code.
    pub strongs: String,
    /// Grammatical code from the brace-delimited segment.
    pub morph: String,
}

/// Output naming for serialized tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenMode {
    /// Serialize the full triple as `{greek, strongs, morph}`.
    #[default]
    Full,
    /// Serialize only the surface form as `{lemma}`.
    Lemma,
}

/// Serialized shape of a token. Field names follow the selected [`TokenMode`];
/// the array-of-objects shape and ordering are identical in both modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TokenPayload {
    Full {
        greek: String,
        strongs: String,
        morph: String,
    },
    Lemma {
        lemma: String,
    },
}

impl Token {
    /// Convert into the serializable shape for the given mode.
    pub fn into_payload(self, mode: TokenMode) -> TokenPayload {
        match mode {
            TokenMode::Full => TokenPayload::Full {
                greek: self.surface,
                strongs: self.strongs,
                morph: self.morph,
            },
            TokenMode::Lemma => TokenPayload::Lemma {
                lemma: self.surface,
            },
        }
    }
}

/// Extract all triple-pattern matches from `text`, in encounter order.
pub fn extract(text: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .captures_iter(text)
        .map(|cap| Token {
            surface: cap[1].to_string(),
            strongs: cap[2].to_string(),
            morph: cap[3].to_string(),
        })
        .collect()
}

/// Extract with the degraded whitespace-split escape hatch.
///
/// The fallback only runs when the primary pattern yields zero tokens and
/// `fallback` is enabled; it produces tokens with the surface filled and the
/// code fields empty. Returns the tokens plus whether the fallback actually
/// fired, so callers can surface the degradation in diagnostics.
pub fn extract_with_fallback(text: &str, fallback: bool) -> (Vec<Token>, bool) {
    let tokens = extract(text);
    if !tokens.is_empty() || !fallback {
        return (tokens, false);
    }
    let split: Vec<Token> = text
        .split_whitespace()
        .map(|word| Token {
            surface: word.to_string(),
            strongs: String::new(),
            morph: String::new(),
        })
        .collect();
    let fired = !split.is_empty();
    (split, fired)
}
