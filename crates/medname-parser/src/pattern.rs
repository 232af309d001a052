//! Extraction pattern construction.
//!
//! Vocabulary tokens are escaped and alternated in listed order, so the
//! first listed token wins when several match at the same position.
//! An empty vocabulary yields no pattern rather than an empty alternation,
//! which would otherwise match bare numbers.

use medname_types::Vocabulary;
use regex::Regex;

use crate::types::ParseResult;

/// Joins escaped tokens into a non-capturing alternation.
///
/// Returns `None` for an empty vocabulary.
pub fn alternation(vocab: &Vocabulary) -> Option<String> {
    if vocab.is_empty() {
        return None;
    }
    let body = vocab
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    Some(format!("(?:{})", body))
}

/// Number with optional `/`, `.` or `,` separated parts, optional spacing, then a dose unit.
///
/// Matches `16 MG`, `180/2MG`, `2,5 MG`.
pub fn dose_pattern(dose_units: &Vocabulary) -> ParseResult<Option<Regex>> {
    build(alternation(dose_units).map(|alt| format!(r"\d+(?:[/.,]\d+)*\s*{}", alt)))
}

/// Number, at most one whitespace character, then a form term.
///
/// Matches `30 TB`, `28FTB`.
pub fn pack_pattern(form_terms: &Vocabulary) -> ParseResult<Option<Regex>> {
    build(alternation(form_terms).map(|alt| format!(r"\d+\s?{}", alt)))
}

/// Any form term as a whole word.
pub fn form_pattern(form_terms: &Vocabulary) -> ParseResult<Option<Regex>> {
    build(alternation(form_terms).map(|alt| format!(r"\b{}\b", alt)))
}

/// One literal token as a whole word.
///
/// Returns `None` for an empty token.
pub fn whole_word(token: &str) -> ParseResult<Option<Regex>> {
    if token.is_empty() {
        return Ok(None);
    }
    build(Some(format!(r"\b{}\b", regex::escape(token))))
}

fn build(pattern: Option<String>) -> ParseResult<Option<Regex>> {
    match pattern {
        Some(pattern) => {
            tracing::debug!("Compiling pattern {}", pattern);
            Ok(Some(Regex::new(&pattern)?))
        }
        None => Ok(None),
    }
}
