//! Product-name decomposition.
//!
//! Splits a raw product name into PURE, DOSE, PACK and FORMS:
//!
//! 1. Upper-case the name.
//! 2. DOSE is the first `number [sep number]* unit` match, whitespace removed.
//! 3. PACK is the first `number form` match over the full name, whitespace removed.
//! 4. FORMS are all whole-word form terms left after plain substring removal
//!    of DOSE and PACK.
//! 5. PURE is the name with the dose match, the pack match and every FORMS
//!    token removed as whole words, whitespace collapsed.
//!
//! Step 4 removes the compacted values as plain substrings while step 5
//! removes the matched text as whole words. The two differ when the match
//! had inner spacing or sits inside a longer word; both are kept as is.

use std::collections::HashMap;
use std::sync::RwLock;

use medname_types::{ParsedName, Vocabulary};
use regex::Regex;

use crate::pattern;
use crate::types::ParseResult;
use crate::vocabulary::VocabularySet;

/// Compiled extraction patterns for one pair of vocabularies.
///
/// Build once per batch and share across rows; `decompose` takes `&self`.
/// The only interior state is a cache of removal patterns, which never
/// affects results.
///
/// # Example
///
/// ```
/// use medname_parser::Decomposer;
/// use medname_types::Vocabulary;
///
/// let forms = Vocabulary::from_iter(["TB", "FTB"]);
/// let units = Vocabulary::from_iter(["MG"]);
/// let decomposer = Decomposer::new(&forms, &units).unwrap();
///
/// let parsed = decomposer.decompose("Betaserc 16 mg 30 tb");
/// assert_eq!(parsed.pure, "BETASERC");
/// assert_eq!(parsed.dose, "16MG");
/// assert_eq!(parsed.pack, "30TB");
/// assert_eq!(parsed.forms, "TB");
/// ```
#[derive(Debug)]
pub struct Decomposer {
    dose: Option<Regex>,
    pack: Option<Regex>,
    forms: Option<Regex>,
    /// Whole-word removal patterns keyed by token text. Seeded with the
    /// form terms; dose and pack match texts are added as they are seen.
    removers: RwLock<HashMap<String, Regex>>,
}

impl Clone for Decomposer {
    fn clone(&self) -> Self {
        let removers = match self.removers.read() {
            Ok(cache) => cache.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Self {
            dose: self.dose.clone(),
            pack: self.pack.clone(),
            forms: self.forms.clone(),
            removers: RwLock::new(removers),
        }
    }
}

impl Decomposer {
    /// Compiles patterns for the given vocabularies.
    ///
    /// Form terms that are also dose units are dropped first.
    pub fn new(form_terms: &Vocabulary, dose_units: &Vocabulary) -> ParseResult<Self> {
        Self::from_vocabularies(&VocabularySet::new(form_terms.clone(), dose_units.clone()))
    }

    /// Compiles patterns for a loaded vocabulary set.
    pub fn from_vocabularies(vocab: &VocabularySet) -> ParseResult<Self> {
        let mut removers = HashMap::with_capacity(vocab.form_terms.len());
        for term in &vocab.form_terms {
            if let Some(re) = pattern::whole_word(term)? {
                removers.insert(term.clone(), re);
            }
        }

        Ok(Self {
            dose: pattern::dose_pattern(&vocab.dose_units)?,
            pack: pattern::pack_pattern(&vocab.form_terms)?,
            forms: pattern::form_pattern(&vocab.form_terms)?,
            removers: RwLock::new(removers),
        })
    }

    /// Splits one raw name into its four fields.
    ///
    /// Never fails; fields that could not be found are empty.
    pub fn decompose(&self, raw_name: &str) -> ParsedName {
        let name_up = raw_name.to_uppercase();

        let dose_match = first_match(self.dose.as_ref(), &name_up);
        let pack_match = first_match(self.pack.as_ref(), &name_up);
        let dose = strip_whitespace(dose_match);
        let pack = strip_whitespace(pack_match);

        let mut name_cut = name_up.clone();
        for found in [&dose, &pack] {
            if !found.is_empty() {
                name_cut = name_cut.replace(found.as_str(), "");
            }
        }

        let form_tokens: Vec<&str> = match &self.forms {
            Some(re) => re.find_iter(&name_cut).map(|m| m.as_str()).collect(),
            None => Vec::new(),
        };

        let mut remaining = name_up.clone();
        for token in [dose_match, pack_match].into_iter().chain(form_tokens.iter().copied()) {
            remaining = self.remove_word(&remaining, token);
        }
        let pure = collapse_whitespace(&remaining);

        let parsed = ParsedName::new(pure, dose, pack, form_tokens.join(" "));
        tracing::trace!("Decomposed {:?} into {:?}", raw_name, parsed);
        parsed
    }

    /// Removes every whole-word occurrence of `token` from `text`.
    fn remove_word(&self, text: &str, token: &str) -> String {
        match self.remover(token) {
            Some(re) => re.replace_all(text, "").into_owned(),
            None => text.to_string(),
        }
    }

    /// Returns the cached whole-word pattern for `token`, compiling it on first use.
    fn remover(&self, token: &str) -> Option<Regex> {
        if token.is_empty() {
            return None;
        }
        if let Ok(cache) = self.removers.read() {
            if let Some(re) = cache.get(token) {
                return Some(re.clone());
            }
        }
        match pattern::whole_word(token) {
            Ok(Some(re)) => {
                if let Ok(mut cache) = self.removers.write() {
                    cache.insert(token.to_string(), re.clone());
                }
                Some(re)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Could not build removal pattern for {:?}: {}", token, e);
                None
            }
        }
    }
}

/// Decomposes a single name, compiling patterns for this call only.
///
/// Prefer [`Decomposer`] when processing more than one name.
pub fn decompose(
    raw_name: &str,
    form_terms: &Vocabulary,
    dose_units: &Vocabulary,
) -> ParseResult<ParsedName> {
    Ok(Decomposer::new(form_terms, dose_units)?.decompose(raw_name))
}

fn first_match<'a>(re: Option<&Regex>, text: &'a str) -> &'a str {
    re.and_then(|re| re.find(text)).map_or("", |m| m.as_str())
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_decomposer(forms: &[&str], units: &[&str]) -> Decomposer {
        Decomposer::new(&forms.iter().collect(), &units.iter().collect()).unwrap()
    }

    fn standard() -> Decomposer {
        make_decomposer(&["TB", "FTB"], &["MG"])
    }

    fn assert_parsed(parsed: &ParsedName, pure: &str, dose: &str, pack: &str, forms: &str) {
        assert_eq!(parsed.pure, pure, "pure");
        assert_eq!(parsed.dose, dose, "dose");
        assert_eq!(parsed.pack, pack, "pack");
        assert_eq!(parsed.forms, forms, "forms");
    }

    #[test]
    fn test_basic_case() {
        let parsed = standard().decompose("BETASERC 16 MG 30 TB");
        assert_parsed(&parsed, "BETASERC", "16MG", "30TB", "TB");
    }

    #[test]
    fn test_fractional_dose() {
        let parsed = standard().decompose("TARKA 180/2 MG 28 FTB");
        assert_parsed(&parsed, "TARKA", "180/2MG", "28FTB", "FTB");
    }

    #[test]
    fn test_unexpected_chars() {
        let parsed = standard().decompose("BIZARREΩ 100 MG ??? 30 TB");
        assert_parsed(&parsed, "BIZARREΩ ???", "100MG", "30TB", "TB");
    }

    #[test]
    fn test_empty_input() {
        let parsed = standard().decompose("");
        assert_eq!(parsed, ParsedName::default());
    }

    #[test]
    fn test_form_token_twice() {
        let parsed = standard().decompose("X TB 10 TB");
        assert_eq!(parsed.pack, "10TB");
        assert_eq!(parsed.dose, "");
        assert_eq!(parsed.forms, "TB TB");
        assert!(parsed.form_tokens().any(|t| t == "TB"));
        assert_eq!(parsed.pure, "X");
    }

    #[test]
    fn test_lowercase_input() {
        let parsed = standard().decompose("betaserc 24 mg 50 tb");
        assert_parsed(&parsed, "BETASERC", "24MG", "50TB", "TB");
    }

    #[test]
    fn test_compact_tokens_cut_before_form_search() {
        // Compact dose and pack are removed as substrings before FORMS is searched.
        let parsed = standard().decompose("ASPIRIN 100MG 20TB");
        assert_parsed(&parsed, "ASPIRIN", "100MG", "20TB", "");
    }

    #[test]
    fn test_decimal_dose() {
        let parsed = make_decomposer(&["KAP"], &["MG", "ML"]).decompose("DEPAKIN 2,5 ML 1 KAP");
        assert_parsed(&parsed, "DEPAKIN", "2,5ML", "1KAP", "KAP");
    }

    #[test]
    fn test_pack_inside_word_survives_in_pure() {
        // Plain substring cut in step 4, whole-word removal in step 5.
        let parsed = standard().decompose("ABC20TBX 20TB");
        assert_parsed(&parsed, "ABC20TBX", "", "20TB", "");
    }

    #[test]
    fn test_only_first_dose_and_pack() {
        let parsed = standard().decompose("DUO 5 MG 10 MG 30 TB 60 TB");
        assert_eq!(parsed.dose, "5MG");
        assert_eq!(parsed.pack, "30TB");
        assert_eq!(parsed.forms, "TB TB");
        assert_eq!(parsed.pure, "DUO 10 MG 60");
    }

    #[test]
    fn test_unparsed_name_is_normalized() {
        let parsed = standard().decompose("  SOME   PLAIN\tNAME  ");
        assert_parsed(&parsed, "SOME PLAIN NAME", "", "", "");
        assert!(parsed.needs_attention());
    }

    #[test]
    fn test_punctuation_only() {
        let parsed = standard().decompose("?!.,/ -- **");
        assert_parsed(&parsed, "?!.,/ -- **", "", "", "");
    }

    #[test]
    fn test_dose_unit_not_used_as_form() {
        // MG is listed as a form term too but dose units take precedence.
        let parsed = make_decomposer(&["MG", "TB"], &["MG"]).decompose("NAME 20 MG 30 TB");
        assert_parsed(&parsed, "NAME", "20MG", "30TB", "TB");
    }

    #[test]
    fn test_first_listed_form_wins() {
        let parsed = make_decomposer(&["T", "TB"], &["MG"]).decompose("X 30 TB");
        assert_eq!(parsed.pack, "30T");
        // `T` cannot end a whole word inside `TB`, so the form search falls through to `TB`.
        assert_eq!(parsed.forms, "TB");
        assert_eq!(parsed.pure, "X 30");
    }

    #[test]
    fn test_metacharacter_tokens() {
        let parsed = make_decomposer(&["TB.", "(FTB)"], &["MG+"]).decompose("CURIOUS 10 MG+ 20 TB.");
        assert_eq!(parsed.dose, "10MG+");
        assert_eq!(parsed.pack, "20TB.");

        // Unescaped, `.` would match any character and `+` would repeat G.
        let parsed = make_decomposer(&["TB."], &["MG+"]).decompose("OTHER 10 MGG 20 TBX");
        assert_parsed(&parsed, "OTHER 10 MGG 20 TBX", "", "", "");
    }

    #[test]
    fn test_empty_form_vocabulary() {
        let parsed = make_decomposer(&["MG"], &["MG"]).decompose("NAME 20 MG 30 TB");
        assert_parsed(&parsed, "NAME 30 TB", "20MG", "", "");
    }

    #[test]
    fn test_deterministic() {
        let decomposer = standard();
        let a = decomposer.decompose("TARKA 180/2 MG 28 FTB");
        let b = decomposer.decompose("TARKA 180/2 MG 28 FTB");
        assert_eq!(a, b);
    }

    #[test]
    fn test_whitespace_invariants() {
        let decomposer = standard();
        for input in [
            "  A  16 MG   30 TB  ",
            "\tB\n 5MG 10TB",
            "TB",
            "   ",
            "C - 1 TB - 2 MG",
        ] {
            let parsed = decomposer.decompose(input);
            assert!(!parsed.pure.contains("  "), "{:?}", parsed);
            assert_eq!(parsed.pure, parsed.pure.trim(), "{:?}", parsed);

            let squashed = strip_whitespace(&input.to_uppercase());
            assert!(squashed.contains(&parsed.dose), "{:?}", parsed);
            assert!(squashed.contains(&parsed.pack), "{:?}", parsed);
        }
    }

    #[test]
    fn test_free_function_matches_decomposer() {
        let forms: Vocabulary = ["TB", "FTB"].into_iter().collect();
        let units: Vocabulary = ["MG"].into_iter().collect();
        let parsed = decompose("BETASERC 16 MG 30 TB", &forms, &units).unwrap();
        assert_eq!(parsed, standard().decompose("BETASERC 16 MG 30 TB"));
    }

    #[test]
    fn test_removal_patterns_reused_across_rows() {
        let decomposer = standard();
        let cached = |d: &Decomposer| d.removers.read().unwrap().len();
        assert_eq!(cached(&decomposer), 2);

        decomposer.decompose("BETASERC 16 MG 30 TB");
        {
            let cache = decomposer.removers.read().unwrap();
            assert!(cache.contains_key("16 MG"));
            assert!(cache.contains_key("30 TB"));
        }
        assert_eq!(cached(&decomposer), 4);

        let parsed = decomposer.decompose("VERTIGO 16 MG 30 TB");
        assert_parsed(&parsed, "VERTIGO", "16MG", "30TB", "TB");
        assert_eq!(cached(&decomposer), 4);

        let cloned = decomposer.clone();
        assert_eq!(cached(&cloned), 4);
        assert_eq!(cloned.decompose("TARKA 180/2 MG 28 FTB").pure, "TARKA");
    }

    #[test]
    fn test_decomposer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Decomposer>();
    }
}
