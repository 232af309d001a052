//! Ordered token vocabularies.

use std::collections::HashSet;

/// An ordered list of uppercase tokens (form terms or dose units).
///
/// Order is significant: when building alternation patterns the first
/// listed token wins if several could match at the same position.
/// Duplicates are allowed and kept.
///
/// # Examples
///
/// ```
/// use medname_types::Vocabulary;
///
/// let vocab: Vocabulary = ["tb ", "FTB"].into_iter().collect();
/// assert_eq!(vocab.as_slice(), &["TB", "FTB"]);
/// assert!(vocab.contains("TB"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Vocabulary {
    tokens: Vec<String>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token, trimmed and upper-cased. Blank tokens are ignored.
    pub fn push(&mut self, token: &str) {
        let token = token.trim();
        if !token.is_empty() {
            self.tokens.push(token.to_uppercase());
        }
    }

    /// Returns the number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns true if the vocabulary holds this exact token.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Returns the tokens in listed order.
    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    /// Iterates over the tokens in listed order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.tokens.iter()
    }

    /// Returns a copy without any token that also appears in `other`.
    ///
    /// Order is preserved. Used to keep dose units out of the form terms.
    pub fn without(&self, other: &Vocabulary) -> Vocabulary {
        let excluded: HashSet<&str> = other.iter().map(String::as_str).collect();
        Vocabulary {
            tokens: self
                .tokens
                .iter()
                .filter(|t| !excluded.contains(t.as_str()))
                .cloned()
                .collect(),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocab = Vocabulary::new();
        for token in iter {
            vocab.push(token.as_ref());
        }
        vocab
    }
}

impl<'a> IntoIterator for &'a Vocabulary {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_normalizes() {
        let mut vocab = Vocabulary::new();
        vocab.push("  ftb\t");
        vocab.push("");
        vocab.push("   ");
        assert_eq!(vocab.as_slice(), &["FTB"]);
        assert_eq!(vocab.len(), 1);
    }

    #[test]
    fn test_without_preserves_order() {
        let forms = Vocabulary::from_iter(["TB", "MG", "FTB", "ML", "KAP"]);
        let units = Vocabulary::from_iter(["ML", "MG"]);
        let filtered = forms.without(&units);
        assert_eq!(filtered.as_slice(), &["TB", "FTB", "KAP"]);
        assert!(!filtered.contains("MG"));
    }

    #[test]
    fn test_without_keeps_duplicates() {
        let forms = Vocabulary::from_iter(["TB", "TB", "MG"]);
        let units = Vocabulary::from_iter(["MG"]);
        assert_eq!(forms.without(&units).as_slice(), &["TB", "TB"]);
    }

    #[test]
    fn test_without_empty_other() {
        let forms = Vocabulary::from_iter(["TB"]);
        assert_eq!(forms.without(&Vocabulary::new()), forms);
    }
}
