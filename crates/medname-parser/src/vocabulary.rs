//! Vocabulary file loading.
//!
//! Vocabulary files hold one token per line. Tokens are trimmed and
//! upper-cased; blank lines are skipped and file order is kept.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use medname_types::Vocabulary;

use crate::types::{ParseError, ParseResult};

/// Loads a vocabulary from a line-delimited text file.
///
/// # Errors
/// Returns an error if the file is missing, unreadable, or has no tokens.
pub fn load_terms<P: AsRef<Path>>(path: P) -> ParseResult<Vocabulary> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ParseError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let file = File::open(path)?;
    let vocab = load_terms_from_reader(BufReader::new(file))?;

    if vocab.is_empty() {
        return Err(ParseError::EmptyVocabulary {
            source_name: path.display().to_string(),
        });
    }

    tracing::debug!("Loaded {} terms from {}", vocab.len(), path.display());
    Ok(vocab)
}

/// Loads a vocabulary from any reader, one token per line.
///
/// An empty source yields an empty vocabulary; callers decide whether
/// that is acceptable.
pub fn load_terms_from_reader<R: Read>(reader: R) -> ParseResult<Vocabulary> {
    let reader = BufReader::new(reader);
    let mut vocab = Vocabulary::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = if i == 0 {
            // Handle UTF-8 BOM at start of file
            line.trim_start_matches('\u{feff}')
        } else {
            line.as_str()
        };
        vocab.push(line);
    }

    Ok(vocab)
}

/// The pair of vocabularies that drives decomposition.
///
/// `form_terms` never contains a token that is also a dose unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularySet {
    /// Form and pack abbreviations, with dose units filtered out.
    pub form_terms: Vocabulary,
    /// Dosage units.
    pub dose_units: Vocabulary,
}

impl VocabularySet {
    /// Builds a set from raw vocabularies, removing dose units from the form terms.
    pub fn new(form_terms: Vocabulary, dose_units: Vocabulary) -> Self {
        let filtered = form_terms.without(&dose_units);
        let dropped = form_terms.len() - filtered.len();
        if dropped > 0 {
            tracing::debug!("Dropped {} form terms that are also dose units", dropped);
        }
        Self {
            form_terms: filtered,
            dose_units,
        }
    }

    /// Loads both vocabulary files.
    ///
    /// # Errors
    /// Either file being missing, unreadable or empty is fatal.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(form_path: P, dose_path: Q) -> ParseResult<Self> {
        let dose_units = load_terms(dose_path)?;
        let form_terms = load_terms(form_path)?;
        let set = Self::new(form_terms, dose_units);

        if set.form_terms.is_empty() {
            tracing::warn!("Every form term is also a dose unit; pack and form extraction disabled");
        }

        tracing::info!(
            "Loaded {} form terms and {} dose units",
            set.form_terms.len(),
            set.dose_units.len()
        );
        Ok(set)
    }
}
