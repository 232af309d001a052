//! Decomposed product name record.
//!
//! This module provides the `ParsedName` struct, the four-field result
//! of splitting one raw product name.

use crate::Field;

/// A product name split into its name, dose, pack and form parts.
///
/// Every field is a plain string; an empty string means nothing was found.
///
/// # Examples
///
/// ```
/// use medname_types::ParsedName;
///
/// let parsed = ParsedName::new("BETASERC", "16MG", "30TB", "TB");
/// assert!(!parsed.needs_attention());
/// assert_eq!(parsed.form_tokens().collect::<Vec<_>>(), vec!["TB"]);
///
/// let unparsed = ParsedName::new("ASPIRIN", "", "20TB", "TB");
/// assert!(unparsed.needs_attention());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub struct ParsedName {
    /// Name left after dose, pack and form tokens are stripped.
    pub pure: String,
    /// First dosage match with whitespace removed (e.g. `180/2MG`).
    pub dose: String,
    /// First pack match with whitespace removed (e.g. `28FTB`).
    pub pack: String,
    /// Form terms found after dose/pack removal, joined by single spaces.
    pub forms: String,
}

impl ParsedName {
    /// Creates a record from its four field values.
    pub fn new(
        pure: impl Into<String>,
        dose: impl Into<String>,
        pack: impl Into<String>,
        forms: impl Into<String>,
    ) -> Self {
        Self {
            pure: pure.into(),
            dose: dose.into(),
            pack: pack.into(),
            forms: forms.into(),
        }
    }

    /// Returns the value of a single field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Pure => &self.pure,
            Field::Dose => &self.dose,
            Field::Pack => &self.pack,
            Field::Forms => &self.forms,
        }
    }

    /// Returns the four values in output column order.
    pub fn values(&self) -> [&str; 4] {
        [&self.pure, &self.dose, &self.pack, &self.forms]
    }

    /// Iterates over the individual form tokens.
    pub fn form_tokens(&self) -> impl Iterator<Item = &str> {
        self.forms.split_whitespace()
    }

    /// Returns true if PURE, DOSE or PACK is empty.
    ///
    /// Rows that need attention are routed to manual review. An empty
    /// FORMS field alone does not count.
    pub fn needs_attention(&self) -> bool {
        Field::ALL
            .into_iter()
            .any(|field| field.required() && self.get(field).is_empty())
    }

    /// Returns the required fields that came out empty.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| field.required() && self.get(*field).is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_empty() {
        let parsed = ParsedName::default();
        assert_eq!(parsed.values(), ["", "", "", ""]);
        assert!(parsed.needs_attention());
        assert_eq!(
            parsed.missing_fields(),
            vec![Field::Pure, Field::Dose, Field::Pack]
        );
    }

    #[test]
    fn test_forms_alone_does_not_flag() {
        let parsed = ParsedName::new("BETASERC", "16MG", "30TB", "");
        assert!(!parsed.needs_attention());
        assert!(parsed.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_pack_flags() {
        let parsed = ParsedName::new("BETASERC", "16MG", "", "TB");
        assert!(parsed.needs_attention());
        assert_eq!(parsed.missing_fields(), vec![Field::Pack]);
    }

    #[test]
    fn test_form_tokens_split() {
        let parsed = ParsedName::new("X", "", "10TB", "TB FTB");
        assert_eq!(parsed.form_tokens().collect::<Vec<_>>(), vec!["TB", "FTB"]);
        assert_eq!(parsed.get(Field::Forms), "TB FTB");
    }
}
