//! # medname-types
//!
//! Type definitions for decomposed pharmaceutical product names.
//!
//! This crate provides the value types shared by the parser and the
//! command-line runner: the token vocabularies that drive extraction and
//! the four-field record a product name is split into.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use medname_types::{Field, ParsedName, Vocabulary};
//!
//! let forms = Vocabulary::from_iter(["TB", "FTB", "MG"]);
//! let units = Vocabulary::from_iter(["MG"]);
//! assert_eq!(forms.without(&units).as_slice(), &["TB", "FTB"]);
//!
//! let parsed = ParsedName::new("BETASERC", "16MG", "30TB", "TB");
//! assert!(!parsed.needs_attention());
//! assert_eq!(parsed.get(Field::Dose), "16MG");
//! ```

#![warn(missing_docs)]

mod field;
mod parsed;
mod vocabulary;

// Re-export all public types at crate root
pub use field::Field;
pub use parsed::ParsedName;
pub use vocabulary::Vocabulary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _vocab = Vocabulary::new();
        let _parsed = ParsedName::default();
        let _field = Field::Pure;
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let parsed = ParsedName::new("TARKA", "180/2MG", "28FTB", "FTB");

        let json = serde_json::to_string(&parsed).unwrap();
        assert!(json.contains("\"PURE\":\"TARKA\""));
        let back: ParsedName = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, back);
    }
}
