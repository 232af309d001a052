//! # medname-parser
//!
//! Rule-based decomposition of pharmaceutical product names.
//!
//! A product name such as `BETASERC 16 MG 30 TB` is split into a pure name
//! (`BETASERC`), a dose (`16MG`), a pack (`30TB`) and its form terms (`TB`),
//! driven by two vocabularies: form terms and dose units.
//!
//! ## Pipeline
//!
//! ```ignore
//! use medname_parser::{batch, BatchConfig, Decomposer, VocabularySet};
//!
//! let vocab = VocabularySet::load("form_terms.txt", "dose_units.txt")?;
//! let decomposer = Decomposer::from_vocabularies(&vocab)?;
//! let paths = batch::BatchPaths::for_input("medicines.csv");
//! batch::run_batch(&paths, &decomposer, &BatchConfig::default())?;
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): decomposes batch rows in parallel via rayon.

#![warn(missing_docs)]

pub mod batch;
mod clean;
mod decompose;
pub mod pattern;
mod types;
pub mod vocabulary;

pub use batch::{clean_and_decompose, run_batch, BatchPaths, BatchReport};
pub use clean::clean_name;
pub use decompose::{decompose, Decomposer};
pub use types::{
    BatchConfig, BatchStats, ParseError, ParseResult, DEFAULT_CLEANED_COLUMN, DEFAULT_NAME_COLUMN,
};
pub use vocabulary::{load_terms, load_terms_from_reader, VocabularySet};

// Re-export medname-types for convenience
pub use medname_types;
