//! Parser-specific types: errors, batch configuration and statistics.

use thiserror::Error;

/// Errors that can occur while loading vocabularies or processing a batch.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error reading or writing a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A generated extraction pattern failed to compile.
    #[error("Pattern build error: {0}")]
    Pattern(#[from] regex::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A vocabulary source contained no tokens.
    #[error("Vocabulary is empty: {source_name}")]
    EmptyVocabulary {
        /// Path or label of the empty source.
        source_name: String,
    },

    /// The configured name column is absent from the input table.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// The name of the missing column.
        column: String,
    },
}

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Default header of the raw product-name column.
pub const DEFAULT_NAME_COLUMN: &str = "Название лекарства";

/// Default header of the cleaned product-name column.
pub const DEFAULT_CLEANED_COLUMN: &str = "Название лекарства (чисто)";

/// Configuration for batch table processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Header of the column holding raw product names.
    pub name_column: String,
    /// Header of the appended column holding cleaned names.
    pub cleaned_column: String,
    /// Whether output files start with a UTF-8 byte order mark.
    pub write_bom: bool,
    /// Rows decomposed per chunk (affects memory usage).
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            name_column: DEFAULT_NAME_COLUMN.to_string(),
            cleaned_column: DEFAULT_CLEANED_COLUMN.to_string(),
            write_bom: true,
            batch_size: 10_000,
        }
    }
}

impl BatchConfig {
    /// Creates a config reading names from the given column.
    ///
    /// The cleaned column is named after it with a ` (clean)` suffix
    /// unless the default column is used.
    pub fn for_column(name_column: impl Into<String>) -> Self {
        let name_column = name_column.into();
        let cleaned_column = if name_column == DEFAULT_NAME_COLUMN {
            DEFAULT_CLEANED_COLUMN.to_string()
        } else {
            format!("{} (clean)", name_column)
        };
        Self {
            name_column,
            cleaned_column,
            ..Default::default()
        }
    }
}

/// Statistics from processing one input table.
#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    /// Total data rows read.
    pub total_rows: usize,
    /// Rows with PURE, DOSE and PACK all present.
    pub parsed_rows: usize,
    /// Rows routed to manual review.
    pub unparsed_rows: usize,
    /// Time taken in milliseconds.
    pub elapsed_ms: u64,
}

impl BatchStats {
    /// Returns the percentage of rows that parsed fully.
    pub fn parse_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.parsed_rows as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Returns true if every row parsed fully.
    pub fn all_parsed(&self) -> bool {
        self.unparsed_rows == 0
    }
}
