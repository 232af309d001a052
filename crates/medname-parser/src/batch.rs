//! CSV batch processing.
//!
//! Reads a table of product names, decomposes the configured name column
//! and writes the table back with the cleaned name and the four parsed
//! fields appended. Rows missing PURE, DOSE or PACK are collected
//! separately for manual review.
//!
//! ```ignore
//! let vocab = VocabularySet::load("form_terms.txt", "dose_units.txt")?;
//! let decomposer = Decomposer::from_vocabularies(&vocab)?;
//! let paths = BatchPaths::for_input("medicines.csv");
//! let report = run_batch(&paths, &decomposer, &BatchConfig::default())?;
//! println!("{} rows need attention", report.stats.unparsed_rows);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use medname_types::{Field, ParsedName};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::clean::clean_name;
use crate::decompose::Decomposer;
use crate::types::{BatchConfig, BatchStats, ParseError, ParseResult};

/// UTF-8 byte order mark written at the start of output files.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Result of processing one table.
#[derive(Debug, Clone, Default)]
pub struct TableOutput {
    /// Headers of the written table, appended columns included.
    pub headers: StringRecord,
    /// Output rows that need attention, in input order.
    pub unparsed: Vec<StringRecord>,
    /// Row counts and timing.
    pub stats: BatchStats,
}

/// Reads a CSV table, decomposes each row and writes the extended table.
///
/// # Errors
/// Fails if the input is not valid CSV, the name column is missing, or
/// the output cannot be written.
pub fn process_table<R: Read, W: Write>(
    input: R,
    mut output: W,
    decomposer: &Decomposer,
    config: &BatchConfig,
) -> ParseResult<TableOutput> {
    let start = Instant::now();

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let input_headers = read_headers(&mut reader)?;
    let name_idx = input_headers
        .iter()
        .position(|h| h == config.name_column)
        .ok_or_else(|| ParseError::MissingColumn {
            column: config.name_column.clone(),
        })?;

    let mut headers = input_headers.clone();
    headers.push_field(&config.cleaned_column);
    for field in Field::ALL {
        headers.push_field(field.column_name());
    }

    if config.write_bom {
        output.write_all(UTF8_BOM)?;
    }
    let mut writer = WriterBuilder::new().flexible(true).from_writer(output);
    writer.write_record(&headers)?;

    let mut stats = BatchStats::default();
    let mut unparsed = Vec::new();
    let mut records = reader.records();
    let batch_size = config.batch_size.max(1);

    loop {
        let chunk = records
            .by_ref()
            .take(batch_size)
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        if chunk.is_empty() {
            break;
        }

        let results = decompose_chunk(decomposer, &chunk, name_idx);
        for (record, (cleaned, parsed)) in chunk.iter().zip(results) {
            if record.len() > input_headers.len() {
                tracing::warn!(
                    "Row {} has {} fields but the header has {}; extra fields dropped",
                    stats.total_rows + 1,
                    record.len(),
                    input_headers.len()
                );
            }
            let row = extend_record(record, input_headers.len(), &cleaned, &parsed);
            writer.write_record(&row)?;

            stats.total_rows += 1;
            if parsed.needs_attention() {
                tracing::debug!(
                    "Row {} needs attention, missing {:?}",
                    stats.total_rows,
                    parsed.missing_fields()
                );
                stats.unparsed_rows += 1;
                unparsed.push(row);
            } else {
                stats.parsed_rows += 1;
            }
        }
        tracing::debug!("Processed {} rows", stats.total_rows);
    }

    writer.flush()?;
    stats.elapsed_ms = start.elapsed().as_millis() as u64;

    Ok(TableOutput {
        headers,
        unparsed,
        stats,
    })
}

/// Writes a header row followed by the given rows.
pub fn write_table<W: Write>(
    mut output: W,
    headers: &StringRecord,
    rows: &[StringRecord],
    config: &BatchConfig,
) -> ParseResult<()> {
    if config.write_bom {
        output.write_all(UTF8_BOM)?;
    }
    let mut writer = WriterBuilder::new().flexible(true).from_writer(output);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// File locations for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPaths {
    /// Input CSV table.
    pub input: PathBuf,
    /// Extended output table.
    pub output: PathBuf,
    /// Table of rows needing attention, written only when non-empty.
    pub unparsed: PathBuf,
}

impl BatchPaths {
    /// Uses `parsed_<stem>.csv` and `unparsed_<stem>.csv` next to the input.
    pub fn for_input<P: AsRef<Path>>(input: P) -> Self {
        let input = input.as_ref().to_path_buf();
        let output = sibling_path(&input, &input, "parsed_");
        let unparsed = sibling_path(&input, &output, "unparsed_");
        Self {
            input,
            output,
            unparsed,
        }
    }

    /// Overrides the output path; the unparsed table moves next to it.
    pub fn with_output<P: AsRef<Path>>(mut self, output: P) -> Self {
        self.output = output.as_ref().to_path_buf();
        self.unparsed = sibling_path(&self.input, &self.output, "unparsed_");
        self
    }

    /// Overrides the unparsed table path.
    pub fn with_unparsed<P: AsRef<Path>>(mut self, unparsed: P) -> Self {
        self.unparsed = unparsed.as_ref().to_path_buf();
        self
    }
}

/// Outcome of a file-based batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Row counts and timing.
    pub stats: BatchStats,
    /// Where the extended table was written.
    pub output: PathBuf,
    /// Where the unparsed rows were written, if any.
    pub unparsed: Option<PathBuf>,
}

/// Processes one CSV file end to end.
///
/// # Errors
/// Fails if the input is missing, the name column is absent, or any
/// file cannot be read or written.
pub fn run_batch(
    paths: &BatchPaths,
    decomposer: &Decomposer,
    config: &BatchConfig,
) -> ParseResult<BatchReport> {
    if !paths.input.exists() {
        return Err(ParseError::FileNotFound {
            path: paths.input.display().to_string(),
        });
    }

    tracing::info!("Processing {}", paths.input.display());
    let input = BufReader::new(File::open(&paths.input)?);
    let output = BufWriter::new(File::create(&paths.output)?);
    let table = process_table(input, output, decomposer, config)?;
    tracing::info!(
        "Wrote {} rows to {} in {} ms ({:.1}% parsed)",
        table.stats.total_rows,
        paths.output.display(),
        table.stats.elapsed_ms,
        table.stats.parse_rate()
    );

    let unparsed = if table.stats.all_parsed() {
        tracing::info!("All rows parsed");
        None
    } else {
        let file = BufWriter::new(File::create(&paths.unparsed)?);
        write_table(file, &table.headers, &table.unparsed, config)?;
        tracing::warn!(
            "Saved {} unparsed rows to {}",
            table.unparsed.len(),
            paths.unparsed.display()
        );
        Some(paths.unparsed.clone())
    };

    Ok(BatchReport {
        stats: table.stats,
        output: paths.output.clone(),
        unparsed,
    })
}

/// Reads the header row, dropping a UTF-8 BOM from the first header.
fn read_headers<R: Read>(reader: &mut csv::Reader<R>) -> ParseResult<StringRecord> {
    let raw = reader.headers()?;
    Ok(raw
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}') } else { h })
        .collect())
}

/// Cleans a raw name and decomposes it, returning the cleaned name alongside.
///
/// This is what every batch row goes through, so single names run through
/// it decompose exactly as they would inside a table.
pub fn clean_and_decompose(decomposer: &Decomposer, raw_name: &str) -> (String, ParsedName) {
    let cleaned = clean_name(raw_name);
    (cleaned.to_string(), decomposer.decompose(cleaned))
}

fn decompose_cell(decomposer: &Decomposer, record: &StringRecord, idx: usize) -> (String, ParsedName) {
    clean_and_decompose(decomposer, record.get(idx).unwrap_or(""))
}

#[cfg(feature = "parallel")]
fn decompose_chunk(
    decomposer: &Decomposer,
    chunk: &[StringRecord],
    idx: usize,
) -> Vec<(String, ParsedName)> {
    chunk
        .par_iter()
        .map(|record| decompose_cell(decomposer, record, idx))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn decompose_chunk(
    decomposer: &Decomposer,
    chunk: &[StringRecord],
    idx: usize,
) -> Vec<(String, ParsedName)> {
    chunk
        .iter()
        .map(|record| decompose_cell(decomposer, record, idx))
        .collect()
}

/// Pads or truncates a record to `width` and appends the cleaned name and parsed fields.
fn extend_record(
    record: &StringRecord,
    width: usize,
    cleaned: &str,
    parsed: &ParsedName,
) -> StringRecord {
    let mut row = record.clone();
    row.truncate(width);
    while row.len() < width {
        row.push_field("");
    }
    row.push_field(cleaned);
    for value in parsed.values() {
        row.push_field(value);
    }
    row
}

/// `<dir of anchor>/<prefix><stem of input>.csv`
fn sibling_path(input: &Path, anchor: &Path, prefix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{}{}.csv", prefix, stem);
    match anchor.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
