use std::path::Path;

use log::{debug, warn};

use super::encoding::{decode, TextEncoding};
use super::model::{SpectralFile, Table};
use crate::error::{Error, Result};

/// Header of the spectral radiance column in instrument exports.
pub const DEFAULT_COLUMN: &str = "Le [W/(sr*sqm*nm)]";

/// Read buffer per line; instrument rows are short.
const LINE_BUFFER: usize = 256;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// What to pull out of each file and how to read it.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header cell of the column to extract from every table.
    pub column: String,
    pub encoding: TextEncoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            column: DEFAULT_COLUMN.to_string(),
            encoding: TextEncoding::default(),
        }
    }
}

/// Load one instrument CSV: decode, split into tables, read the data names
/// and extract the matching columns as numbers.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<SpectralFile> {
    let bytes = std::fs::read(path)?;
    let encoding = options.encoding.resolve(&bytes);
    let text = decode(&bytes, encoding)?;

    let tables = split_tables(&text)?;
    debug!("{}: {} tables", path.display(), tables.len());

    let data_names = data_names(&tables)?;
    let matching = extract_matching_columns(&tables, &options.column);
    if matching.is_empty() {
        warn!(
            "{}: no column with header '{}'",
            path.display(),
            options.column
        );
    }
    let series = to_numeric(&matching)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(SpectralFile {
        stem,
        data_names,
        series,
    })
}

// ---------------------------------------------------------------------------
// Table splitting
// ---------------------------------------------------------------------------

/// Split file text into blank-row delimited tables.
///
/// A row is blank when every field is empty after trimming. Runs of blank
/// rows never produce empty tables, and a trailing table needs no blank
/// row after it.
pub fn split_tables(text: &str) -> Result<Vec<Table>> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .buffer_capacity(LINE_BUFFER);
    let mut record = csv::StringRecord::new();

    let mut tables = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        let fields = split_fields(&builder, &mut record, line.trim())?;
        if fields.iter().all(|f| f.trim().is_empty()) {
            if !current.is_empty() {
                tables.push(Table::new(std::mem::take(&mut current)));
            }
        } else {
            current.push(fields);
        }
    }

    if !current.is_empty() {
        tables.push(Table::new(current));
    }

    Ok(tables)
}

/// Split one line on commas, honouring double quotes.
fn split_fields(
    builder: &csv::ReaderBuilder,
    record: &mut csv::StringRecord,
    line: &str,
) -> Result<Vec<String>> {
    let mut reader = builder.from_reader(line.as_bytes());
    if !reader.read_record(record)? {
        return Ok(Vec::new());
    }
    Ok(record.iter().map(str::to_string).collect())
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// Collect every column, across all tables, whose header cell is `header`.
///
/// Only the first `Table::width` columns of a table are considered. The
/// header cell itself is not part of the returned series.
pub fn extract_matching_columns(tables: &[Table], header: &str) -> Vec<Vec<String>> {
    let mut matching = Vec::new();
    for table in tables {
        for idx in 0..table.width() {
            let mut column = table.column(idx);
            if column.next() == Some(header) {
                matching.push(column.map(str::to_string).collect());
            }
        }
    }
    matching
}

/// Measurement names: the second row of the first table, minus its label cell.
pub fn data_names(tables: &[Table]) -> Result<Vec<String>> {
    tables
        .first()
        .and_then(|t| t.rows.get(1))
        .map(|row| row.iter().skip(1).cloned().collect())
        .ok_or(Error::MissingDataNames)
}

/// Convert extracted columns into a rectangular array of floats.
pub fn to_numeric(series: &[Vec<String>]) -> Result<Vec<Vec<f64>>> {
    let expected = series.first().map(Vec::len).unwrap_or(0);
    if let Some((idx, s)) = series.iter().enumerate().find(|(_, s)| s.len() != expected) {
        return Err(Error::RaggedSeries {
            series: idx,
            expected,
            found: s.len(),
        });
    }

    series
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(row, cell)| {
                    cell.trim().parse::<f64>().map_err(|_| Error::NotNumeric {
                        series: i,
                        row,
                        value: cell.clone(),
                    })
                })
                .collect::<Result<Vec<f64>>>()
        })
        .collect()
}
