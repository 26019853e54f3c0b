use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::data::model::Spectrum;
use crate::error::Result;

/// One record of the JSON output, `[{ "x": [...], "y": [...], "name", "source" }]`.
#[derive(Debug, Serialize)]
struct Record<'a> {
    x: &'a [f64],
    y: &'a [f64],
    name: &'a str,
    source: &'a str,
}

/// Write all spectra of one CSV file as a records-oriented JSON array.
///
/// Non-finite values become `null`.
pub fn write_json(path: &Path, spectra: &[Spectrum]) -> Result<()> {
    let records: Vec<Record<'_>> = spectra
        .iter()
        .map(|s| Record {
            x: &s.x,
            y: &s.y,
            name: &s.name,
            source: &s.source,
        })
        .collect();

    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &records)?;
    out.flush()?;
    Ok(())
}
