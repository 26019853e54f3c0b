use log::warn;

// ---------------------------------------------------------------------------
// Table – one blank-line delimited block of a CSV file
// ---------------------------------------------------------------------------

/// A contiguous block of non-blank CSV rows.
///
/// Rows are kept as they were read; they need not have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Table { rows }
    }

    /// Number of complete columns, i.e. the length of the shortest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Column `idx` top to bottom, header cell included.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[idx].as_str())
    }
}

// ---------------------------------------------------------------------------
// WavelengthAxis – the x values shared by every series
// ---------------------------------------------------------------------------

/// Evenly spaced wavelength axis in nanometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavelengthAxis {
    pub start: f64,
    pub step: f64,
}

impl Default for WavelengthAxis {
    fn default() -> Self {
        WavelengthAxis {
            start: 350.0,
            step: 1.0,
        }
    }
}

impl WavelengthAxis {
    /// The first `n` points of the axis.
    pub fn points(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.start + i as f64 * self.step).collect()
    }
}

// ---------------------------------------------------------------------------
// Spectrum – one extracted series, ready for export
// ---------------------------------------------------------------------------

/// A single named spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Measurement name from the data-name row.
    pub name: String,
    /// Stem of the CSV file the series came from.
    pub source: String,
    /// Wavelength axis (x).
    pub x: Vec<f64>,
    /// Extracted values (y) – same length as `x`.
    pub y: Vec<f64>,
}

// ---------------------------------------------------------------------------
// SpectralFile – everything extracted from one CSV
// ---------------------------------------------------------------------------

/// Data names and numeric series pulled from one CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFile {
    /// File stem, used to name every output.
    pub stem: String,
    pub data_names: Vec<String>,
    /// One entry per matching column, all of equal length.
    pub series: Vec<Vec<f64>>,
}

impl SpectralFile {
    /// Pair series with data names positionally.
    ///
    /// Extra names or extra series are dropped.
    pub fn spectra(&self, axis: &WavelengthAxis) -> Vec<Spectrum> {
        if self.data_names.len() != self.series.len() {
            warn!(
                "{}: {} data names but {} series, keeping {}",
                self.stem,
                self.data_names.len(),
                self.series.len(),
                self.data_names.len().min(self.series.len())
            );
        }
        self.series
            .iter()
            .zip(&self.data_names)
            .map(|(y, name)| Spectrum {
                name: name.clone(),
                source: self.stem.clone(),
                x: axis.points(y.len()),
                y: y.clone(),
            })
            .collect()
    }
}
