use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, error, info, warn};

use crate::color::generate_palette;
use crate::data::loader::{load_file, LoadOptions};
use crate::data::model::WavelengthAxis;
use crate::error::{Error, Result};
use crate::export::{self, series_file_name, OutputFormat};
use crate::render::plot::save_plot;

/// Directory under the data directory holding the PNG plots.
pub const PLOT_DIR: &str = "spectre";
/// Directory under the data directory holding the input CSV files.
pub const CSV_DIR: &str = "csv";

// ---------------------------------------------------------------------------
// Run configuration and result
// ---------------------------------------------------------------------------

/// Everything a conversion run needs, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory; input is read from `<dir>/csv`.
    pub dir: PathBuf,
    pub load: LoadOptions,
    pub format: OutputFormat,
    pub axis: WavelengthAxis,
    /// Whether to render a PNG per spectrum.
    pub plot: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./data"),
            load: LoadOptions::default(),
            format: OutputFormat::default(),
            axis: WavelengthAxis::default(),
            plot: true,
        }
    }
}

/// What a run did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunSummary {
    /// CSV files converted without error.
    pub processed: usize,
    /// CSV files that could not be converted.
    pub failed: Vec<PathBuf>,
    /// Spectra exported across all files.
    pub spectra: usize,
    /// Files written (arrays or per-file tables, plus plots).
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Batch driver
// ---------------------------------------------------------------------------

/// Convert every `<dir>/csv/*.csv`.
///
/// Missing input is an error. A failure on one file is logged and the run
/// moves on to the next.
pub fn run(config: &Config) -> Result<RunSummary> {
    let csv_files = discover(&config.dir)?;
    info!(
        "{} csv files in {}",
        csv_files.len(),
        config.dir.join(CSV_DIR).display()
    );

    let out_dir = config.dir.join(config.format.dir_name());
    fs::create_dir_all(&out_dir)?;
    let plot_dir = config.dir.join(PLOT_DIR);
    if config.plot {
        fs::create_dir_all(&plot_dir)?;
    }

    let mut summary = RunSummary::default();
    for path in &csv_files {
        match convert_file(config, path, &out_dir, &plot_dir) {
            Ok((spectra, written)) => {
                info!(
                    "{}: {} spectra, {} files",
                    path.display(),
                    spectra,
                    written.len()
                );
                summary.processed += 1;
                summary.spectra += spectra;
                summary.written.extend(written);
            }
            Err(e) => {
                error!("{}: {e:#}", path.display());
                summary.failed.push(path.clone());
            }
        }
    }

    info!(
        "done: {} converted, {} failed, {} spectra",
        summary.processed,
        summary.failed.len(),
        summary.spectra
    );
    Ok(summary)
}

/// Sorted list of `<dir>/csv/*.csv`.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let csv_dir = dir.join(CSV_DIR);
    if !csv_dir.is_dir() {
        return Err(Error::MissingCsvDir(csv_dir));
    }

    let pattern = format!("{}/*.csv", glob::Pattern::escape(&csv_dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(Error::NoCsvFiles(csv_dir));
    }
    Ok(files)
}

/// Load, export and optionally plot one CSV file.
fn convert_file(
    config: &Config,
    path: &Path,
    out_dir: &Path,
    plot_dir: &Path,
) -> anyhow::Result<(usize, Vec<PathBuf>)> {
    let file = load_file(path, &config.load).context("loading")?;
    let spectra = file.spectra(&config.axis);

    let mut written = export::export(config.format, out_dir, &file.stem, &spectra)
        .with_context(|| format!("writing {}", out_dir.display()))?;

    if config.plot {
        let colors = generate_palette(spectra.len());
        for (sp, color) in spectra.iter().zip(colors) {
            let png = plot_dir.join(series_file_name(&file.stem, &sp.name, "png"));
            save_plot(&png, sp, color).with_context(|| format!("plotting {}", png.display()))?;
            debug!("wrote {}", png.display());
            written.push(png);
        }
    }

    Ok((spectra.len(), written))
}
