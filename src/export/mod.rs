//! Persistence of extracted spectra.
//!
//! `npy` writes one array per spectrum, `parquet` and `json` write one file
//! per CSV holding all of its spectra.

pub mod json;
pub mod npy;
pub mod parquet;

use std::path::{Path, PathBuf};

use log::debug;

use crate::data::model::Spectrum;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Npy,
    Parquet,
    Json,
}

impl OutputFormat {
    /// Directory under the data directory that receives this format.
    pub fn dir_name(self) -> &'static str {
        match self {
            OutputFormat::Npy => "npy",
            OutputFormat::Parquet => "parquet",
            OutputFormat::Json => "json",
        }
    }

    pub fn extension(self) -> &'static str {
        self.dir_name()
    }
}

/// Write the spectra of one CSV into `out_dir`, returning the created paths.
pub fn export(
    format: OutputFormat,
    out_dir: &Path,
    stem: &str,
    spectra: &[Spectrum],
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    match format {
        OutputFormat::Npy => {
            let mut written = Vec::with_capacity(spectra.len());
            for sp in spectra {
                let path = out_dir.join(series_file_name(stem, &sp.name, ext));
                npy::write_npy(&path, &sp.y)?;
                debug!("wrote {}", path.display());
                written.push(path);
            }
            Ok(written)
        }
        OutputFormat::Parquet => {
            let path = out_dir.join(format!("{stem}.{ext}"));
            parquet::write_parquet(&path, spectra)?;
            debug!("wrote {} ({} spectra)", path.display(), spectra.len());
            Ok(vec![path])
        }
        OutputFormat::Json => {
            let path = out_dir.join(format!("{stem}.{ext}"));
            json::write_json(&path, spectra)?;
            debug!("wrote {} ({} spectra)", path.display(), spectra.len());
            Ok(vec![path])
        }
    }
}

/// `<stem>_<name>.<ext>`, with characters that cannot appear in a file name
/// replaced by `_`.
pub fn series_file_name(stem: &str, name: &str, ext: &str) -> String {
    let name: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{stem}_{name}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(series_file_name("run1", "A", "npy"), "run1_A.npy");
        assert_eq!(series_file_name("run1", "試料 1", "png"), "run1_試料 1.png");
        assert_eq!(series_file_name("r", "a/b:c", "npy"), "r_a_b_c.npy");
    }

    #[test]
    fn npy_writes_one_file_per_spectrum() {
        let dir = tempfile::tempdir().unwrap();
        let spectra: Vec<Spectrum> = ["A", "B"]
            .iter()
            .map(|n| Spectrum {
                name: n.to_string(),
                source: "run".into(),
                x: vec![350.0],
                y: vec![1.0],
            })
            .collect();
        let written = export(OutputFormat::Npy, dir.path(), "run", &spectra).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.path().join("run_B.npy").is_file());

        let written = export(OutputFormat::Json, dir.path(), "run", &spectra).unwrap();
        assert_eq!(written, vec![dir.path().join("run.json")]);
    }
}
