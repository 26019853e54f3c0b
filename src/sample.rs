//! Synthetic spectroradiometer exports for trying out the converter.
//!
//! Each file has a metadata table, a colorimetry table and one spectral table
//! per light source, encoded as shift-JIS like the instrument writes them.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::data::loader::DEFAULT_COLUMN;
use crate::data::model::WavelengthAxis;
use crate::error::{Error, Result};

/// Samples per spectral table: 350..=1000 nm in 1 nm steps.
pub const SAMPLES: usize = 651;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Light sources: (name, peaks as (centre nm, width nm, W/(sr·m²·nm))).
fn sources() -> [(&'static str, &'static [(f64, f64, f64)]); 3] {
    [
        ("白色LED", &[(450.0, 10.0, 0.020), (560.0, 60.0, 0.012)]),
        ("ハロゲン", &[(900.0, 250.0, 0.030)]),
        ("蛍光灯", &[(436.0, 3.0, 0.010), (546.0, 3.0, 0.018), (611.0, 4.0, 0.015)]),
    ]
}

/// Sum of the peaks plus a small ripple that differs between files.
fn spectrum(wavelengths: &[f64], peaks: &[(f64, f64, f64)], file_no: usize) -> Vec<f64> {
    let scale = 1.0 + 0.1 * file_no as f64;
    let phase = file_no as f64;
    wavelengths
        .iter()
        .map(|&wl| {
            let signal: f64 = peaks
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(wl, mu, sigma, amp * scale))
                .sum();
            (signal + 2e-5 * (wl / 7.0 + phase).sin()).max(0.0)
        })
        .collect()
}

/// Text of export number `file_no` (zero based).
pub fn render_csv(file_no: usize) -> String {
    let wavelengths = WavelengthAxis::default().points(SAMPLES);
    let sources = sources();
    let ids: Vec<String> = (1..=sources.len()).map(|i| format!("No.{i}")).collect();
    let names: Vec<&str> = sources.iter().map(|(name, _)| *name).collect();

    let mut out = String::new();
    out.push_str(&format!("データ,{}\n", ids.join(",")));
    out.push_str(&format!("測定名,{}\n", names.join(",")));
    out.push_str(&format!(
        "測定日時,{}\n",
        vec![format!("2024/05/{:02} 10:00:00", file_no + 1); ids.len()].join(",")
    ));
    out.push_str(&format!("測定モード,{}\n", vec!["Le"; ids.len()].join(",")));
    out.push('\n');

    let spectra: Vec<Vec<f64>> = sources
        .iter()
        .map(|(_, peaks)| spectrum(&wavelengths, peaks, file_no))
        .collect();

    let radiance: Vec<String> = spectra
        .iter()
        .map(|s| format!("{:.6}", s.iter().sum::<f64>()))
        .collect();
    out.push_str(&format!(",{}\n", ids.join(",")));
    out.push_str(&format!("Le [W/(sr*sqm)],{}\n", radiance.join(",")));
    out.push('\n');

    for spectrum in &spectra {
        let peak = spectrum.iter().cloned().fold(f64::MIN_POSITIVE, f64::max);
        out.push_str(&format!("波長 [nm],{DEFAULT_COLUMN},Le(相対)\n"));
        for (wl, v) in wavelengths.iter().zip(spectrum) {
            out.push_str(&format!("{wl},{v:.8},{:.6}\n", v / peak));
        }
        out.push('\n');
    }
    out
}

/// Write `files` exports as `<dir>/csv/sample_NN.csv`.
pub fn write_samples(dir: &Path, files: usize) -> Result<Vec<PathBuf>> {
    let csv_dir = dir.join(crate::pipeline::CSV_DIR);
    fs::create_dir_all(&csv_dir)?;

    let mut written = Vec::with_capacity(files);
    for file_no in 0..files {
        let text = render_csv(file_no);
        let (bytes, used, had_errors) = encoding_rs::SHIFT_JIS.encode(&text);
        if had_errors {
            return Err(Error::Unencodable {
                encoding: used.name(),
            });
        }
        let path = csv_dir.join(format!("sample_{:02}.csv", file_no + 1));
        fs::write(&path, &bytes)?;
        info!("wrote {} ({} measurements)", path.display(), sources().len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_file, LoadOptions};

    #[test]
    fn samples_load_as_three_full_spectra() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_samples(dir.path(), 2).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1], dir.path().join("csv").join("sample_02.csv"));

        let file = load_file(&paths[0], &LoadOptions::default()).unwrap();
        assert_eq!(file.data_names, vec!["白色LED", "ハロゲン", "蛍光灯"]);
        assert_eq!(file.series.len(), 3);
        assert!(file.series.iter().all(|s| s.len() == SAMPLES));

        let spectra = file.spectra(&WavelengthAxis::default());
        assert_eq!(spectra[2].x.last(), Some(&1000.0));
    }

    #[test]
    fn files_differ() {
        assert_ne!(render_csv(0), render_csv(1));
        assert_eq!(render_csv(3), render_csv(3));
    }
}
