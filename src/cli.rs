use std::path::PathBuf;

use clap::Parser;

use crate::data::encoding::TextEncoding;
use crate::data::loader::{LoadOptions, DEFAULT_COLUMN};
use crate::data::model::WavelengthAxis;
use crate::error::{Error, Result};
use crate::export::OutputFormat;
use crate::pipeline::Config;

/// Extract one column from the stacked tables of spectroradiometer CSV
/// exports and save each measurement as a NumPy array.
#[derive(Debug, Parser)]
#[command(name = "spectra2npy", version, about)]
pub struct Args {
    /// Path to the data directory (input is read from <DIR>/csv)
    #[arg(short, long, env = "SPECTRA_DIR", default_value = "./data")]
    pub dir: PathBuf,

    /// Header of the column to extract
    #[arg(short, long, env = "SPECTRA_COLUMN", default_value = DEFAULT_COLUMN)]
    pub columns: String,

    /// Disable plotting of spectre data
    #[arg(short = 'p', long, env = "SPECTRA_NO_PLOT")]
    pub no_plot: bool,

    /// Output format
    #[arg(short, long, env = "SPECTRA_FORMAT", value_enum, default_value_t = OutputFormat::Npy)]
    pub format: OutputFormat,

    /// Input text encoding label, or "auto" to detect it
    #[arg(short, long, env = "SPECTRA_ENCODING", default_value = "shift_jis")]
    pub encoding: String,

    /// Wavelength of the first sample in nm
    #[arg(long, env = "SPECTRA_WAVELENGTH_START", default_value_t = 350.0, allow_negative_numbers = true)]
    pub wavelength_start: f64,

    /// Wavelength spacing between samples in nm
    #[arg(long, env = "SPECTRA_WAVELENGTH_STEP", default_value_t = 1.0)]
    pub wavelength_step: f64,
}

impl Args {
    /// Validate and turn the parsed flags into a run configuration.
    pub fn into_config(self) -> Result<Config> {
        let encoding = TextEncoding::from_label(&self.encoding)?;
        if !self.wavelength_start.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "wavelength start must be finite, got {}",
                self.wavelength_start
            )));
        }
        if !(self.wavelength_step.is_finite() && self.wavelength_step > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "wavelength step must be positive, got {}",
                self.wavelength_step
            )));
        }

        Ok(Config {
            dir: self.dir,
            load: LoadOptions {
                column: self.columns,
                encoding,
            },
            format: self.format,
            axis: WavelengthAxis {
                start: self.wavelength_start,
                step: self.wavelength_step,
            },
            plot: !self.no_plot,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serialises tests that read or write `SPECTRA_*` variables.
    static ENV: Mutex<()> = Mutex::new(());

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("spectra2npy").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config.dir, PathBuf::from("./data"));
        assert_eq!(config.load.column, "Le [W/(sr*sqm*nm)]");
        assert_eq!(config.load.encoding, TextEncoding::Fixed(encoding_rs::SHIFT_JIS));
        assert_eq!(config.format, OutputFormat::Npy);
        assert_eq!(config.axis, WavelengthAxis::default());
        assert!(config.plot);
    }

    #[test]
    fn short_flags() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        let config = parse(&["-d", "/tmp/x", "-c", "Lv", "-p", "-f", "parquet", "-e", "auto"])
            .into_config()
            .unwrap();
        assert_eq!(config.dir, PathBuf::from("/tmp/x"));
        assert_eq!(config.load.column, "Lv");
        assert_eq!(config.load.encoding, TextEncoding::Detect);
        assert_eq!(config.format, OutputFormat::Parquet);
        assert!(!config.plot);
    }

    #[test]
    fn rejects_bad_values() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        assert!(matches!(
            parse(&["--wavelength-step", "0"]).into_config(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            parse(&["-e", "nope"]).into_config(),
            Err(Error::UnknownEncoding(_))
        ));
        assert!(Args::try_parse_from(["spectra2npy", "-f", "xlsx"]).is_err());
    }

    #[test]
    fn environment_fills_missing_flags() {
        let _env = ENV.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("SPECTRA_COLUMN", "Le(相対)");
        std::env::set_var("SPECTRA_NO_PLOT", "1");
        std::env::set_var("SPECTRA_FORMAT", "json");

        let from_env = parse(&[]).into_config();
        let overridden = parse(&["-c", "Lv", "-f", "npy"]).into_config();

        std::env::remove_var("SPECTRA_COLUMN");
        std::env::remove_var("SPECTRA_NO_PLOT");
        std::env::remove_var("SPECTRA_FORMAT");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.load.column, "Le(相対)");
        assert_eq!(from_env.format, OutputFormat::Json);
        assert!(!from_env.plot);

        let overridden = overridden.unwrap();
        assert_eq!(overridden.load.column, "Lv");
        assert_eq!(overridden.format, OutputFormat::Npy);
        assert!(!overridden.plot);
    }
}
