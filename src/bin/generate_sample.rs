use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use spectra2npy::sample::write_samples;

/// Write synthetic spectroradiometer exports to <DIR>/csv for trying out the converter.
#[derive(Debug, Parser)]
struct Args {
    /// Data directory to populate
    #[arg(short, long, default_value = "./data")]
    dir: PathBuf,

    /// Number of CSV files to write
    #[arg(short, long, default_value_t = 2)]
    files: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    write_samples(&args.dir, args.files)
        .with_context(|| format!("writing samples to {}", args.dir.display()))?;
    Ok(())
}
