use std::process::ExitCode;

use clap::Parser;
use spectra2npy::cli::Args;
use spectra2npy::pipeline;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Args::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::from(2);
        }
    };

    match pipeline::run(&config) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            log::error!(
                "{} of {} files failed",
                summary.failed.len(),
                summary.failed.len() + summary.processed
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
