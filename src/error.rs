use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while converting a data directory.
#[derive(Debug, Error)]
pub enum Error {
    #[error("csv directory does not exist.")]
    MissingCsvDir(PathBuf),
    #[error("csv file does not exist.")]
    NoCsvFiles(PathBuf),
    #[error("not valid {encoding} text")]
    Undecodable { encoding: &'static str },
    #[error("text is not representable in {encoding}")]
    Unencodable { encoding: &'static str },
    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),
    #[error("no data names: the first table has no second row")]
    MissingDataNames,
    #[error("series {series}, row {row}: '{value}' is not a number")]
    NotNumeric {
        series: usize,
        row: usize,
        value: String,
    },
    #[error("series {series} has {found} values but series 0 has {expected}")]
    RaggedSeries {
        series: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Glob(#[from] glob::PatternError),
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
