use std::fs;
use std::path::Path;

use spectra2npy::data::encoding::TextEncoding;
use spectra2npy::data::loader::LoadOptions;
use spectra2npy::data::model::WavelengthAxis;
use spectra2npy::export::OutputFormat;
use spectra2npy::pipeline::{run, Config};
use spectra2npy::Error;

const EXPORT: &str = "\
データ,No.1,No.2
測定名,試料A,試料B

,No.1,No.2
Lv [cd/sqm],12.5,8.25

波長 [nm],Le [W/(sr*sqm*nm)],Le(相対)
350,0.001,0.5
351,0.002,1.0
352,0.0015,0.75

波長 [nm],Le [W/(sr*sqm*nm)],Le(相対)
350,0.004,1.0
351,0.002,0.5
352,0.001,0.25
";

fn write_sjis(path: &Path, text: &str) {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    assert!(!had_errors);
    fs::write(path, &bytes).unwrap();
}

fn data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("csv")).unwrap();
    write_sjis(&dir.path().join("csv").join("lamp.csv"), EXPORT);
    dir
}

fn config(dir: &Path) -> Config {
    Config {
        dir: dir.to_path_buf(),
        ..Config::default()
    }
}

/// Values of a one-dimensional `<f8` array written by the converter.
fn read_npy(path: &Path) -> Vec<f64> {
    let bytes = fs::read(path).unwrap();
    assert_eq!(&bytes[..6], b"\x93NUMPY");
    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let header = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
    assert!(header.contains("'descr': '<f8'"), "{header}");
    bytes[10 + header_len..]
        .chunks_exact(8)
        .map(|c| f64::from_le_bytes(c.try_into().unwrap()))
        .collect()
}

#[test]
fn converts_every_matching_column() {
    let dir = data_dir();
    let summary = run(&config(dir.path())).unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.spectra, 2);

    let a = read_npy(&dir.path().join("npy").join("lamp_試料A.npy"));
    let b = read_npy(&dir.path().join("npy").join("lamp_試料B.npy"));
    assert_eq!(a, vec![0.001, 0.002, 0.0015]);
    assert_eq!(b, vec![0.004, 0.002, 0.001]);

    assert!(dir.path().join("spectre").join("lamp_試料A.png").is_file());
    assert!(dir.path().join("spectre").join("lamp_試料B.png").is_file());
}

#[test]
fn no_plot_skips_the_plot_directory() {
    let dir = data_dir();
    let summary = run(&Config {
        plot: false,
        ..config(dir.path())
    })
    .unwrap();

    assert_eq!(summary.written.len(), 2);
    assert!(!dir.path().join("spectre").exists());
}

#[test]
fn other_columns_and_formats() {
    let dir = data_dir();
    let summary = run(&Config {
        load: LoadOptions {
            column: "Le(相対)".into(),
            encoding: TextEncoding::Fixed(encoding_rs::SHIFT_JIS),
        },
        format: OutputFormat::Json,
        axis: WavelengthAxis {
            start: 400.0,
            step: 2.0,
        },
        plot: false,
        ..config(dir.path())
    })
    .unwrap();
    assert_eq!(summary.spectra, 2);

    let text = fs::read_to_string(dir.path().join("json").join("lamp.json")).unwrap();
    let root: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(root[1]["name"], "試料B");
    assert_eq!(root[1]["x"], serde_json::json!([400.0, 402.0, 404.0]));
    assert_eq!(root[1]["y"], serde_json::json!([1.0, 0.5, 0.25]));

    let summary = run(&Config {
        format: OutputFormat::Parquet,
        plot: false,
        ..config(dir.path())
    })
    .unwrap();
    assert_eq!(summary.written, vec![dir.path().join("parquet").join("lamp.parquet")]);
}

#[test]
fn rerun_overwrites_previous_outputs() {
    let dir = data_dir();
    let config = Config {
        plot: false,
        ..config(dir.path())
    };
    run(&config).unwrap();

    write_sjis(
        &dir.path().join("csv").join("lamp.csv"),
        &EXPORT.replace("350,0.004,1.0", "350,0.008,1.0"),
    );
    let summary = run(&config).unwrap();

    assert!(summary.is_success());
    let b = read_npy(&dir.path().join("npy").join("lamp_試料B.npy"));
    assert_eq!(b, vec![0.008, 0.002, 0.001]);
}

#[test]
fn bad_file_does_not_stop_the_run() {
    let dir = data_dir();
    let csv = dir.path().join("csv");
    write_sjis(&csv.join("broken.csv"), "データ\n\n波長,Le [W/(sr*sqm*nm)]\n350,0.1\n");
    write_sjis(
        &csv.join("text.csv"),
        "データ,No.1\n測定名,X\n\n波長,Le [W/(sr*sqm*nm)]\n350,n/a\n",
    );

    let summary = run(&Config {
        plot: false,
        ..config(dir.path())
    })
    .unwrap();

    assert!(!summary.is_success());
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed, vec![csv.join("broken.csv"), csv.join("text.csv")]);
    assert!(dir.path().join("npy").join("lamp_試料A.npy").is_file());
}

#[test]
fn missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(&config(dir.path())).unwrap_err();
    assert!(matches!(err, Error::MissingCsvDir(_)));

    fs::create_dir(dir.path().join("csv")).unwrap();
    let err = run(&config(dir.path())).unwrap_err();
    assert!(matches!(err, Error::NoCsvFiles(_)));
    assert!(!dir.path().join("npy").exists());
}
