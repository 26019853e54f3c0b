/// Data layer: decoding, table splitting, column extraction and core types.
///
/// Architecture:
/// ```text
///   shift-JIS .csv
///        │
///        ▼
///   ┌──────────┐
///   │ encoding  │  bytes → text
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  blank-line split → tables → matching columns → f64
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ SpectralFile  │  data names + series, paired into Spectrum
///   └──────────────┘
/// ```

pub mod encoding;
pub mod loader;
pub mod model;
