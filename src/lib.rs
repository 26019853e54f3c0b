//! Convert spectroradiometer CSV exports into NumPy arrays and plots.
//!
//! An export holds several tables stacked in one shift-JIS CSV, separated by
//! blank rows. One column is picked by header from every table, each match
//! becoming one spectrum named after the measurement names in the first
//! table.

pub mod cli;
pub mod color;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod render;
pub mod sample;

pub use error::{Error, Result};
