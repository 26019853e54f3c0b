//! PNG line plots of extracted spectra, drawn straight onto an `image` buffer.

pub mod glyphs;
pub mod plot;
