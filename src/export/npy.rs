use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

const MAGIC: &[u8] = b"\x93NUMPY";
/// Header (magic through trailing newline) is padded to this many bytes.
const ALIGN: usize = 64;

/// Write `values` as a one-dimensional little-endian `f64` NumPy array
/// (format version 1.0).
pub fn write_npy(path: &Path, values: &[f64]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    encode(&mut out, values)?;
    out.flush()?;
    Ok(())
}

/// Serialize into any writer; `write_npy` is the file-backed wrapper.
pub fn encode<W: Write>(out: &mut W, values: &[f64]) -> std::io::Result<()> {
    out.write_all(&header(values.len()))?;
    for v in values {
        out.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

fn header(len: usize) -> Vec<u8> {
    let dict = format!("{{'descr': '<f8', 'fortran_order': False, 'shape': ({len},), }}");
    // magic(6) + version(2) + header_len(2)
    let prefix = MAGIC.len() + 4;
    let unpadded = prefix + dict.len() + 1;
    let padding = (ALIGN - unpadded % ALIGN) % ALIGN;
    let header_len = dict.len() + padding + 1;

    let mut buf = Vec::with_capacity(prefix + header_len);
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&[1, 0]);
    // Fits: the dict is a few dozen bytes plus at most 63 of padding.
    buf.extend_from_slice(&(header_len as u16).to_le_bytes());
    buf.extend_from_slice(dict.as_bytes());
    buf.extend(std::iter::repeat(b' ').take(padding));
    buf.push(b'\n');
    buf
}
