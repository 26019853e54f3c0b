use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Label accepted in place of an encoding name to sniff the file instead.
pub const AUTO: &str = "auto";

/// How input bytes are turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Fixed(&'static Encoding),
    Detect,
}

impl TextEncoding {
    /// Resolve a WHATWG label such as `shift_jis`, `utf-8` or `auto`.
    pub fn from_label(label: &str) -> Result<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(AUTO) {
            return Ok(TextEncoding::Detect);
        }
        Encoding::for_label(label.as_bytes())
            .map(TextEncoding::Fixed)
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    /// The concrete encoding to use for `bytes`.
    pub fn resolve(&self, bytes: &[u8]) -> &'static Encoding {
        match self {
            TextEncoding::Fixed(enc) => enc,
            TextEncoding::Detect => detect_encoding(bytes),
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Fixed(encoding_rs::SHIFT_JIS)
    }
}

/// Guess the encoding of `bytes`, leaning towards Japanese legacy encodings.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(Some(b"jp"), true)
}

/// Decode a whole file. A BOM overrides `encoding`.
///
/// Malformed sequences are an error rather than replacement characters.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(Error::Undecodable {
            encoding: used.name(),
        });
    }
    if used != encoding {
        log::debug!("BOM overrides {} with {}", encoding.name(), used.name());
    }
    Ok(text.into_owned())
}
