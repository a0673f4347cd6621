// crates/dcf-rs/src/parser.rs

use crate::diagnostics::Diagnostics;
use crate::reader;
use crate::resolver::{self, InterpreterOptions};
use crate::types::DcfFile;

/// Parses a DCF text into a [`DcfFile`] using the default (Sevcon) field keys.
///
/// Parsing never fails on malformed content. Skipped lines, duplicate names and
/// unresolved sections are returned in the [`Diagnostics`].
///
/// # Arguments
/// * `content` - The full text of a `.dcf` file.
pub fn load_dcf_from_str(content: &str) -> (DcfFile, Diagnostics) {
    load_dcf_from_str_with(content, &InterpreterOptions::default())
}

/// Like [`load_dcf_from_str`], with explicit vendor-extension field keys.
pub fn load_dcf_from_str_with(
    content: &str,
    options: &InterpreterOptions,
) -> (DcfFile, Diagnostics) {
    let (sections, mut diagnostics) = reader::read_sections_from_str(content);
    let dcf = resolver::interpret(&sections, options, &mut diagnostics);
    (dcf, diagnostics)
}

/// Opens and parses a DCF file from disk.
///
/// # Errors
/// Returns [`DcfError::Io`](crate::DcfError::Io) if the file cannot be opened
/// or a line cannot be read or decoded. No model is produced in that case.
#[cfg(feature = "std")]
pub fn load_dcf_from_path<P: AsRef<std::path::Path>>(
    path: P,
    options: &InterpreterOptions,
) -> Result<(DcfFile, Diagnostics), crate::DcfError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let source = path.display().to_string();
    let (sections, mut diagnostics) =
        reader::read_sections_named(std::io::BufReader::new(file), &source)?;
    let dcf = resolver::interpret(&sections, options, &mut diagnostics);
    Ok((dcf, diagnostics))
}

// --- Helper Functions ---

/// Parses `"0x..."` / `"0X..."` as hex, anything else as base-10.
///
/// Surrounding whitespace and a leading sign are accepted. Anything else,
/// including the empty string, yields `None`. The result is `i128` so every
/// CANopen integer type, `UNSIGNED64` included, fits.
pub fn parse_int(s: &str) -> Option<i128> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Parses a bare hex string (no `0x` prefix), as used in section names.
pub(crate) fn parse_hex_u32(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}
