// crates/dcf-rs/src/error.rs

use core::fmt;

/// Fatal errors that abort loading or rendering a DCF file.
///
/// Malformed content never produces a `DcfError`; it is reported through
/// [`Diagnostics`](crate::Diagnostics) instead.
#[derive(Debug)]
pub enum DcfError {
    /// The source could not be opened or read. `line` is the 1-based line
    /// being read when the failure happened, if reading had started.
    #[cfg(feature = "std")]
    Io {
        line: Option<usize>,
        source: std::io::Error,
    },

    /// An error occurred while rendering output (e.g., in the CSV writer).
    Fmt(fmt::Error),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for DcfError {
    fn from(e: std::io::Error) -> Self {
        DcfError::Io {
            line: None,
            source: e,
        }
    }
}

impl From<fmt::Error> for DcfError {
    fn from(e: fmt::Error) -> Self {
        DcfError::Fmt(e)
    }
}

impl fmt::Display for DcfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "std")]
            DcfError::Io {
                line: Some(line),
                source,
            } => write!(f, "I/O error at line {}: {}", line, source),
            #[cfg(feature = "std")]
            DcfError::Io { line: None, source } => write!(f, "I/O error: {}", source),
            DcfError::Fmt(e) => write!(f, "Formatting error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DcfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DcfError::Io { source, .. } => Some(source),
            DcfError::Fmt(e) => Some(e),
        }
    }
}
