// crates/dcf-rs/src/diagnostics.rs

//! Recoverable anomalies found while reading or interpreting a DCF file.
//!
//! Nothing in this module prints. The reader and resolver push records into a
//! [`Diagnostics`] collector that is handed back to the caller, who decides
//! whether to log, inspect or discard them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::Serialize;

/// What went wrong. Each variant maps to one recovery rule of the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `[Section]` header repeated an earlier one; its keys were merged
    /// into the first section.
    DuplicateSection { section: String },
    /// A key appeared twice in one section; the last value was kept.
    DuplicateKey { section: String, key: String },
    /// A line inside a section had no `=`.
    NotKeyValue { content: String },
    /// A line appeared before any section header.
    OutsideSection { content: String },
    /// An `<hex>` / `<hex>sub<hex>` section names an address missing from
    /// every `<Type>Objects` bucket.
    UnresolvedObject { section: String, address: u32 },
    /// An address is listed in more than one bucket. `kept` is the bucket
    /// that parameter sections bind to.
    AmbiguousAddress {
        address: u32,
        kept: String,
        ignored: String,
    },
    /// The scaling field is not a floating-point number; the value was left
    /// unscaled.
    InvalidScale { section: String, scale: String },
}

/// A single recoverable anomaly, tagged with the 1-based source line when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: Option<usize>,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "{}: ", line)?;
        }
        match &self.kind {
            DiagnosticKind::DuplicateSection { section } => {
                write!(f, "Duplicate section_name '{}'", section)
            }
            DiagnosticKind::DuplicateKey { key, .. } => write!(f, "Duplicate key '{}'", key),
            DiagnosticKind::NotKeyValue { content } => {
                write!(f, "Not a key-value pair '{}'", content)
            }
            DiagnosticKind::OutsideSection { content } => {
                write!(f, "Not part of a section '{}'", content)
            }
            DiagnosticKind::UnresolvedObject { section, .. } => {
                write!(f, "Couldn't find object '{}'", section)
            }
            DiagnosticKind::AmbiguousAddress {
                address,
                kept,
                ignored,
            } => write!(
                f,
                "Address 0x{:x} listed in both '{}Objects' and '{}Objects'; using '{}'",
                address, kept, ignored, kept
            ),
            DiagnosticKind::InvalidScale { section, scale } => {
                write!(f, "Invalid scale '{}' in '{}'; value left unscaled", scale, section)
            }
        }
    }
}

/// Ordered collector of [`Diagnostic`]s for one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Option<usize>, kind: DiagnosticKind) {
        self.entries.push(Diagnostic { line, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = alloc::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
