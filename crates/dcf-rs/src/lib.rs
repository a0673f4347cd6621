// crates/dcf-rs/src/lib.rs

#![cfg_attr(not(feature = "std"), no_std)]
#![doc = "Parses CANopen DCF (Device Configuration File) files and diffs them."]
#![doc = ""]
#![doc = "The core is `no_std + alloc`. It supports:"]
#![doc = "- `load_dcf_from_str`: Reading and interpreting a DCF text into a `DcfFile`."]
#![doc = "- `diff_dcf`: Aligning two `DcfFile`s and listing the positions that differ."]
#![doc = "- `export_csv_to_string` / `diff_csv_to_string`: Rendering either as CSV."]
#![doc = ""]
#![doc = "The `std` feature (on by default) adds `load_dcf_from_path` and `read_sections`."]

extern crate alloc;

// --- Crate Modules ---

mod diagnostics;
mod diff;
mod error;
mod export;
mod log;
mod parser;
mod reader;
mod resolver;
mod types;

// --- Public API Re-exports ---

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use diff::{DiffRow, diff_dcf};
pub use error::DcfError;
pub use export::{
    diff_csv_to_string, export_csv_to_string, format_address, write_diff_csv, write_export_csv,
};
#[cfg(feature = "std")]
pub use parser::load_dcf_from_path;
pub use parser::{load_dcf_from_str, load_dcf_from_str_with, parse_int};
#[cfg(feature = "std")]
pub use reader::read_sections;
pub use reader::{Section, SectionMap, read_sections_from_str};
pub use resolver::{InterpreterOptions, interpret};
pub use types::{Bucket, DcfFile, DeviceObject, ObjectFields, Value};
