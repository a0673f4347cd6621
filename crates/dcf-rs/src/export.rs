// crates/dcf-rs/src/export.rs

//! Renders a [`DcfFile`] or a list of [`DiffRow`]s as CSV.
//!
//! The dialect is comma-delimited with `\r\n` line endings and minimal quoting.
//! Null fields render as empty cells.

use crate::diff::DiffRow;
use crate::error::DcfError;
use crate::types::{DcfFile, DeviceObject, ObjectFields};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Write;

const EXPORT_HEADER: [&str; 11] = [
    "Object type",
    "Address",
    "Subaddress",
    "Name",
    "Value",
    "Unit",
    "Raw value",
    "Scale",
    "Low limit",
    "High limit",
    "Access",
];

const DIFF_HEADER: [&str; 18] = [
    "Object type",
    "Address",
    "Subaddress",
    "Name",
    "Left value",
    "Unit",
    "Raw value",
    "Scale",
    "Low limit",
    "High limit",
    "Access",
    "Right value",
    "Unit",
    "Raw value",
    "Scale",
    "Low limit",
    "High limit",
    "Access",
];

/// Formats an address as lowercase `0x`-prefixed hex.
pub fn format_address(address: u32) -> String {
    format!("0x{:x}", address)
}

/// Writes the full object table: every bucket in name order, every address
/// ascending, each parent followed by its children.
pub fn write_export_csv<W: Write>(dcf: &DcfFile, out: &mut W) -> Result<(), DcfError> {
    write_record(out, EXPORT_HEADER.iter().map(|h| Some(h.to_string())))?;
    for (bucket, objects) in dcf.buckets() {
        for (&address, parent) in objects {
            write_object_row(out, bucket, address, None, parent)?;
            for (&sub, child) in parent.children() {
                write_object_row(out, bucket, address, Some(sub), child)?;
            }
        }
    }
    Ok(())
}

/// Writes the diff report produced by [`diff_dcf`](crate::diff_dcf).
pub fn write_diff_csv<W: Write>(rows: &[DiffRow], out: &mut W) -> Result<(), DcfError> {
    write_record(out, DIFF_HEADER.iter().map(|h| Some(h.to_string())))?;
    for row in rows {
        let lead = [
            Some(row.bucket.clone()),
            Some(format_address(row.address)),
            row.subaddress.map(format_address),
            row.name.clone(),
        ];
        let cells = lead
            .into_iter()
            .chain(field_cells(&row.left))
            .chain(field_cells(&row.right));
        write_record(out, cells)?;
    }
    Ok(())
}

/// Renders [`write_export_csv`] into a new `String`.
pub fn export_csv_to_string(dcf: &DcfFile) -> Result<String, DcfError> {
    let mut out = String::new();
    write_export_csv(dcf, &mut out)?;
    Ok(out)
}

/// Renders [`write_diff_csv`] into a new `String`.
pub fn diff_csv_to_string(rows: &[DiffRow]) -> Result<String, DcfError> {
    let mut out = String::new();
    write_diff_csv(rows, &mut out)?;
    Ok(out)
}

fn write_object_row<W: Write>(
    out: &mut W,
    bucket: &str,
    address: u32,
    subaddress: Option<u32>,
    obj: &DeviceObject,
) -> Result<(), DcfError> {
    let lead = [
        Some(bucket.to_string()),
        Some(format_address(address)),
        subaddress.map(format_address),
        obj.name().map(ToString::to_string),
    ];
    write_record(out, lead.into_iter().chain(field_cells(obj.fields())))
}

/// The seven per-side columns, in header order.
fn field_cells(fields: &ObjectFields) -> [Option<String>; 7] {
    let value = if fields.value.is_absent() {
        None
    } else {
        Some(fields.value.to_string())
    };
    [
        value,
        fields.unit.clone(),
        fields.raw_value.clone(),
        fields.scale.clone(),
        fields.low_limit.clone(),
        fields.high_limit.clone(),
        fields.access.clone(),
    ]
}

fn write_record<W: Write>(
    out: &mut W,
    cells: impl IntoIterator<Item = Option<String>>,
) -> Result<(), DcfError> {
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        if let Some(cell) = cell {
            write_cell(out, &cell)?;
        }
    }
    out.write_str("\r\n")?;
    Ok(())
}

fn write_cell<W: Write>(out: &mut W, cell: &str) -> core::fmt::Result {
    if !cell.contains([',', '"', '\r', '\n']) {
        return out.write_str(cell);
    }
    out.write_char('"')?;
    for c in cell.chars() {
        if c == '"' {
            out.write_char('"')?;
        }
        out.write_char(c)?;
    }
    out.write_char('"')
}
