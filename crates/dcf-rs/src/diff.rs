// crates/dcf-rs/src/diff.rs

//! Structural diff of two parsed DCF files.
//!
//! Objects are aligned by bucket name, then by the union of addresses, then by
//! the union of subaddresses under each address. A side that lacks a position
//! is compared as an empty placeholder object; placeholders never enter either
//! model.

use crate::types::{Bucket, DcfFile, DeviceObject, ObjectFields};
use alloc::borrow::Cow;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use serde::Serialize;

/// One reported position: a parent object (`subaddress == None`) or one of its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffRow {
    pub bucket: String,
    pub address: u32,
    pub subaddress: Option<u32>,
    /// Left name if present, otherwise right name.
    pub name: Option<String>,
    pub left: ObjectFields,
    pub right: ObjectFields,
}

impl DiffRow {
    /// `(address, subaddress)` of this row.
    pub fn position(&self) -> (u32, Option<u32>) {
        (self.address, self.subaddress)
    }
}

/// Compares `left` against `right` and returns one row per differing position.
///
/// A row is emitted when any tracked field differs (`value`, `raw_value`,
/// `unit`, `scale`, `low_limit`, `high_limit`, `access`), or when either side
/// at that position has children. Rows come out ordered by bucket name,
/// address, then subaddress with the parent first.
pub fn diff_dcf(left: &DcfFile, right: &DcfFile) -> Vec<DiffRow> {
    let empty = Bucket::new();
    let bucket_names: BTreeSet<&str> = left.bucket_names().chain(right.bucket_names()).collect();

    let mut rows = Vec::new();
    for bucket in bucket_names {
        let lbucket = left.bucket(bucket).unwrap_or(&empty);
        let rbucket = right.bucket(bucket).unwrap_or(&empty);
        diff_bucket(bucket, lbucket, rbucket, &mut rows);
    }
    rows
}

fn diff_bucket(bucket: &str, left: &Bucket, right: &Bucket, rows: &mut Vec<DiffRow>) {
    let addresses: BTreeSet<u32> = left.keys().chain(right.keys()).copied().collect();

    for address in addresses {
        let lparent = object_or_placeholder(left, address);
        let rparent = object_or_placeholder(right, address);
        compare(bucket, address, None, &lparent, &rparent, rows);

        let subaddresses: BTreeSet<u32> = lparent
            .children()
            .keys()
            .chain(rparent.children().keys())
            .copied()
            .collect();
        for sub in subaddresses {
            let lchild = object_or_placeholder(lparent.children(), sub);
            let rchild = object_or_placeholder(rparent.children(), sub);
            compare(bucket, address, Some(sub), &lchild, &rchild, rows);
        }
    }
}

/// Borrows the object at `key`, or synthesizes an empty one that lives only for this comparison.
fn object_or_placeholder(
    objects: &BTreeMap<u32, DeviceObject>,
    key: u32,
) -> Cow<'_, DeviceObject> {
    match objects.get(&key) {
        Some(obj) => Cow::Borrowed(obj),
        None => Cow::Owned(DeviceObject::new(key)),
    }
}

fn compare(
    bucket: &str,
    address: u32,
    subaddress: Option<u32>,
    left: &DeviceObject,
    right: &DeviceObject,
    rows: &mut Vec<DiffRow>,
) {
    let differs = !left.fields().same_tracked_fields(right.fields())
        || !left.children().is_empty()
        || !right.children().is_empty();
    if !differs {
        return;
    }

    let name = left.name().or(right.name()).map(ToString::to_string);
    rows.push(DiffRow {
        bucket: bucket.to_string(),
        address,
        subaddress,
        name,
        left: left.fields().clone(),
        right: right.fields().clone(),
    });
}
