// crates/dcf-rs/src/resolver.rs

//! Interprets a generic [`SectionMap`] as a DCF object dictionary.
//!
//! Resolution runs in two passes over the sections:
//! 1. **Bucket discovery**: every `[<Type>Objects]` section lists the addresses
//!    belonging to bucket `<Type>`. A global address index is built once from
//!    the finished buckets.
//! 2. **Parameter binding**: every `[<hex>]` / `[<hex>sub<hex>]` section binds
//!    its fields to the object (or sub-object) at that address.
//!
//! Pass 1 produces an owned bucket table that pass 2 consumes, so
//! binding cannot start before discovery has finished. The immutable
//! [`DcfFile`] is only assembled once both passes are done.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::log::{LogContext, dcf_debug, dcf_trace};
use crate::parser::{parse_hex_u32, parse_int};
use crate::reader::{Section, SectionMap};
use crate::types::{Bucket, DcfFile, DeviceObject, ObjectFields, Value};
use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::string::{String, ToString};

/// Suffix that marks a bucket declaration section, e.g. `[MandatoryObjects]`.
const BUCKET_SUFFIX: &str = "Objects";
/// Separator between address and subaddress in a section name, e.g. `[1018sub2]`.
const SUB_SEPARATOR: &str = "sub";

const KEY_NAME: &str = "ParameterName";
const KEY_VALUE: &str = "ParameterValue";
const KEY_LOW_LIMIT: &str = "LowLimit";
const KEY_HIGH_LIMIT: &str = "HighLimit";
const KEY_ACCESS: &str = "AccessType";

/// Selects the vendor-extension keys that carry units and scaling.
///
/// The default matches the Sevcon dialect (`;SEVCONFIELD UNITS`,
/// `;SEVCONFIELD SCALING`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterOptions {
    pub units_key: String,
    pub scale_key: String,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            units_key: ";SEVCONFIELD UNITS".to_string(),
            scale_key: ";SEVCONFIELD SCALING".to_string(),
        }
    }
}

/// Builds a [`DcfFile`] from a [`SectionMap`], appending any anomalies to `diagnostics`.
pub fn interpret(
    sections: &SectionMap,
    options: &InterpreterOptions,
    diagnostics: &mut Diagnostics,
) -> DcfFile {
    let discovered = discover_buckets(sections, diagnostics);
    bind_parameters(discovered, sections, options, diagnostics)
}

// --- Pass 1: Bucket Discovery ---

/// Fields collected from one or more parameter sections, before `value` is derived.
#[derive(Debug, Default)]
struct PendingFields {
    name: Option<String>,
    raw_value: Option<String>,
    unit: Option<String>,
    scale: Option<String>,
    low_limit: Option<String>,
    high_limit: Option<String>,
    access: Option<String>,
    /// Name and header line of the last section bound here.
    origin: Option<(String, usize)>,
}

#[derive(Debug, Default)]
struct PendingObject {
    fields: PendingFields,
    children: BTreeMap<u32, PendingFields>,
}

/// Result of pass 1: the bucket skeleton and the address index over it.
#[derive(Debug, Default)]
struct DiscoveredBuckets {
    buckets: BTreeMap<String, BTreeMap<u32, PendingObject>>,
    /// Address to owning bucket. First bucket in name order wins.
    index: BTreeMap<u32, String>,
}

fn discover_buckets(sections: &SectionMap, diagnostics: &mut Diagnostics) -> DiscoveredBuckets {
    let mut discovered = DiscoveredBuckets::default();
    let mut bucket_lines: BTreeMap<String, usize> = BTreeMap::new();

    for (section_name, section) in sections.iter() {
        let Some(bucket_name) = section_name.strip_suffix(BUCKET_SUFFIX) else {
            continue;
        };
        let bucket = discovered
            .buckets
            .entry(bucket_name.to_string())
            .or_default();
        bucket_lines.insert(bucket_name.to_string(), section.line());

        // Lines of the form e.g. "1=0x1000". Anything else is silently ignored.
        for (key, value) in section.entries() {
            if parse_int(key).is_none() {
                continue;
            }
            let Some(address) = parse_int(value).and_then(|v| u32::try_from(v).ok()) else {
                continue;
            };
            bucket.entry(address).or_default();
        }
    }

    // Built once; pass 2 resolves every section through this index.
    for (bucket_name, bucket) in &discovered.buckets {
        for &address in bucket.keys() {
            match discovered.index.entry(address) {
                Entry::Vacant(slot) => {
                    slot.insert(bucket_name.clone());
                }
                Entry::Occupied(kept) => {
                    diagnostics.push(
                        bucket_lines.get(bucket_name).copied(),
                        DiagnosticKind::AmbiguousAddress {
                            address,
                            kept: kept.get().clone(),
                            ignored: bucket_name.clone(),
                        },
                    );
                }
            }
        }
    }

    let ctx = LogContext {
        stage: "resolver",
        source: "buckets",
    };
    dcf_debug!(
        ctx,
        "discovered {} buckets holding {} addresses",
        discovered.buckets.len(),
        discovered.index.len()
    );
    discovered
}

// --- Pass 2: Parameter Binding ---

/// Splits `[XXXX]` or `[XXXXsubYY]` into address and optional subaddress.
///
/// Returns `None` when the part before the first `sub` is not bare hex. A
/// subaddress that is not bare hex (`1000subXY`, `1000sub`) yields `None` in
/// the second slot, so the section binds to the parent object.
fn parse_section_address(name: &str) -> Option<(u32, Option<u32>)> {
    match name.find(SUB_SEPARATOR) {
        None => parse_hex_u32(name).map(|address| (address, None)),
        Some(split) => {
            let address = parse_hex_u32(&name[..split])?;
            let sub = parse_hex_u32(&name[split + SUB_SEPARATOR.len()..]);
            Some((address, sub))
        }
    }
}

fn bind_parameters(
    mut discovered: DiscoveredBuckets,
    sections: &SectionMap,
    options: &InterpreterOptions,
    diagnostics: &mut Diagnostics,
) -> DcfFile {
    for (section_name, section) in sections.iter() {
        if section_name.ends_with(BUCKET_SUFFIX) {
            continue;
        }
        let ctx = LogContext {
            stage: "resolver",
            source: section_name,
        };
        let Some((address, sub)) = parse_section_address(section_name) else {
            dcf_trace!(ctx, "not an object section, skipped");
            continue;
        };

        let object = discovered
            .index
            .get(&address)
            .and_then(|bucket| discovered.buckets.get_mut(bucket))
            .and_then(|bucket| bucket.get_mut(&address));
        let Some(object) = object else {
            diagnostics.push(
                Some(section.line()),
                DiagnosticKind::UnresolvedObject {
                    section: section_name.to_string(),
                    address,
                },
            );
            continue;
        };

        let target = match sub {
            None => &mut object.fields,
            // Later sections for the same subaddress augment the existing child.
            Some(sub) => object.children.entry(sub).or_default(),
        };
        bind_fields(target, section_name, section, options);
        dcf_trace!(ctx, "bound to 0x{:x} sub {:?}", address, sub);
    }

    let buckets = discovered
        .buckets
        .into_iter()
        .map(|(name, pending)| {
            let bucket: Bucket = pending
                .into_iter()
                .map(|(address, obj)| (address, finish_object(address, obj, diagnostics)))
                .collect();
            (name, bucket)
        })
        .collect();
    DcfFile::from_buckets(buckets)
}

/// Copies the keys present in `section` over `fields`. Absent keys keep
/// whatever an earlier section bound.
fn bind_fields(
    fields: &mut PendingFields,
    section_name: &str,
    section: &Section,
    options: &InterpreterOptions,
) {
    let slots: [(&str, &mut Option<String>); 7] = [
        (KEY_NAME, &mut fields.name),
        (KEY_VALUE, &mut fields.raw_value),
        (options.units_key.as_str(), &mut fields.unit),
        (KEY_LOW_LIMIT, &mut fields.low_limit),
        (KEY_HIGH_LIMIT, &mut fields.high_limit),
        (options.scale_key.as_str(), &mut fields.scale),
        (KEY_ACCESS, &mut fields.access),
    ];
    for (key, slot) in slots {
        if let Some(value) = section.get(key) {
            *slot = Some(value.to_string());
        }
    }
    fields.origin = Some((section_name.to_string(), section.line()));
}

fn finish_object(address: u32, obj: PendingObject, diagnostics: &mut Diagnostics) -> DeviceObject {
    let children = obj
        .children
        .into_iter()
        .map(|(sub, fields)| {
            let fields = finish_fields(fields, diagnostics);
            (sub, DeviceObject::from_parts(sub, fields, BTreeMap::new()))
        })
        .collect();
    DeviceObject::from_parts(address, finish_fields(obj.fields, diagnostics), children)
}

fn finish_fields(pending: PendingFields, diagnostics: &mut Diagnostics) -> ObjectFields {
    let value = derive_value(&pending, diagnostics);
    ObjectFields {
        name: pending.name,
        value,
        raw_value: pending.raw_value,
        unit: pending.unit,
        scale: pending.scale,
        low_limit: pending.low_limit,
        high_limit: pending.high_limit,
        access: pending.access,
    }
}

/// Integer-parses `raw_value`, then applies `scale` if present.
/// Non-integer values pass through as text.
fn derive_value(pending: &PendingFields, diagnostics: &mut Diagnostics) -> Value {
    let Some(raw) = pending.raw_value.as_deref() else {
        return Value::Absent;
    };
    let Some(int) = parse_int(raw) else {
        return Value::Text(raw.to_string());
    };
    let Some(scale) = pending.scale.as_deref() else {
        return Value::Integer(int);
    };
    match scale.trim().parse::<f64>() {
        Ok(factor) => Value::Float(int as f64 * factor),
        Err(_) => {
            let (section, line) = match &pending.origin {
                Some((section, line)) => (section.clone(), Some(*line)),
                None => (String::new(), None),
            };
            diagnostics.push(
                line,
                DiagnosticKind::InvalidScale {
                    section,
                    scale: scale.to_string(),
                },
            );
            Value::Integer(int)
        }
    }
}
