// crates/dcf-rs/src/types.rs

//! Public, read-only data structures for a parsed DCF file.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use core::fmt;
use serde::Serialize;

// --- Derived Value ---

/// The typed value of a `ParameterValue` after numeric coercion and scaling.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// `ParameterValue` parsed as a decimal or `0x` hex integer, no scale.
    /// Wide enough for both `INTEGER64` and `UNSIGNED64`.
    Integer(i128),
    /// An integer `ParameterValue` multiplied by its scale.
    Float(f64),
    /// `ParameterValue` that is not an integer, kept verbatim.
    Text(String),
    /// No `ParameterValue` was given.
    #[default]
    Absent,
}

impl Value {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }
}

/// Integers and floats compare numerically, so `Integer(10) == Float(10.0)`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Absent, Value::Absent) => true,
            _ => false,
        }
    }
}

/// Renders the value as a table cell. `Absent` renders empty. Floats in plain
/// notation always carry a fractional part (`10.0`, not `10`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write_float(f, *v),
            Value::Text(s) => f.write_str(s),
            Value::Absent => Ok(()),
        }
    }
}

/// Shortest round-trip form with a signed, two-digit minimum exponent
/// (`1e+20`, `1.5e-05`), as produced by common CSV tooling for doubles.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("nan");
    }
    let repr = format!("{:?}", v);
    match repr.split_once('e') {
        None => f.write_str(&repr),
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
        }
    }
}

// --- Object Fields ---

/// The seven tracked fields of a device object plus its display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectFields {
    /// `ParameterName`
    pub name: Option<String>,
    /// Derived from `raw_value` and `scale`.
    pub value: Value,
    /// `ParameterValue`, as written.
    pub raw_value: Option<String>,
    /// Vendor units field (e.g. `;SEVCONFIELD UNITS`).
    pub unit: Option<String>,
    /// Vendor scaling field (e.g. `;SEVCONFIELD SCALING`).
    pub scale: Option<String>,
    /// `LowLimit`
    pub low_limit: Option<String>,
    /// `HighLimit`
    pub high_limit: Option<String>,
    /// `AccessType`
    pub access: Option<String>,
}

impl ObjectFields {
    /// Compares every tracked field except `name`.
    pub fn same_tracked_fields(&self, other: &ObjectFields) -> bool {
        self.value == other.value
            && self.raw_value == other.raw_value
            && self.unit == other.unit
            && self.scale == other.scale
            && self.low_limit == other.low_limit
            && self.high_limit == other.high_limit
            && self.access == other.access
    }
}

// --- Device Object ---

/// One object dictionary entry, or one sub-entry of a parent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceObject {
    address: u32,
    #[serde(flatten)]
    fields: ObjectFields,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    children: BTreeMap<u32, DeviceObject>,
}

impl DeviceObject {
    /// Creates an object with every field null and no children.
    pub fn new(address: u32) -> Self {
        Self {
            address,
            fields: ObjectFields::default(),
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn from_parts(
        address: u32,
        fields: ObjectFields,
        children: BTreeMap<u32, DeviceObject>,
    ) -> Self {
        Self {
            address,
            fields,
            children,
        }
    }

    /// The address within its bucket, or the subaddress for a child.
    pub fn address(&self) -> u32 {
        self.address
    }

    pub fn fields(&self) -> &ObjectFields {
        &self.fields
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.fields.value
    }

    pub fn raw_value(&self) -> Option<&str> {
        self.fields.raw_value.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.fields.unit.as_deref()
    }

    pub fn scale(&self) -> Option<&str> {
        self.fields.scale.as_deref()
    }

    pub fn low_limit(&self) -> Option<&str> {
        self.fields.low_limit.as_deref()
    }

    pub fn high_limit(&self) -> Option<&str> {
        self.fields.high_limit.as_deref()
    }

    pub fn access(&self) -> Option<&str> {
        self.fields.access.as_deref()
    }

    /// Sub-entries keyed by subaddress, in ascending order.
    pub fn children(&self) -> &BTreeMap<u32, DeviceObject> {
        &self.children
    }

    pub fn child(&self, subaddress: u32) -> Option<&DeviceObject> {
        self.children.get(&subaddress)
    }
}

// --- Root DCF Structure ---

/// A bucket of objects, keyed by address.
pub type Bucket = BTreeMap<u32, DeviceObject>;

/// A fully interpreted DCF file: bucket name (e.g. `"Mandatory"`) to objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DcfFile {
    buckets: BTreeMap<String, Bucket>,
}

impl DcfFile {
    pub(crate) fn from_buckets(buckets: BTreeMap<String, Bucket>) -> Self {
        Self { buckets }
    }

    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.get(name)
    }

    /// Iterates buckets in ascending name order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Finds an object by address alone, returning its bucket name too.
    /// Buckets are searched in ascending name order; the first match wins.
    pub fn find_object(&self, address: u32) -> Option<(&str, &DeviceObject)> {
        self.buckets
            .iter()
            .find_map(|(name, bucket)| bucket.get(&address).map(|obj| (name.as_str(), obj)))
    }

    /// Number of top-level objects across all buckets (children not counted).
    pub fn object_count(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_value_numeric_equality() {
        assert_eq!(Value::Integer(10), Value::Float(10.0));
        assert_eq!(Value::Float(10.0), Value::Integer(10));
        assert_ne!(Value::Integer(5), Value::Float(10.0));
        assert_ne!(Value::Integer(5), Value::Text("5".to_string()));
        assert_ne!(Value::Absent, Value::Text(String::new()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Float(10.0).to_string(), "10.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(-1.5e-5).to_string(), "-1.5e-05");
        assert_eq!(Value::Float(2.5e300).to_string(), "2.5e+300");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Integer(u64::MAX as i128).to_string(), "18446744073709551615");
        assert_eq!(Value::Text("abc".to_string()).to_string(), "abc");
        assert_eq!(Value::Absent.to_string(), "");
    }

    #[test]
    fn test_same_tracked_fields_ignores_name() {
        let a = ObjectFields {
            name: Some("A".to_string()),
            ..Default::default()
        };
        let b = ObjectFields {
            name: Some("B".to_string()),
            ..Default::default()
        };
        assert!(a.same_tracked_fields(&b));

        let c = ObjectFields {
            access: Some("rw".to_string()),
            ..Default::default()
        };
        assert!(!a.same_tracked_fields(&c));
    }

    #[test]
    fn test_find_object_first_bucket_wins() {
        let mut mandatory = Bucket::new();
        mandatory.insert(0x1000, DeviceObject::new(0x1000));
        let mut optional = Bucket::new();
        optional.insert(0x1000, DeviceObject::new(0x1000));
        optional.insert(0x2000, DeviceObject::new(0x2000));

        let mut buckets = BTreeMap::new();
        buckets.insert("Optional".to_string(), optional);
        buckets.insert("Mandatory".to_string(), mandatory);
        let dcf = DcfFile::from_buckets(buckets);

        assert_eq!(dcf.find_object(0x1000).map(|(b, _)| b), Some("Mandatory"));
        assert_eq!(dcf.find_object(0x2000).map(|(b, _)| b), Some("Optional"));
        assert!(dcf.find_object(0x3000).is_none());
        assert_eq!(dcf.object_count(), 3);
    }
}
