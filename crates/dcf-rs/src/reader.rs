// crates/dcf-rs/src/reader.rs

//! Generic `[Section]` / `key=value` reader.
//!
//! This stage knows nothing about DCF semantics. It turns lines of text into a
//! [`SectionMap`] and records every malformed line in a [`Diagnostics`]
//! collector instead of failing.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::log::{LogContext, dcf_debug};
use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::string::{String, ToString};

/// One `[Section]` of the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    line: usize,
    entries: BTreeMap<String, String>,
}

impl Section {
    /// The 1-based line of the first header that opened this section.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates key/value pairs in ascending key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mapping of section name to its raw key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: BTreeMap<String, Section>,
}

impl SectionMap {
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Looks up a raw value, returning `None` if either the section or the key is missing.
    pub fn get_value(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Iterates sections in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Incremental line consumer shared by the `&str` and `BufRead` front ends.
#[derive(Default)]
pub(crate) struct SectionReader {
    map: SectionMap,
    diagnostics: Diagnostics,
    current: Option<String>,
}

impl SectionReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Consumes one raw line. `line_num` is 1-based.
    pub(crate) fn feed(&mut self, line_num: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }

        // New section e.g. '[Section]'
        if let Some(rest) = line.strip_prefix('[') {
            if let Some(end) = rest.find(']') {
                self.open_section(line_num, &rest[..end]);
                return;
            }
        }

        let Some(current) = self.current.as_ref() else {
            self.diagnostics.push(
                Some(line_num),
                DiagnosticKind::OutsideSection {
                    content: line.to_string(),
                },
            );
            return;
        };

        let Some((key, value)) = line.split_once('=') else {
            self.diagnostics.push(
                Some(line_num),
                DiagnosticKind::NotKeyValue {
                    content: line.to_string(),
                },
            );
            return;
        };

        // `current` always names a section that `open_section` inserted.
        if let Some(section) = self.map.sections.get_mut(current) {
            if section
                .entries
                .insert(key.to_string(), value.to_string())
                .is_some()
            {
                self.diagnostics.push(
                    Some(line_num),
                    DiagnosticKind::DuplicateKey {
                        section: current.clone(),
                        key: key.to_string(),
                    },
                );
            }
        }
    }

    fn open_section(&mut self, line_num: usize, name: &str) {
        match self.map.sections.entry(name.to_string()) {
            Entry::Occupied(_) => {
                // Keys that follow are merged into the first section of this name.
                self.diagnostics.push(
                    Some(line_num),
                    DiagnosticKind::DuplicateSection {
                        section: name.to_string(),
                    },
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(Section {
                    line: line_num,
                    entries: BTreeMap::new(),
                });
            }
        }
        self.current = Some(name.to_string());
    }

    pub(crate) fn finish(self, source: &str) -> (SectionMap, Diagnostics) {
        let ctx = LogContext {
            stage: "reader",
            source,
        };
        dcf_debug!(
            ctx,
            "read {} sections with {} diagnostics",
            self.map.len(),
            self.diagnostics.len()
        );
        (self.map, self.diagnostics)
    }
}

/// Reads a complete DCF text into a [`SectionMap`].
///
/// This never fails: malformed lines are skipped and reported in the returned
/// [`Diagnostics`].
pub fn read_sections_from_str(content: &str) -> (SectionMap, Diagnostics) {
    let mut reader = SectionReader::new();
    for (idx, line) in content.lines().enumerate() {
        reader.feed(idx + 1, line);
    }
    reader.finish("<str>")
}

/// Reads sections from any buffered reader, line by line.
///
/// # Errors
/// Returns [`DcfError::Io`](crate::DcfError::Io) if a line cannot be read or
/// is not valid UTF-8. The error carries the number of the failing line.
#[cfg(feature = "std")]
pub fn read_sections<R: std::io::BufRead>(
    reader: R,
) -> Result<(SectionMap, Diagnostics), crate::DcfError> {
    read_sections_named(reader, "<reader>")
}

#[cfg(feature = "std")]
pub(crate) fn read_sections_named<R: std::io::BufRead>(
    reader: R,
    source: &str,
) -> Result<(SectionMap, Diagnostics), crate::DcfError> {
    let mut sections = SectionReader::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| crate::DcfError::Io {
            line: Some(idx + 1),
            source: e,
        })?;
        sections.feed(idx + 1, &line);
    }
    Ok(sections.finish(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;
    use alloc::vec::Vec;

    fn kinds(diags: &Diagnostics) -> Vec<&DiagnosticKind> {
        diags.iter().map(|d: &Diagnostic| &d.kind).collect()
    }

    #[test]
    fn test_basic_sections_and_keys() {
        let text = "[FileInfo]\nFileName=motor.dcf\n\n  [1000]  \nParameterName=Device Type\n";
        let (map, diags) = read_sections_from_str(text);

        assert!(diags.is_empty());
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_value("FileInfo", "FileName"), Some("motor.dcf"));
        assert_eq!(map.get_value("1000", "ParameterName"), Some("Device Type"));
        assert_eq!(map.section("1000").map(Section::line), Some(4));
    }

    #[test]
    fn test_split_at_first_equals() {
        let (map, _) = read_sections_from_str("[S]\nExpr=a=b\nEmpty=\n");
        assert_eq!(map.get_value("S", "Expr"), Some("a=b"));
        assert_eq!(map.get_value("S", "Empty"), Some(""));
    }

    #[test]
    fn test_line_before_any_section() {
        let (map, diags) = read_sections_from_str("Orphan=1\n[S]\nKey=2\n");

        assert_eq!(map.len(), 1);
        assert_eq!(map.get_value("S", "Orphan"), None);
        assert_eq!(diags.len(), 1);
        let d = diags.iter().next().unwrap();
        assert_eq!(d.line, Some(1));
        assert_eq!(
            d.kind,
            DiagnosticKind::OutsideSection {
                content: "Orphan=1".into()
            }
        );
    }

    #[test]
    fn test_line_without_equals_is_skipped() {
        let (map, diags) = read_sections_from_str("[S]\nA=1\n; a comment\nB=2\n");

        assert_eq!(map.section("S").map(Section::len), Some(2));
        assert_eq!(
            kinds(&diags),
            [&DiagnosticKind::NotKeyValue {
                content: "; a comment".into()
            }]
        );
        assert_eq!(diags.iter().next().unwrap().line, Some(3));
    }

    #[test]
    fn test_duplicate_section_merges() {
        let text = "[S]\nA=1\n[T]\nX=0\n[S]\nB=2\n";
        let (map, diags) = read_sections_from_str(text);

        let s = map.section("S").unwrap();
        assert_eq!(s.get("A"), Some("1"));
        assert_eq!(s.get("B"), Some("2"));
        assert_eq!(s.line(), 1);
        assert_eq!(
            kinds(&diags),
            [&DiagnosticKind::DuplicateSection { section: "S".into() }]
        );
        assert_eq!(diags.iter().next().unwrap().line, Some(5));
    }

    #[test]
    fn test_duplicate_key_last_value_wins() {
        let (map, diags) = read_sections_from_str("[S]\nA=1\nA=2\n");

        assert_eq!(map.get_value("S", "A"), Some("2"));
        assert_eq!(
            kinds(&diags),
            [&DiagnosticKind::DuplicateKey {
                section: "S".into(),
                key: "A".into()
            }]
        );
    }

    #[test]
    fn test_unterminated_header_is_not_a_section() {
        let (map, diags) = read_sections_from_str("[Broken\n");
        assert!(map.is_empty());
        assert_eq!(diags.len(), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_read_sections_reports_invalid_utf8_line() {
        let bytes: &[u8] = b"[S]\nA=1\nB=\xff\xfe\n";
        let err = read_sections(bytes).unwrap_err();
        assert!(matches!(err, crate::DcfError::Io { line: Some(3), .. }));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_read_sections_matches_str_front_end() {
        let text = "[S]\nA=1\nbad line\n";
        let from_reader = read_sections(text.as_bytes()).unwrap();
        let from_str = read_sections_from_str(text);
        assert_eq!(from_reader, from_str);
    }
}
