//! Shared builders for the printer integration tests

#![allow(dead_code)]

use kmprint_engine::{trim_trailing_whitespace, ArtifactStore, Printer, PrinterConfig};
use kmprint_model::flags::{Flag, RawFlags};
use kmprint_model::raw::{ClassEntry, RawBody, RawJvmMethod, RawRecord, RawType, RawValueParameter};
use kmprint_model::VersionTag;

/// Public final JVM access flags
pub const PUBLIC_FINAL: u16 = 0x0011;

pub fn flags(list: &[Flag]) -> RawFlags {
    RawFlags::from(list)
}

pub fn version(text: &str) -> VersionTag {
    VersionTag::parse(text).unwrap()
}

pub fn entry(name: &str, version_text: &str, body: RawBody) -> ClassEntry {
    ClassEntry::new(name, Some(RawRecord::new(version(version_text), body)))
}

pub fn class_type(name: &str) -> RawType {
    RawType::class(name)
}

pub fn method(name: &str, descriptor: &str) -> RawJvmMethod {
    RawJvmMethod {
        name: name.into(),
        descriptor: descriptor.into(),
        access: Some(PUBLIC_FINAL),
        annotations: Vec::new(),
    }
}

pub fn parameter(name: &str, ty: RawType) -> RawValueParameter {
    RawValueParameter {
        name: name.into(),
        ty,
        ..RawValueParameter::default()
    }
}

/// Print the whole batch and return the artifact of `name`, trailing
/// whitespace removed
pub fn print_with(config: PrinterConfig, classes: &[ClassEntry], name: &str) -> String {
    let mut store = ArtifactStore::new();
    let report = Printer::new(config).print_all(classes, &mut store);
    assert!(report.is_success(), "failures: {:?}", report.failed);
    let text = store
        .get(name)
        .unwrap_or_else(|| panic!("no artifact for {}", name));
    trim_trailing_whitespace(text).trim_end().to_string()
}

pub fn print(classes: &[ClassEntry], name: &str) -> String {
    print_with(PrinterConfig::default(), classes, name)
}

/// Remove the common leading indentation and the surrounding blank lines
pub fn trim_indent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|line| !line.trim().is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|line| !line.trim().is_empty()).map_or(start, |i| i + 1);
    let lines = &lines[start..end];
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| if line.len() >= indent { &line[indent..] } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}
