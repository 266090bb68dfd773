//! Text and JSON output

use std::io::{self, Write};

use serde_json::{json, Map, Value};

use kmprint_engine::{ArtifactStore, PrintReport, Statistics};
use kmprint_model::descriptor::{external_class_name, package_name, short_class_name};
use kmprint_model::ClassEntry;

pub const DEFAULT_DIVIDER: &str = "/* ------------------------------------------------- */\n";

/// All artifacts in store order, `divider` on its own line between two
pub fn write_text(w: &mut dyn Write, store: &ArtifactStore, divider: &str) -> io::Result<()> {
    for (i, (_, text)) in store.iter().enumerate() {
        if i > 0 {
            writeln!(w, "{}", divider)?;
        }
        write!(w, "{}", text)?;
    }
    Ok(())
}

/// Notice for a batch that printed nothing
pub fn empty_notice(statistics: &Statistics) -> Option<String> {
    if statistics.java_classes == 0 {
        Some("No classes found".to_string())
    } else if statistics.metadata_total() == 0 {
        Some(format!("No Kotlin metadata found in {} classes", statistics.java_classes))
    } else {
        None
    }
}

pub fn json_report(input: &str, classes: &[ClassEntry], report: &PrintReport, store: &ArtifactStore) -> Value {
    let statistics = &report.statistics;
    let kinds: Map<String, Value> = statistics
        .metadata
        .iter()
        .map(|(kind, count)| (kind.key().to_string(), json!(count)))
        .collect();

    let mut metadata = Map::new();
    for entry in classes {
        let (Some(record), Some(printed)) = (&entry.metadata, store.get(&entry.name)) else {
            continue;
        };
        metadata.insert(
            external_class_name(&entry.name),
            json!({
                "package": external_class_name(package_name(&entry.name)),
                "name": short_class_name(&entry.name),
                "kind": record.body.kind().key(),
                "printed": printed,
            }),
        );
    }

    json!({
        "input": input,
        "statistics": {
            "java": { "classes": statistics.java_classes },
            "kotlin": {
                "metadata": kinds,
                "functions": {
                    "normal": statistics.normal_functions,
                    "synthetic": statistics.synthetic_functions,
                },
            },
        },
        "metadata": metadata,
    })
}
