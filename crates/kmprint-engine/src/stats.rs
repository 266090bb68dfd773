//! Batch statistics

use std::collections::BTreeMap;

use kmprint_model::raw::{ClassEntry, MetadataKind, RawBody};

/// Counts over the classes of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    pub java_classes: usize,
    /// Classes carrying metadata, per kind; every kind is present
    pub metadata: BTreeMap<MetadataKind, usize>,
    /// Functions declared in classes, file facades and multi-file parts
    pub normal_functions: usize,
    /// Functions declared in synthetic classes
    pub synthetic_functions: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics {
            metadata: MetadataKind::ALL.iter().map(|kind| (*kind, 0)).collect(),
            ..Statistics::default()
        }
    }

    pub fn record(&mut self, entry: &ClassEntry) {
        self.java_classes += 1;
        let Some(record) = &entry.metadata else {
            return;
        };
        *self.metadata.entry(record.body.kind()).or_insert(0) += 1;
        match &record.body {
            RawBody::SyntheticClass(synthetic) => self.synthetic_functions += synthetic.functions.len(),
            body => self.normal_functions += body.container().map_or(0, |container| container.functions.len()),
        }
    }

    /// Classes carrying metadata of any kind
    pub fn metadata_total(&self) -> usize {
        self.metadata.values().sum()
    }

    pub fn metadata_count(&self, kind: MetadataKind) -> usize {
        self.metadata.get(&kind).copied().unwrap_or(0)
    }
}

impl<'a> FromIterator<&'a ClassEntry> for Statistics {
    fn from_iter<I: IntoIterator<Item = &'a ClassEntry>>(iter: I) -> Self {
        let mut statistics = Statistics::new();
        for entry in iter {
            statistics.record(entry);
        }
        statistics
    }
}
