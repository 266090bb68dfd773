//! Printer façade
//!
//! Runs adapter and renderer over a batch of classes and stores one text
//! artifact per printed class in a caller-owned [`ArtifactStore`]. Classes
//! are independent: a failing class is reported and the batch continues.

use rustc_hash::FxHashMap;
use tracing::{debug, info, trace, warn};

use kmprint_model::raw::{ClassEntry, MetadataKind, RawRecord};

use crate::adapter::{adapt, ClassPool};
use crate::config::PrinterConfig;
use crate::error::{PrintError, PrintResult};
use crate::render::Renderer;
use crate::stats::Statistics;

/// Rendered text per class name, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    artifacts: FxHashMap<String, String>,
    order: Vec<String>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `text` to `class_name`, replacing an earlier artifact
    pub fn insert(&mut self, class_name: impl Into<String>, text: String) {
        let class_name = class_name.into();
        if !self.artifacts.contains_key(&class_name) {
            self.order.push(class_name.clone());
        }
        self.artifacts.insert(class_name, text);
    }

    pub fn get(&self, class_name: &str) -> Option<&str> {
        self.artifacts.get(class_name).map(String::as_str)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.artifacts.contains_key(class_name)
    }

    /// Artifacts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|name| self.artifacts.get(name).map(|text| (name.as_str(), text.as_str())))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Outcome of one batch, classes in input order
#[derive(Debug, Default)]
pub struct PrintReport {
    pub rendered: Vec<String>,
    pub failed: Vec<(String, PrintError)>,
    /// Classes without Kotlin metadata
    pub passed_through: Vec<String>,
    /// Synthetic classes and multi-file parts printed inside their owners
    pub embedded: Vec<String>,
    pub statistics: Statistics,
}

impl PrintReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

enum Outcome {
    Rendered(String),
    Failed(PrintError),
    PassedThrough,
    Embedded,
}

#[derive(Debug, Clone, Default)]
pub struct Printer {
    config: PrinterConfig,
}

impl Printer {
    pub fn new(config: PrinterConfig) -> Self {
        Printer { config }
    }

    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Print every class of the batch
    pub fn print_all(&self, classes: &[ClassEntry], store: &mut ArtifactStore) -> PrintReport {
        self.print_selected(classes, store, |_| true)
    }

    /// Print the classes `select` accepts. The whole batch stays visible for
    /// companions, nested classes, parts and synthetic inner classes.
    pub fn print_selected<F>(&self, classes: &[ClassEntry], store: &mut ArtifactStore, select: F) -> PrintReport
    where
        F: Fn(&ClassEntry) -> bool,
    {
        let pool = ClassPool::new(classes);
        let selected: Vec<&ClassEntry> = classes.iter().filter(|entry| select(entry)).collect();
        let threads = self.config.effective_threads().min(selected.len()).max(1);
        info!(classes = selected.len(), pool = pool.len(), threads, "printing batch");

        let outcomes = if threads == 1 {
            selected.iter().map(|entry| self.print_one(entry, &pool)).collect()
        } else {
            self.print_parallel(&selected, &pool, threads)
        };

        let mut report = PrintReport {
            statistics: selected.iter().copied().collect(),
            ..PrintReport::default()
        };
        for (entry, outcome) in selected.iter().zip(outcomes) {
            let name = entry.name.clone();
            match outcome {
                Outcome::Rendered(text) => {
                    store.insert(name.clone(), text);
                    report.rendered.push(name);
                }
                Outcome::Failed(err) => report.failed.push((name, err)),
                Outcome::PassedThrough => report.passed_through.push(name),
                Outcome::Embedded => report.embedded.push(name),
            }
        }

        debug!(
            rendered = report.rendered.len(),
            failed = report.failed.len(),
            passed_through = report.passed_through.len(),
            embedded = report.embedded.len(),
            "batch done"
        );
        report
    }

    /// Split the selection into one contiguous chunk per worker; chunks are
    /// joined back in order
    fn print_parallel(&self, selected: &[&ClassEntry], pool: &ClassPool<'_>, threads: usize) -> Vec<Outcome> {
        let chunk_size = selected.len().div_ceil(threads);
        let result = crossbeam::scope(|scope| {
            let handles: Vec<_> = selected
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move |_| {
                        chunk
                            .iter()
                            .map(|entry| self.print_one(entry, pool))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut outcomes = Vec::with_capacity(selected.len());
            for handle in handles {
                match handle.join() {
                    Ok(chunk) => outcomes.extend(chunk),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            outcomes
        });

        match result {
            Ok(outcomes) => outcomes,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    fn print_one(&self, entry: &ClassEntry, pool: &ClassPool<'_>) -> Outcome {
        let Some(record) = &entry.metadata else {
            trace!(class = %entry.name, "no Kotlin metadata, passing through");
            return Outcome::PassedThrough;
        };

        let kind = record.body.kind();
        if self.config.exclude_embedded && matches!(kind, MetadataKind::SyntheticClass | MetadataKind::MultiFilePart) {
            trace!(class = %entry.name, kind = kind.describe(), "printed inside its owner");
            return Outcome::Embedded;
        }

        match self.print_record(&entry.name, record, pool) {
            Ok(text) => Outcome::Rendered(text),
            Err(err) => {
                warn!(class = %entry.name, error = %err, "failed to print class");
                Outcome::Failed(err)
            }
        }
    }

    fn print_record(&self, class_name: &str, record: &RawRecord, pool: &ClassPool<'_>) -> PrintResult<String> {
        debug!(class = class_name, version = %record.version, "printing class");
        let node = adapt(class_name, record, pool)?;
        let renderer = Renderer::new(record.version)?.with_companion_emission(self.config.companion_emission);
        Ok(renderer.render(&node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_keeps_insertion_order() {
        let mut store = ArtifactStore::new();
        store.insert("b", "B".to_string());
        store.insert("a", "A".to_string());
        store.insert("b", "B2".to_string());
        let items: Vec<_> = store.iter().collect();
        assert_eq!(items, [("b", "B2"), ("a", "A")]);
        assert_eq!(store.len(), 2);
        assert!(store.contains("a"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_class_without_metadata_is_not_a_failure() {
        let classes = [ClassEntry::new("java/Plain", None)];
        let mut store = ArtifactStore::new();
        let report = Printer::default().print_all(&classes, &mut store);
        assert!(report.is_success());
        assert_eq!(report.passed_through, ["java/Plain"]);
        assert!(report.rendered.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let mut store = ArtifactStore::new();
        let report = Printer::default().print_all(&[], &mut store);
        assert!(store.is_empty());
        assert!(report.is_success());
        assert_eq!(report.statistics.java_classes, 0);
    }
}
