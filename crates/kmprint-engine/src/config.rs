//! Printer configuration, loaded from `[printer]` in `kmprint.toml`.

use serde::{Deserialize, Serialize};

use crate::error::PrintResult;

/// How a companion object is emitted inside its owner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanionEmission {
    /// Follow the version policy, duplicating the companion where the
    /// policy says reference outputs do
    #[default]
    Policy,
    /// Emit the companion once, whatever the version
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Render synthetic classes and multi-file parts only inside their owners
    pub exclude_embedded: bool,
    /// Worker threads; 0 uses one per CPU
    pub threads: usize,
    pub companion_emission: CompanionEmission,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            exclude_embedded: true,
            threads: 1,
            companion_emission: CompanionEmission::Policy,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    printer: PrinterConfig,
}

impl PrinterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `[printer]` table of a `kmprint.toml` document. A document
    /// without the table yields the defaults.
    pub fn from_toml(text: &str) -> PrintResult<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.printer)
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_exclude_embedded(mut self, exclude: bool) -> Self {
        self.exclude_embedded = exclude;
        self
    }

    pub fn with_companion_emission(mut self, emission: CompanionEmission) -> Self {
        self.companion_emission = emission;
        self
    }

    /// Number of workers to actually use
    pub fn effective_threads(&self) -> usize {
        match self.threads {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }
}
