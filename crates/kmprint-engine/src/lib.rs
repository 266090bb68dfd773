//! Kotlin metadata declaration printer
//!
//! Pipeline per class:
//!
//! 1. [`adapter`]: decoded record to declaration tree, version-gated fields dropped
//! 2. [`interpret`]: flag words to modifiers and synthetic annotations
//! 3. [`policy`]: per-version output rules
//! 4. [`render`]: declaration tree to text
//!
//! [`printer`] runs the pipeline over a batch and collects the artifacts.

pub mod adapter;
pub mod config;
pub mod error;
pub mod interpret;
pub mod names;
pub mod policy;
pub mod printer;
pub mod render;
pub mod stats;

pub use adapter::{adapt, ClassPool};
pub use config::{CompanionEmission, PrinterConfig};
pub use error::{PrintError, PrintResult};
pub use policy::{version_policy, PolicySet};
pub use printer::{ArtifactStore, PrintReport, Printer};
pub use render::{render, trim_trailing_whitespace, Renderer};
pub use stats::Statistics;
