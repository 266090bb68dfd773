//! Data model for the Kotlin metadata printer
//!
//! - [`raw`]: decoded metadata records as handed over by a decoder
//! - [`flags`]: flag words and their per-kind bit layout
//! - [`tree`]: the version-agnostic declaration tree
//! - [`descriptor`]: JVM descriptor formatting
//! - [`version`]: metadata format versions

pub mod descriptor;
pub mod error;
pub mod flags;
pub mod raw;
pub mod tree;
pub mod version;

pub use error::{ModelError, ModelResult};
pub use flags::{Flag, FlagKind, FlagSet, RawFlags};
pub use raw::{ClassEntry, MetadataKind, RawBody, RawRecord};
pub use tree::DeclarationNode;
pub use version::VersionTag;
