//! Decoded metadata records
//!
//! These types mirror what a metadata decoder hands over for one class:
//! the kind-specific body, flag words, members in declaration order, type
//! references, annotations and the format version. Every collection is
//! optional on the wire and defaults to empty. Fields that only newer format
//! versions carry are `Option` so that "absent" stays distinguishable from
//! "present but empty".

use serde::{Deserialize, Serialize};

use crate::flags::RawFlags;
use crate::version::VersionTag;

/// One class of the input collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Internal JVM name, e.g. `com/example/Outer$Inner`
    pub name: String,
    /// Kotlin metadata, if the class carries any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RawRecord>,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>, metadata: Option<RawRecord>) -> Self {
        ClassEntry {
            name: name.into(),
            metadata,
        }
    }
}

/// The decoded metadata of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Metadata format version
    pub version: VersionTag,
    /// Annotations on the JVM class itself
    #[serde(default)]
    pub annotations: Vec<RawAnnotation>,
    pub body: RawBody,
}

impl RawRecord {
    pub fn new(version: VersionTag, body: RawBody) -> Self {
        RawRecord {
            version,
            annotations: Vec::new(),
            body,
        }
    }
}

/// Kind-specific part of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawBody {
    Class(RawClass),
    FileFacade(RawContainer),
    SyntheticClass(RawSyntheticClass),
    MultiFileFacade(RawMultiFileFacade),
    MultiFilePart(RawMultiFilePart),
}

/// Metadata kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetadataKind {
    Class,
    FileFacade,
    SyntheticClass,
    MultiFileFacade,
    MultiFilePart,
}

impl MetadataKind {
    /// Human-readable kind, as used in headers
    pub fn describe(self) -> &'static str {
        match self {
            MetadataKind::Class => "class",
            MetadataKind::FileFacade => "file facade",
            MetadataKind::SyntheticClass => "synthetic class",
            MetadataKind::MultiFileFacade => "multi-file class facade",
            MetadataKind::MultiFilePart => "multi-file class part",
        }
    }

    /// Camel-case key used in statistics reports
    pub fn key(self) -> &'static str {
        match self {
            MetadataKind::Class => "class",
            MetadataKind::FileFacade => "fileFacade",
            MetadataKind::SyntheticClass => "syntheticClass",
            MetadataKind::MultiFileFacade => "multiFileClassFacade",
            MetadataKind::MultiFilePart => "multiFileClassPart",
        }
    }

    pub const ALL: [MetadataKind; 5] = [
        MetadataKind::Class,
        MetadataKind::FileFacade,
        MetadataKind::SyntheticClass,
        MetadataKind::MultiFileFacade,
        MetadataKind::MultiFilePart,
    ];
}

impl RawBody {
    pub fn kind(&self) -> MetadataKind {
        match self {
            RawBody::Class(_) => MetadataKind::Class,
            RawBody::FileFacade(_) => MetadataKind::FileFacade,
            RawBody::SyntheticClass(_) => MetadataKind::SyntheticClass,
            RawBody::MultiFileFacade(_) => MetadataKind::MultiFileFacade,
            RawBody::MultiFilePart(_) => MetadataKind::MultiFilePart,
        }
    }

    /// The declaration container, for kinds that have one
    pub fn container(&self) -> Option<&RawContainer> {
        match self {
            RawBody::Class(class) => Some(&class.container),
            RawBody::FileFacade(container) => Some(container),
            RawBody::MultiFilePart(part) => Some(&part.container),
            RawBody::SyntheticClass(_) | RawBody::MultiFileFacade(_) => None,
        }
    }
}

/// Members shared by classes, file facades and multi-file parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContainer {
    pub functions: Vec<RawFunction>,
    pub properties: Vec<RawProperty>,
    pub local_delegated_properties: Vec<RawProperty>,
    /// Absent in records that predate nested type aliases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_aliases: Option<Vec<RawTypeAlias>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawClass {
    pub flags: RawFlags,
    #[serde(flatten)]
    pub container: RawContainer,
    pub type_parameters: Vec<RawTypeParameter>,
    pub supertypes: Vec<RawType>,
    pub constructors: Vec<RawConstructor>,
    /// Simple name of the companion object
    pub companion_object_name: Option<String>,
    /// Simple names of nested classes, companion included
    pub nested_class_names: Vec<String>,
    pub enum_entry_names: Vec<String>,
    /// Internal names of sealed subclasses
    pub sealed_subclass_names: Vec<String>,
    pub underlying_property_name: Option<String>,
    pub underlying_property_type: Option<RawType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_receivers: Option<Vec<RawType>>,
    pub version_requirements: Vec<VersionTag>,
    pub opt_in: Option<RawOptIn>,
    pub anonymous_object_origin: Option<String>,
}

/// Configuration of a `RequiresOptIn` marker
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOptIn {
    pub message: Option<String>,
    /// `WARNING` or `ERROR`
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSyntheticClass {
    pub flavor: SyntheticFlavor,
    pub functions: Vec<RawFunction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticFlavor {
    #[default]
    Regular,
    Lambda,
    DefaultImpls,
    WhenMappings,
}

impl SyntheticFlavor {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntheticFlavor::Regular => "regular",
            SyntheticFlavor::Lambda => "lambda",
            SyntheticFlavor::DefaultImpls => "default_impls",
            SyntheticFlavor::WhenMappings => "when_mappings",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMultiFileFacade {
    /// Internal names of the parts, in declaration order
    pub part_class_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMultiFilePart {
    pub facade_name: String,
    #[serde(flatten)]
    pub container: RawContainer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConstructor {
    pub flags: RawFlags,
    pub value_parameters: Vec<RawValueParameter>,
    pub version_requirements: Vec<VersionTag>,
    /// The `<init>` method backing this constructor
    pub method: Option<RawJvmMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFunction {
    pub name: String,
    pub flags: RawFlags,
    pub type_parameters: Vec<RawTypeParameter>,
    pub receiver_type: Option<RawType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_receivers: Option<Vec<RawType>>,
    pub value_parameters: Vec<RawValueParameter>,
    pub return_type: RawType,
    pub version_requirements: Vec<VersionTag>,
    pub method: Option<RawJvmMethod>,
    /// Whether the body uses guard conditions in `when`; absent before 2.2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guarded_branches: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProperty {
    pub name: String,
    pub flags: RawFlags,
    pub getter_flags: Option<RawFlags>,
    pub setter_flags: Option<RawFlags>,
    pub type_parameters: Vec<RawTypeParameter>,
    pub receiver_type: Option<RawType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_receivers: Option<Vec<RawType>>,
    pub setter_parameters: Vec<RawValueParameter>,
    #[serde(rename = "type")]
    pub ty: RawType,
    pub version_requirements: Vec<VersionTag>,
    pub backing_field: Option<RawJvmField>,
    pub getter: Option<RawJvmMethod>,
    pub setter: Option<RawJvmMethod>,
    /// Synthetic method the delegate expression was compiled to
    pub delegate_method: Option<RawJvmMethod>,
    /// Annotations of the synthetic `$annotations` method
    pub annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTypeAlias {
    pub name: String,
    pub flags: RawFlags,
    pub type_parameters: Vec<RawTypeParameter>,
    pub underlying_type: RawType,
    pub annotations: Vec<RawAnnotation>,
    pub version_requirements: Vec<VersionTag>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    #[default]
    Invariant,
    In,
    Out,
}

impl Variance {
    /// Keyword prefix; empty for invariant positions
    pub fn prefix(self) -> &'static str {
        match self {
            Variance::Invariant => "",
            Variance::In => "in ",
            Variance::Out => "out ",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTypeParameter {
    pub id: u32,
    pub name: String,
    pub flags: RawFlags,
    pub variance: Variance,
    pub upper_bounds: Vec<RawType>,
    pub annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawValueParameter {
    pub name: String,
    pub flags: RawFlags,
    #[serde(rename = "type")]
    pub ty: RawType,
    pub vararg_element_type: Option<RawType>,
}

/// Type reference. Exactly one of `class_name`, `alias_name`,
/// `type_parameter_id` or `star` is expected; decoders that supply more are
/// resolved in that order of preference, type parameters first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawType {
    pub class_name: Option<String>,
    pub alias_name: Option<String>,
    pub type_parameter_id: Option<u32>,
    pub star: bool,
    pub flags: RawFlags,
    pub variance: Variance,
    pub arguments: Vec<RawType>,
    /// Kotlin annotations on the type usage
    pub annotations: Vec<RawAnnotation>,
}

impl RawType {
    pub fn class(name: impl Into<String>) -> Self {
        RawType {
            class_name: Some(name.into()),
            ..RawType::default()
        }
    }

    pub fn type_parameter(id: u32) -> Self {
        RawType {
            type_parameter_id: Some(id),
            ..RawType::default()
        }
    }

    pub fn star() -> Self {
        RawType {
            star: true,
            ..RawType::default()
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<RawType>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_flags(mut self, flags: RawFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A JVM method referenced from metadata. `access` is `None` when the
/// signature is recorded but the method is absent from the class file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawJvmMethod {
    pub name: String,
    pub descriptor: String,
    pub access: Option<u16>,
    pub annotations: Vec<RawAnnotation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawJvmField {
    pub name: String,
    pub descriptor: String,
    /// `ConstantValue` attribute of the field
    pub constant: Option<RawValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAnnotation {
    /// Internal name of the annotation class
    pub class_name: String,
    pub arguments: Vec<RawArgument>,
}

impl RawAnnotation {
    pub fn new(class_name: impl Into<String>) -> Self {
        RawAnnotation {
            class_name: class_name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: RawValue) -> Self {
        self.arguments.push(RawArgument {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArgument {
    pub name: String,
    pub value: RawValue,
}

/// Annotation argument or constant value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    /// Numbers, booleans and characters, printed as given
    Literal(String),
    String(String),
    Unsigned(u64),
    Enum {
        class_name: String,
        entry: String,
    },
    /// Class literal. JVM annotations carry a type descriptor (`I`,
    /// `Lcom/example/Foo;`), Kotlin annotations an internal name.
    Class {
        class_name: String,
        #[serde(default)]
        array_dimensions: u32,
    },
    Array(Vec<RawValue>),
    Annotation(RawAnnotation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_class_record() {
        let json = r#"{
            "name": "Foo",
            "metadata": {
                "version": "1.8.0",
                "body": { "kind": "class", "flags": ["public", "final", "usual_class"] }
            }
        }"#;
        let entry: ClassEntry = serde_json::from_str(json).unwrap();
        let record = entry.metadata.unwrap();
        assert_eq!(record.version, VersionTag::new(1, 8, 0));
        assert_eq!(record.body.kind(), MetadataKind::Class);
        let container = record.body.container().unwrap();
        assert!(container.functions.is_empty());
        assert!(container.type_aliases.is_none());
    }

    #[test]
    fn test_entry_without_metadata() {
        let entry: ClassEntry = serde_json::from_str(r#"{ "name": "plain/Java" }"#).unwrap();
        assert!(entry.metadata.is_none());
    }

    #[test]
    fn test_flattened_container_members() {
        let json = r#"{
            "kind": "multi_file_part",
            "facade_name": "UtilsKt",
            "functions": [{ "name": "helper", "return_type": { "class_name": "kotlin/Unit" } }]
        }"#;
        let body: RawBody = serde_json::from_str(json).unwrap();
        let RawBody::MultiFilePart(part) = body else {
            panic!("expected a multi-file part");
        };
        assert_eq!(part.facade_name, "UtilsKt");
        assert_eq!(part.container.functions[0].name, "helper");
    }

    #[test]
    fn test_annotation_values() {
        let json = r#"{
            "class_name": "kotlin/RequiresOptIn",
            "arguments": [
                { "name": "message", "value": { "type": "string", "value": "careful" } },
                { "name": "level", "value": { "type": "enum", "value": { "class_name": "kotlin/RequiresOptIn$Level", "entry": "WARNING" } } }
            ]
        }"#;
        let annotation: RawAnnotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.arguments.len(), 2);
        assert_eq!(
            annotation.arguments[1].value,
            RawValue::Enum {
                class_name: "kotlin/RequiresOptIn$Level".to_string(),
                entry: "WARNING".to_string()
            }
        );
    }

    #[test]
    fn test_metadata_kind_keys() {
        let keys: Vec<_> = MetadataKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            ["class", "fileFacade", "syntheticClass", "multiFileClassFacade", "multiFileClassPart"]
        );
    }
}
