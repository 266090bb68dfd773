//! Version policy table
//!
//! Every behavior that differs between metadata format versions is a field of
//! [`PolicySet`]. Rows are keyed by the first version they apply to; a version
//! uses the row with the greatest baseline not above it. Supporting a new
//! format version means adding a row here and nowhere else.

use kmprint_model::VersionTag;

use crate::error::{PrintError, PrintResult};

/// How class values in JVM annotations are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerClassSyntax {
    /// `{UnstableApi}`
    NameOnly,
    /// `{UnstableApi::class}`
    ClassLiteral,
}

/// Version-specific behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySet {
    /// First version this row applies to
    pub baseline: VersionTag,
    /// Emit `@SinceKotlin` for declarations with a version requirement
    pub emit_version_hint: bool,
    /// Render the companion again among the synthetic inner classes
    pub double_emit_companion: bool,
    pub marker_class_annotation_syntax: MarkerClassSyntax,
    /// Keep type aliases declared inside classes
    pub supports_nested_type_alias: bool,
    /// Keep guard-condition markers on functions
    pub supports_guarded_branches: bool,
    pub supports_context_receivers: bool,
    /// List annotation-class properties in the Properties section
    pub annotation_properties_as_members: bool,
}

const V1_0: PolicySet = PolicySet {
    baseline: VersionTag::new(1, 0, 0),
    emit_version_hint: true,
    double_emit_companion: false,
    marker_class_annotation_syntax: MarkerClassSyntax::ClassLiteral,
    supports_nested_type_alias: false,
    supports_guarded_branches: false,
    supports_context_receivers: false,
    annotation_properties_as_members: false,
};

const V1_6: PolicySet = PolicySet {
    baseline: VersionTag::new(1, 6, 0),
    supports_context_receivers: true,
    ..V1_0
};

const V1_8: PolicySet = PolicySet {
    baseline: VersionTag::new(1, 8, 0),
    annotation_properties_as_members: true,
    ..V1_6
};

const V2_1: PolicySet = PolicySet {
    baseline: VersionTag::new(2, 1, 0),
    emit_version_hint: false,
    ..V1_8
};

const V2_2: PolicySet = PolicySet {
    baseline: VersionTag::new(2, 2, 0),
    double_emit_companion: true,
    marker_class_annotation_syntax: MarkerClassSyntax::NameOnly,
    supports_nested_type_alias: true,
    supports_guarded_branches: true,
    ..V2_1
};

/// Policy rows, ascending by baseline
pub static POLICY_TABLE: &[PolicySet] = &[V1_0, V1_6, V1_8, V2_1, V2_2];

/// Lowest supported format version
pub const LOWEST_SUPPORTED: VersionTag = V1_0.baseline;

/// Look up the policy for `version`
pub fn version_policy(version: VersionTag) -> PrintResult<&'static PolicySet> {
    POLICY_TABLE
        .iter()
        .rev()
        .find(|row| row.baseline <= version)
        .ok_or(PrintError::UnsupportedVersion {
            version,
            baseline: LOWEST_SUPPORTED,
        })
}
