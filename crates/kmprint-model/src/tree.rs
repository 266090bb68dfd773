//! Version-agnostic declaration tree
//!
//! The adapter builds one tree per processed class; the renderer walks it.
//! Names in the tree are display names: class references are already
//! simplified relative to their enclosing scope and type parameters are
//! resolved.

use std::fmt;

use crate::raw::{MetadataKind, SyntheticFlavor, Variance};
use crate::version::VersionTag;

/// A reconstructed declaration
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationNode {
    pub kind: NodeKind,
    pub name: String,
    /// Where this node is listed inside its parent
    pub section: Section,
    pub modifiers: ModifierSet,
    /// Declared annotations followed by synthetic ones, in emission order
    pub annotations: Vec<Annotation>,
    pub type_parameters: Vec<TypeParameter>,
    /// Children in declaration order
    pub children: Vec<DeclarationNode>,
}

impl DeclarationNode {
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        DeclarationNode {
            kind,
            name: name.into(),
            section: Section::Root,
            modifiers: ModifierSet::default(),
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Children listed in `section`, in declaration order
    pub fn children_in(&self, section: Section) -> impl Iterator<Item = &DeclarationNode> {
        self.children.iter().filter(move |child| child.section == section)
    }

    pub fn has_children_in(&self, section: Section) -> bool {
        self.children_in(section).next().is_some()
    }

    /// Header of container nodes
    pub fn header(&self) -> Option<&Header> {
        match &self.kind {
            NodeKind::FileFacade(header) | NodeKind::MultiFileFacade(header) => Some(header),
            NodeKind::Class(class) | NodeKind::Companion(class) => Some(&class.header),
            NodeKind::SyntheticClass(synthetic) => Some(&synthetic.header),
            NodeKind::MultiFilePart(part) => Some(&part.header),
            _ => None,
        }
    }

    /// Walk this node and all descendants, depth first
    pub fn walk(&self, visit: &mut impl FnMut(&DeclarationNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Declaration kinds with their kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    FileFacade(Header),
    Class(ClassInfo),
    Companion(ClassInfo),
    SyntheticClass(SyntheticInfo),
    MultiFileFacade(Header),
    MultiFilePart(PartInfo),
    Function(FunctionInfo),
    Property(PropertyInfo),
    Constructor(ConstructorInfo),
    TypeAlias(TypeAliasInfo),
}

/// Member categories, in the order they are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Root,
    Constructors,
    TypeAliases,
    Properties,
    Functions,
    Companion,
    Nested,
    Parts,
    SyntheticInner,
}

/// Header information of a container
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub kind: MetadataKind,
    pub companion: bool,
    pub version: VersionTag,
    /// Originating JVM class, external form
    pub external_name: String,
    /// External package name, set only for top-level containers outside the default package
    pub package: Option<String>,
    pub top_level: bool,
    pub anonymous_origin: Option<String>,
}

impl Header {
    pub fn describe(&self) -> String {
        if self.companion {
            format!("companion {}", self.kind.describe())
        } else {
            self.kind.describe().to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub header: Header,
    pub context_receivers: Vec<TypeRef>,
    pub supertypes: Vec<TypeRef>,
    /// Set when a default supertype (`Any`, `Enum`, `Annotation`) was left out
    pub supertypes_elided: bool,
    pub sealed_subclasses: Vec<String>,
    pub enum_entries: Vec<String>,
    /// Underlying property of a value class
    pub underlying_property: Option<UnderlyingProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnderlyingProperty {
    pub name: String,
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticInfo {
    pub header: Header,
    pub flavor: SyntheticFlavor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartInfo {
    pub header: Header,
    /// Name given through `@file:JvmName`, when it differs from the facade
    pub jvm_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo {
    pub receiver: Option<TypeRef>,
    pub context_receivers: Vec<TypeRef>,
    pub parameters: Vec<ValueParameter>,
    /// `None` for `Unit`
    pub return_type: Option<TypeRef>,
    pub has_body: bool,
    pub guarded_branches: bool,
    /// Declared in a synthetic class
    pub synthetic_owner: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInfo {
    pub receiver: Option<TypeRef>,
    pub context_receivers: Vec<TypeRef>,
    pub ty: TypeRef,
    /// Compile-time constant, already rendered
    pub constant: Option<String>,
    /// External description of the backing field
    pub backing_field: Option<String>,
    /// External description of the delegate method, `unknown` if unresolved
    pub delegate_method: Option<String>,
    pub getter: Option<Accessor>,
    pub setter: Option<Accessor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Accessor {
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub parameters: Vec<ValueParameter>,
    pub comment: AccessorComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorComment {
    /// External description of the JVM method
    Method(String),
    Default,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInfo {
    pub secondary: bool,
    pub parameters: Vec<ValueParameter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasInfo {
    pub underlying: TypeRef,
}

/// `val`/`var` marker on primary constructor parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParameterBinding {
    #[default]
    None,
    Val,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueParameter {
    pub name: String,
    pub modifiers: ModifierSet,
    pub binding: ParameterBinding,
    /// Element type for varargs
    pub ty: TypeRef,
    pub vararg: bool,
    pub has_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: String,
    pub variance: Variance,
    pub modifiers: ModifierSet,
    pub annotations: Vec<Annotation>,
    pub upper_bounds: Vec<TypeRef>,
}

/// What a type reference points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTarget {
    /// Class, alias or type parameter, by display name
    Named(String),
    /// `kotlin/FunctionN`; the type arguments are the parameters followed by the result
    Function { arity: usize },
    Star,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub target: TypeTarget,
    pub nullable: bool,
    pub definitely_non_null: bool,
    pub modifiers: ModifierSet,
    pub variance: Variance,
    pub arguments: Vec<TypeRef>,
    pub annotations: Vec<Annotation>,
    pub extension_function: bool,
    pub parameter_name: Option<String>,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef {
            target: TypeTarget::Named(name.into()),
            nullable: false,
            definitely_non_null: false,
            modifiers: ModifierSet::default(),
            variance: Variance::Invariant,
            arguments: Vec::new(),
            annotations: Vec::new(),
            extension_function: false,
            parameter_name: None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.target, TypeTarget::Function { .. })
    }
}

/// Keyword modifiers, including declaration keywords and comment markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Internal,
    Private,
    Protected,
    Open,
    Abstract,
    Sealed,
    AnnotationClass,
    Inner,
    Data,
    Value,
    Class,
    Fun,
    Interface,
    Object,
    Expect,
    External,
    CompanionObject,
    EnumEntry,
    EnumClass,
    CompiledInCompatibilityMode,
    HasMethodBodiesInInterface,
    FakeOverride,
    Delegation,
    Synthetic,
    Inline,
    Infix,
    Operator,
    Tailrec,
    Suspend,
    Val,
    Var,
    Const,
    Lateinit,
    Delegated,
    MovedFromInterfaceCompanion,
    Reified,
    Crossinline,
    Noinline,
}

impl Modifier {
    /// Emitted text, including its trailing separator
    pub fn text(self) -> &'static str {
        match self {
            Modifier::Internal => "internal ",
            Modifier::Private => "private ",
            Modifier::Protected => "protected ",
            Modifier::Open => "open ",
            Modifier::Abstract => "abstract ",
            Modifier::Sealed => "sealed ",
            Modifier::AnnotationClass => "annotation class ",
            Modifier::Inner => "inner ",
            Modifier::Data => "data ",
            Modifier::Value => "value ",
            Modifier::Class => "class ",
            Modifier::Fun => "fun ",
            Modifier::Interface => "interface ",
            Modifier::Object => "object ",
            Modifier::Expect => "expect ",
            Modifier::External => "external ",
            Modifier::CompanionObject => "companion object ",
            Modifier::EnumEntry => "enum entry ",
            Modifier::EnumClass => "enum class ",
            Modifier::CompiledInCompatibilityMode => "/* compiledInCompatibilityMode */ ",
            // No trailing space: the class name follows directly
            Modifier::HasMethodBodiesInInterface => "/* hasMethodBodiesInInterface */",
            Modifier::FakeOverride => "fakeOverride ",
            Modifier::Delegation => "by ",
            Modifier::Synthetic => "/* synthetic */ ",
            Modifier::Inline => "inline ",
            Modifier::Infix => "infix ",
            Modifier::Operator => "operator ",
            Modifier::Tailrec => "tailrec ",
            Modifier::Suspend => "suspend ",
            Modifier::Val => "val ",
            Modifier::Var => "var ",
            Modifier::Const => "const ",
            Modifier::Lateinit => "lateinit ",
            Modifier::Delegated => "/* delegated */ ",
            Modifier::MovedFromInterfaceCompanion => "movedFromInterfaceCompanion ",
            Modifier::Reified => "reified ",
            Modifier::Crossinline => "crossinline ",
            Modifier::Noinline => "noinline ",
        }
    }
}

/// Ordered modifiers; order is fixed by the flag interpreter
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet(Vec<Modifier>);

impl ModifierSet {
    pub fn new(modifiers: Vec<Modifier>) -> Self {
        ModifierSet(modifiers)
    }

    pub fn push(&mut self, modifier: Modifier) {
        if !self.0.contains(&modifier) {
            self.0.push(modifier);
        }
    }

    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0.contains(&modifier)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.0 {
            f.write_str(modifier.text())?;
        }
        Ok(())
    }
}

/// Whether an annotation is attached to a JVM element or to metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationStyle {
    Jvm,
    Kotlin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub style: AnnotationStyle,
}

impl Annotation {
    pub fn new(name: impl Into<String>, style: AnnotationStyle) -> Self {
        Annotation {
            name: name.into(),
            arguments: Vec::new(),
            style,
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: AnnotationValue) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: AnnotationValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    Literal(String),
    Str(String),
    Unsigned(u64),
    Enum {
        class: String,
        entry: String,
    },
    Class {
        name: String,
        array_dimensions: u32,
        primitive: bool,
    },
    Array(Vec<AnnotationValue>),
    Annotation(Annotation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_set_display() {
        let mut set = ModifierSet::default();
        set.push(Modifier::Private);
        set.push(Modifier::Data);
        set.push(Modifier::Class);
        set.push(Modifier::Data);
        assert_eq!(set.to_string(), "private data class ");
    }

    #[test]
    fn test_method_bodies_marker_has_no_trailing_space() {
        let set = ModifierSet::new(vec![Modifier::Interface, Modifier::HasMethodBodiesInInterface]);
        assert_eq!(format!("{}Api", set), "interface /* hasMethodBodiesInInterface */Api");
    }

    #[test]
    fn test_children_by_section() {
        let header = Header {
            kind: MetadataKind::FileFacade,
            companion: false,
            version: VersionTag::new(1, 8, 0),
            external_name: "TestKt".into(),
            package: None,
            top_level: true,
            anonymous_origin: None,
        };
        let mut root = DeclarationNode::new(NodeKind::FileFacade(header), "TestKt");
        let mut alias = DeclarationNode::new(
            NodeKind::TypeAlias(TypeAliasInfo { underlying: TypeRef::named("Int") }),
            "Id",
        );
        alias.section = Section::TypeAliases;
        root.children.push(alias);

        assert!(root.has_children_in(Section::TypeAliases));
        assert!(!root.has_children_in(Section::Functions));
        assert_eq!(root.header().map(|h| h.describe()), Some("file facade".to_string()));

        let mut count = 0;
        root.walk(&mut |_| count += 1);
        assert_eq!(count, 2);
    }
}
