//! Declaration renderer
//!
//! Walks a [`DeclarationNode`] tree and produces source-like text: four
//! spaces per indentation level, `\n` line endings, member sections in a
//! fixed order. Output is a pure function of the tree and the version policy.
//! Trailing whitespace is not stripped; see [`trim_trailing_whitespace`].

mod annotations;
mod members;
mod types;
mod writer;

use tracing::debug;

use kmprint_model::tree::{ClassInfo, DeclarationNode, Header, NodeKind, PartInfo, Section, SyntheticInfo};
use kmprint_model::VersionTag;

use crate::config::CompanionEmission;
use crate::error::PrintResult;
use crate::policy::{version_policy, PolicySet};

use writer::Writer;

/// Enum entries per line
const ENUM_ENTRIES_PER_LINE: usize = 5;

const SYNTHETIC_INNER_TITLE: &str =
    "// Synthetic inner classes - these were generated by the Kotlin compiler from e.g. lambdas";

/// Renders declaration trees built for one metadata format version
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    policy: &'static PolicySet,
    companion_emission: CompanionEmission,
}

impl Renderer {
    pub fn new(version: VersionTag) -> PrintResult<Self> {
        Ok(Renderer {
            policy: version_policy(version)?,
            companion_emission: CompanionEmission::default(),
        })
    }

    pub fn with_companion_emission(mut self, emission: CompanionEmission) -> Self {
        self.companion_emission = emission;
        self
    }

    pub fn render(&self, node: &DeclarationNode) -> String {
        let mut w = Writer::new();
        self.node(&mut w, node);
        w.finish()
    }

    fn node(&self, w: &mut Writer, node: &DeclarationNode) {
        match &node.kind {
            NodeKind::Class(info) | NodeKind::Companion(info) => self.class(w, node, info),
            NodeKind::FileFacade(header) => self.file_facade(w, node, header),
            NodeKind::SyntheticClass(info) => self.synthetic_class(w, node, info),
            NodeKind::MultiFileFacade(header) => self.multi_file_facade(w, node, header),
            NodeKind::MultiFilePart(info) => self.multi_file_part(w, node, info),
            NodeKind::Function(info) => self.function(w, node, info),
            NodeKind::Property(info) => self.property(w, node, info),
            NodeKind::Constructor(info) => self.secondary_constructor(w, node, info),
            NodeKind::TypeAlias(info) => self.type_alias(w, node, info),
        }
    }

    fn header(&self, w: &mut Writer, header: &Header) {
        if header.top_level {
            if let Some(package) = &header.package {
                w.println_indented(&format!("package {}", package));
                w.newline();
            }
            w.println_indented("/**");
            w.print(&format!("* Kotlin {} ", header.describe()));
            w.println_indented(&format!("(metadata version {}).", header.version));
            w.println_indented(&format!("* From Java class: {}", header.external_name));
            w.println_indented("*/");
        } else {
            w.println_indented(&format!(
                "// Kotlin {} from Java class: {}",
                header.describe(),
                header.external_name
            ));
            if let Some(origin) = &header.anonymous_origin {
                w.println_indented(&format!("// Anonymous object origin: {}", origin));
            }
        }
    }

    fn class(&self, w: &mut Writer, node: &DeclarationNode, info: &ClassInfo) {
        self.header(w, &info.header);
        self.annotation_lines(w, &node.annotations);
        self.context_line(w, &info.context_receivers);

        let modifiers = node.modifiers.to_string();
        if matches!(node.kind, NodeKind::Companion(_)) && node.name == "Companion" {
            w.print_indented(modifiers.trim());
        } else {
            w.print_indented(&format!("{}{}", modifiers, node.name));
        }
        w.print(&self.type_parameters_text(&node.type_parameters));

        let primary = node.children_in(Section::Constructors).find_map(|child| match &child.kind {
            NodeKind::Constructor(ctor) if !ctor.secondary && !ctor.parameters.is_empty() => Some((child, ctor)),
            _ => None,
        });
        match primary {
            Some((child, ctor)) => w.print(&self.primary_constructor_text(child, ctor)),
            None => w.print(" "),
        }
        if !info.supertypes.is_empty() {
            w.print(&format!(": {}", self.type_list(&info.supertypes)));
            if !info.supertypes_elided {
                w.print(" ");
            }
        }

        w.indent();
        w.push();

        if !info.sealed_subclasses.is_empty() {
            w.println_indented(&format!("// Sealed subclasses: {}", info.sealed_subclasses.join(", ")));
        }
        if node.children_in(Section::Constructors).count() > 1 {
            w.println_indented("// Secondary constructors");
            for child in node.children_in(Section::Constructors) {
                if let NodeKind::Constructor(ctor) = &child.kind {
                    if ctor.secondary {
                        self.secondary_constructor(w, child, ctor);
                    }
                }
            }
        }
        if let Some(underlying) = &info.underlying_property {
            w.println_indented(&format!("// Underlying property name: {}", underlying.name));
            let ty = underlying.ty.as_ref().map(|ty| self.type_text(ty)).unwrap_or_default();
            w.println_indented(&format!("// Underlying property type: {}", ty));
        }

        self.members(w, node);

        for companion in node.children_in(Section::Companion) {
            w.newline();
            self.node(w, companion);
        }
        for (i, nested) in node.children_in(Section::Nested).enumerate() {
            if i == 0 {
                w.newline();
                w.println_indented("// Nested subclasses");
                w.newline();
            }
            self.node(w, nested);
        }
        self.synthetic_inner(w, node);

        w.push();
        let entries = &info.enum_entries;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 && i % ENUM_ENTRIES_PER_LINE == 0 {
                w.newline();
            }
            if i % ENUM_ENTRIES_PER_LINE == 0 {
                w.print_indented(entry);
            } else {
                w.print(entry);
            }
            if i + 1 != entries.len() {
                w.print(", ");
            }
        }
        w.outdent();

        let entries_text = w.pop();
        let body = w.pop();

        if !body.is_empty() {
            w.println("{");
            if !entries_text.is_empty() {
                w.println(&format!("{};", entries_text));
            }
            w.print_indented(&body);
            w.println_indented("}");
        } else if !entries_text.is_empty() {
            if entries.len() <= ENUM_ENTRIES_PER_LINE {
                w.println(&format!("{{ {} }}", entries_text.trim()));
            } else {
                w.println("{");
                w.print_indented(&format!("{}\n", entries_text));
                w.println_indented("}");
            }
        } else {
            w.newline();
            w.newline();
        }
    }

    fn file_facade(&self, w: &mut Writer, node: &DeclarationNode, header: &Header) {
        self.header(w, header);
        self.members(w, node);
        self.synthetic_inner(w, node);
    }

    fn synthetic_class(&self, w: &mut Writer, node: &DeclarationNode, info: &SyntheticInfo) {
        self.header(w, &info.header);
        w.print_indented(&format!("/* {} */ class {}", info.flavor.as_str(), node.name));
        if node.has_children_in(Section::Functions) {
            w.println(" {");
            w.indent();
            w.println_indented("// Functions");
            for function in node.children_in(Section::Functions) {
                self.node(w, function);
            }
            w.outdent();
            w.println_indented("}");
        } else {
            w.newline();
        }
    }

    fn multi_file_facade(&self, w: &mut Writer, node: &DeclarationNode, header: &Header) {
        self.header(w, header);
        w.newline();
        w.indent();
        for part in node.children_in(Section::Parts) {
            self.node(w, part);
            w.newline();
        }
        w.outdent();
    }

    fn multi_file_part(&self, w: &mut Writer, node: &DeclarationNode, info: &PartInfo) {
        self.header(w, &info.header);
        if let Some(jvm_name) = &info.jvm_name {
            w.println_indented(&format!("@file:JvmName(\"{}\")", jvm_name));
        }
        w.println_indented("@file:JvmMultifileClass");
        self.members(w, node);
        self.synthetic_inner(w, node);
    }

    /// Compiler-generated classes, plus the companion again when the policy
    /// emits it twice
    fn synthetic_inner(&self, w: &mut Writer, node: &DeclarationNode) {
        let mut inner: Vec<&DeclarationNode> = node.children_in(Section::SyntheticInner).collect();
        if self.policy.double_emit_companion && self.companion_emission == CompanionEmission::Policy {
            if let Some(companion) = node.children_in(Section::Companion).next() {
                let key = external_name(companion);
                let position = inner.partition_point(|child| external_name(child) < key);
                debug!(owner = %node.name, companion = %companion.name, "emitting companion again among synthetic inner classes");
                inner.insert(position, companion);
            }
        }

        w.push();
        for child in inner {
            self.node(w, child);
        }
        let text = w.pop();
        if !text.is_empty() {
            w.newline();
            w.println_indented(SYNTHETIC_INNER_TITLE);
            w.newline();
            w.print(&text);
        }
    }
}

fn external_name(node: &DeclarationNode) -> &str {
    node.header().map(|header| header.external_name.as_str()).unwrap_or("")
}

/// Render `node` with the policy of `version`
pub fn render(node: &DeclarationNode, version: VersionTag) -> PrintResult<String> {
    Ok(Renderer::new(version)?.render(node))
}

/// Strip trailing whitespace from every line
pub fn trim_trailing_whitespace(text: &str) -> String {
    let mut trimmed: String = text.lines().map(str::trim_end).collect::<Vec<_>>().join("\n");
    if text.ends_with('\n') {
        trimmed.push('\n');
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmprint_model::raw::{MetadataKind, SyntheticFlavor};
    use kmprint_model::tree::{FunctionInfo, Modifier, ModifierSet, TypeRef};

    fn header(kind: MetadataKind, name: &str, top_level: bool) -> Header {
        Header {
            kind,
            companion: false,
            version: VersionTag::new(1, 8, 0),
            external_name: name.into(),
            package: None,
            top_level,
            anonymous_origin: None,
        }
    }

    fn class(name: &str, external: &str, top_level: bool, modifiers: Vec<Modifier>) -> DeclarationNode {
        let info = ClassInfo {
            header: header(MetadataKind::Class, external, top_level),
            context_receivers: Vec::new(),
            supertypes: Vec::new(),
            supertypes_elided: true,
            sealed_subclasses: Vec::new(),
            enum_entries: Vec::new(),
            underlying_property: None,
        };
        let mut node = DeclarationNode::new(NodeKind::Class(info), name);
        node.modifiers = ModifierSet::new(modifiers);
        node
    }

    fn function(name: &str) -> DeclarationNode {
        let mut node = DeclarationNode::new(
            NodeKind::Function(FunctionInfo {
                receiver: None,
                context_receivers: Vec::new(),
                parameters: Vec::new(),
                return_type: None,
                has_body: true,
                guarded_branches: false,
                synthetic_owner: false,
            }),
            name,
        );
        node.section = Section::Functions;
        node
    }

    fn renderer(version: VersionTag) -> Renderer {
        Renderer::new(version).unwrap()
    }

    #[test]
    fn test_empty_top_level_class() {
        let mut node = class("Foo", "com.example.Foo", true, vec![Modifier::Class]);
        if let NodeKind::Class(info) = &mut node.kind {
            info.header.package = Some("com.example".into());
        }
        assert_eq!(
            renderer(VersionTag::new(1, 8, 0)).render(&node),
            "package com.example\n\n/**\n* Kotlin class (metadata version 1.8.0).\n* From Java class: com.example.Foo\n*/\nclass Foo \n\n"
        );
    }

    #[test]
    fn test_enum_entries_inline_and_wrapped() {
        let mut node = class("Color", "Color", true, vec![Modifier::EnumClass]);
        if let NodeKind::Class(info) = &mut node.kind {
            info.enum_entries = vec!["RED".into(), "GREEN".into()];
        }
        let text = renderer(VersionTag::new(1, 8, 0)).render(&node);
        assert!(text.ends_with("enum class Color { RED, GREEN }\n"), "{}", text);

        if let NodeKind::Class(info) = &mut node.kind {
            info.enum_entries = (1..=7).map(|i| format!("E{}", i)).collect();
        }
        let text = renderer(VersionTag::new(1, 8, 0)).render(&node);
        assert!(
            text.ends_with("enum class Color {\n    E1, E2, E3, E4, E5, \n    E6, E7\n}\n"),
            "{}",
            text
        );
    }

    #[test]
    fn test_class_body_sections() {
        let mut node = class("Foo", "Foo", true, vec![Modifier::Class]);
        node.children.push(function("run"));
        let text = renderer(VersionTag::new(1, 8, 0)).render(&node);
        assert!(text.ends_with("class Foo {\n\n    // Functions\n\n    fun run() { }\n}\n"), "{}", text);
    }

    #[test]
    fn test_nested_class_body_carries_outer_prefix() {
        let mut outer = class("Outer", "Outer", true, vec![Modifier::Class]);
        let mut inner = class("Inner", "Outer$Inner", false, vec![Modifier::Class]);
        inner.section = Section::Nested;
        inner.children.push(function("run"));
        outer.children.push(inner);

        let text = renderer(VersionTag::new(1, 8, 0)).render(&outer);
        let expected = "class Outer {\n\n    // Nested subclasses\n\n    // Kotlin class from Java class: Outer$Inner\n    class Inner {\n    \n        // Functions\n\n        fun run() { }\n    }\n}\n";
        assert!(text.ends_with(expected), "{}", text);
    }

    #[test]
    fn test_companion_double_emission() {
        let mut outer = class("Outer", "Outer", true, vec![Modifier::Class]);
        let info = ClassInfo {
            header: Header {
                companion: true,
                ..header(MetadataKind::Class, "Outer$Companion", false)
            },
            context_receivers: Vec::new(),
            supertypes: Vec::new(),
            supertypes_elided: true,
            sealed_subclasses: Vec::new(),
            enum_entries: Vec::new(),
            underlying_property: None,
        };
        let mut companion = DeclarationNode::new(NodeKind::Companion(info), "Companion");
        companion.modifiers = ModifierSet::new(vec![Modifier::CompanionObject]);
        companion.section = Section::Companion;
        outer.children.push(companion);

        let once = renderer(VersionTag::new(2, 1, 0)).render(&outer);
        assert_eq!(once.matches("companion object").count(), 1);
        assert!(!once.contains(SYNTHETIC_INNER_TITLE));

        let twice = renderer(VersionTag::new(2, 2, 0)).render(&outer);
        assert_eq!(twice.matches("companion object").count(), 2);
        assert!(twice.contains(SYNTHETIC_INNER_TITLE));

        let single = renderer(VersionTag::new(2, 2, 0))
            .with_companion_emission(CompanionEmission::Single)
            .render(&outer);
        assert_eq!(single, once);
    }

    #[test]
    fn test_synthetic_class() {
        let info = SyntheticInfo {
            header: header(MetadataKind::SyntheticClass, "FooKt$main$1", false),
            flavor: SyntheticFlavor::Lambda,
        };
        let mut node = DeclarationNode::new(NodeKind::SyntheticClass(info), "main_1");
        node.children.push(function("invoke"));
        assert_eq!(
            renderer(VersionTag::new(1, 8, 0)).render(&node),
            "// Kotlin synthetic class from Java class: FooKt$main$1\n/* lambda */ class main_1 {\n    // Functions\n    fun invoke() { }\n}\n"
        );
    }

    #[test]
    fn test_multi_file_facade_nests_parts() {
        let mut facade = DeclarationNode::new(
            NodeKind::MultiFileFacade(header(MetadataKind::MultiFileFacade, "UtilsKt", true)),
            "UtilsKt",
        );
        let mut part = DeclarationNode::new(
            NodeKind::MultiFilePart(PartInfo {
                header: header(MetadataKind::MultiFilePart, "UtilsKt__StringsKt", false),
                jvm_name: Some("Utils".into()),
            }),
            "UtilsKt__StringsKt",
        );
        part.section = Section::Parts;
        facade.children.push(part);

        let text = renderer(VersionTag::new(1, 8, 0)).render(&facade);
        assert!(text.contains(
            "\n    // Kotlin multi-file class part from Java class: UtilsKt__StringsKt\n    @file:JvmName(\"Utils\")\n    @file:JvmMultifileClass\n\n"
        ));
    }

    #[test]
    fn test_return_type_rendering_is_deterministic() {
        let mut node = class("Foo", "Foo", true, vec![Modifier::Class]);
        let mut f = function("id");
        if let NodeKind::Function(info) = &mut f.kind {
            info.return_type = Some(TypeRef::named("Int"));
        }
        node.children.push(f);
        let r = renderer(VersionTag::new(1, 8, 0));
        assert_eq!(r.render(&node), r.render(&node));
    }

    #[test]
    fn test_trim_is_idempotent() {
        let text = "class Outer {\n    \n    fun a() { }  \n}\n\n";
        let once = trim_trailing_whitespace(text);
        assert_eq!(once, "class Outer {\n\n    fun a() { }\n}\n\n");
        assert_eq!(trim_trailing_whitespace(&once), once);
    }
}
