//! Metadata model adapter
//!
//! Turns one decoded record into a [`DeclarationNode`] tree. Fields that an
//! older format version does not carry are treated as empty, and fields the
//! version policy does not support are dropped here so that the renderer
//! never has to look at a version number. Related records (companion, nested
//! classes, multi-file parts, synthetic inner classes) are pulled out of the
//! read-only [`ClassPool`].

mod members;
mod types;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use kmprint_model::descriptor::{external_class_name, short_class_name};
use kmprint_model::flags::{Flag, FlagKind};
use kmprint_model::raw::{
    ClassEntry, RawBody, RawClass, RawContainer, RawMultiFileFacade, RawMultiFilePart, RawRecord,
    RawSyntheticClass,
};
use kmprint_model::tree::{
    ClassInfo, DeclarationNode, Header, NodeKind, PartInfo, Section, SyntheticInfo, UnderlyingProperty,
};

use crate::error::PrintResult;
use crate::interpret::{interpret, Payload};
use crate::names::{NameScope, TypeParameterScope};
use crate::policy::{version_policy, PolicySet};

/// Supertypes every class has implicitly; they are not printed
const DEFAULT_SUPERTYPES: [&str; 3] = ["kotlin/Any", "kotlin/Enum", "kotlin/Annotation"];

const REQUIRES_OPT_IN: &str = "kotlin/RequiresOptIn";

/// Name-indexed, read-only view of a batch of classes
#[derive(Debug, Default)]
pub struct ClassPool<'a> {
    classes: FxHashMap<&'a str, &'a ClassEntry>,
    /// Owner to the classes it encloses most closely, sorted by name
    inner: FxHashMap<&'a str, Vec<&'a str>>,
}

impl<'a> ClassPool<'a> {
    pub fn new(entries: &'a [ClassEntry]) -> Self {
        let mut classes = FxHashMap::default();
        for entry in entries {
            classes.insert(entry.name.as_str(), entry);
        }

        let mut inner: FxHashMap<&'a str, Vec<&'a str>> = FxHashMap::default();
        for entry in entries {
            if entry.metadata.is_none() {
                continue;
            }
            let name = entry.name.as_str();
            let owner = name
                .rmatch_indices('$')
                .map(|(index, _)| &name[..index])
                .find(|candidate| !candidate.is_empty() && classes.contains_key(candidate));
            if let Some(owner) = owner {
                inner.entry(owner).or_default().push(name);
            }
        }
        for children in inner.values_mut() {
            children.sort_unstable();
            children.dedup();
        }

        ClassPool { classes, inner }
    }

    pub fn get(&self, name: &str) -> Option<&'a ClassEntry> {
        self.classes.get(name).copied()
    }

    /// Metadata of `name`, if the class is in the pool and carries any
    pub fn record(&self, name: &str) -> Option<&'a RawRecord> {
        self.get(name).and_then(|entry| entry.metadata.as_ref())
    }

    /// Classes with metadata whose closest enclosing pool class is `owner`
    pub fn inner_classes(&self, owner: &str) -> &[&'a str] {
        self.inner.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Build the declaration tree for `class_name`, using the policy of the
/// record's own format version.
pub fn adapt(class_name: &str, record: &RawRecord, pool: &ClassPool<'_>) -> PrintResult<DeclarationNode> {
    let policy = version_policy(record.version)?;
    let mut adapter = Adapter {
        pool,
        policy,
        names: NameScope::new(class_name),
        type_parameters: TypeParameterScope::new(),
        visiting: Vec::new(),
    };
    trace!(class = class_name, version = %record.version, "adapting");
    Ok(adapter.container(class_name, record))
}

struct Adapter<'p, 'a> {
    pool: &'p ClassPool<'a>,
    policy: &'static PolicySet,
    names: NameScope,
    type_parameters: TypeParameterScope,
    /// Containers currently being adapted, outermost first
    visiting: Vec<String>,
}

impl Adapter<'_, '_> {
    fn container(&mut self, class_name: &str, record: &RawRecord) -> DeclarationNode {
        self.visiting.push(class_name.to_string());
        let node = match &record.body {
            RawBody::Class(class) => self.class(class_name, record, class),
            RawBody::FileFacade(container) => self.file_facade(class_name, record, container),
            RawBody::SyntheticClass(synthetic) => self.synthetic_class(class_name, record, synthetic),
            RawBody::MultiFileFacade(facade) => self.multi_file_facade(class_name, record, facade),
            RawBody::MultiFilePart(part) => self.multi_file_part(class_name, record, part),
        };
        self.visiting.pop();
        node
    }

    /// Adapt a related record from the pool; missing records are skipped
    fn child(&mut self, class_name: &str, section: Section) -> Option<DeclarationNode> {
        let Some(record) = self.pool.record(class_name) else {
            debug!(class = class_name, "related class not in pool, skipping");
            return None;
        };
        if self.visiting.iter().any(|visiting| visiting == class_name) {
            warn!(class = class_name, "cycle in class graph, not descending again");
            return None;
        }
        let mut node = self.container(class_name, record);
        node.section = section;
        Some(node)
    }

    fn header(&self, class_name: &str, record: &RawRecord, companion: bool) -> Header {
        let top_level = self.names.is_top();
        let package = self.names.package();
        Header {
            kind: record.body.kind(),
            companion,
            version: record.version,
            external_name: external_class_name(class_name),
            package: (top_level && !package.is_empty()).then(|| external_class_name(package)),
            top_level,
            anonymous_origin: None,
        }
    }

    fn class(&mut self, class_name: &str, record: &RawRecord, class: &RawClass) -> DeclarationNode {
        self.names.push_class(class_name);

        let mut parameters: Vec<(u32, &str)> = Vec::new();
        if let Some(origin) = class.anonymous_object_origin.as_deref() {
            if let Some(RawBody::Class(origin)) = self.pool.record(origin).map(|record| &record.body) {
                parameters.extend(origin.type_parameters.iter().map(|p| (p.id, p.name.as_str())));
            }
        }
        parameters.extend(class.type_parameters.iter().map(|p| (p.id, p.name.as_str())));
        self.type_parameters.push(parameters);

        let flags = class.flags.resolve(FlagKind::Class);
        let companion = flags.contains(Flag::CompanionObject);
        let interpretation = interpret(
            flags,
            FlagKind::Class,
            self.policy,
            &Payload {
                version_requirements: &class.version_requirements,
                opt_in: class.opt_in.as_ref(),
            },
        );

        let declares_opt_in = record
            .annotations
            .iter()
            .any(|annotation| types::internal_name(&annotation.class_name) == REQUIRES_OPT_IN);
        let mut annotations = self.jvm_annotations(&record.annotations);
        annotations.extend(
            interpretation
                .annotations
                .into_iter()
                .filter(|annotation| !(declares_opt_in && annotation.name == "RequiresOptIn")),
        );

        let mut header = self.header(class_name, record, companion);
        header.anonymous_origin = class.anonymous_object_origin.as_deref().map(external_class_name);

        let context_receivers = self.context_receivers(class.context_receivers.as_deref());
        let supertypes = class
            .supertypes
            .iter()
            .filter(|ty| !is_default_supertype(ty.class_name.as_deref()))
            .map(|ty| self.type_ref(ty))
            .collect();
        let supertypes_elided = class
            .supertypes
            .iter()
            .any(|ty| is_default_supertype(ty.class_name.as_deref()));
        let underlying_property = flags.contains(Flag::Value).then(|| UnderlyingProperty {
            name: class
                .underlying_property_name
                .clone()
                .unwrap_or_else(|| "null".to_string()),
            ty: class.underlying_property_type.as_ref().map(|ty| self.type_ref(ty)),
        });

        let info = ClassInfo {
            header,
            context_receivers,
            supertypes,
            supertypes_elided,
            sealed_subclasses: class
                .sealed_subclass_names
                .iter()
                .map(|name| self.names.reference_name(name))
                .collect(),
            enum_entries: class.enum_entry_names.clone(),
            underlying_property,
        };
        let kind = if companion {
            NodeKind::Companion(info)
        } else {
            NodeKind::Class(info)
        };

        let mut node = DeclarationNode::new(kind, self.names.declaration_name(class_name));
        node.modifiers = interpretation.modifiers;
        node.annotations = annotations;
        node.type_parameters = class.type_parameters.iter().map(|p| self.type_parameter(p)).collect();

        for constructor in &class.constructors {
            let child = self.constructor(constructor, class, class_name);
            node.children.push(child);
        }

        let hidden_properties: Vec<&str> =
            if flags.contains(Flag::AnnotationClass) && !self.policy.annotation_properties_as_members {
                class
                    .constructors
                    .iter()
                    .filter(|c| !c.flags.resolve(FlagKind::Constructor).contains(Flag::Secondary))
                    .flat_map(|c| c.value_parameters.iter().map(|p| p.name.as_str()))
                    .collect()
            } else {
                Vec::new()
            };
        let members = self.members(
            &class.container,
            class_name,
            self.policy.supports_nested_type_alias,
            &hidden_properties,
        );
        node.children.extend(members);

        let nested_names: Vec<String> = class
            .nested_class_names
            .iter()
            .map(|simple| format!("{}${}", class_name, simple))
            .collect();
        let companion_name = class
            .companion_object_name
            .as_deref()
            .map(|simple| format!("{}${}", class_name, simple));

        if let Some(companion_name) = &companion_name {
            if let Some(child) = self.child(companion_name, Section::Companion) {
                node.children.push(child);
            }
        }
        for nested in &nested_names {
            if Some(nested) == companion_name.as_ref() {
                continue;
            }
            if let Some(child) = self.child(nested, Section::Nested) {
                node.children.push(child);
            }
        }
        let declared: Vec<&str> = nested_names
            .iter()
            .map(String::as_str)
            .chain(companion_name.as_deref())
            .collect();
        self.synthetic_inner(&mut node, class_name, &declared);

        self.type_parameters.pop();
        self.names.pop();
        node
    }

    fn file_facade(&mut self, class_name: &str, record: &RawRecord, container: &RawContainer) -> DeclarationNode {
        self.names.push_file_facade(class_name);

        let header = self.header(class_name, record, false);
        let mut node = DeclarationNode::new(NodeKind::FileFacade(header), self.names.declaration_name(class_name));
        let members = self.members(container, class_name, true, &[]);
        node.children.extend(members);
        self.synthetic_inner(&mut node, class_name, &[]);

        self.names.pop();
        node
    }

    fn synthetic_class(
        &mut self,
        class_name: &str,
        record: &RawRecord,
        synthetic: &RawSyntheticClass,
    ) -> DeclarationNode {
        self.names.push_other();

        let info = SyntheticInfo {
            header: self.header(class_name, record, false),
            flavor: synthetic.flavor,
        };
        let mut node = DeclarationNode::new(NodeKind::SyntheticClass(info), self.names.declaration_name(class_name));
        for function in &synthetic.functions {
            let child = self.function(function, true);
            node.children.push(child);
        }

        self.names.pop();
        node
    }

    fn multi_file_facade(
        &mut self,
        class_name: &str,
        record: &RawRecord,
        facade: &RawMultiFileFacade,
    ) -> DeclarationNode {
        self.names.push_other();

        let header = self.header(class_name, record, false);
        let mut node = DeclarationNode::new(NodeKind::MultiFileFacade(header), self.names.declaration_name(class_name));
        for part in &facade.part_class_names {
            if part == class_name {
                continue;
            }
            if let Some(child) = self.child(part, Section::Parts) {
                node.children.push(child);
            }
        }

        self.names.pop();
        node
    }

    fn multi_file_part(&mut self, class_name: &str, record: &RawRecord, part: &RawMultiFilePart) -> DeclarationNode {
        self.names.push_other();

        let name = self.names.declaration_name(class_name);
        let short = short_class_name(&name);
        let jvm_name = short.find("__").map(|index| {
            let prefix = &short[..index];
            prefix.strip_suffix("Kt").unwrap_or(prefix).to_string()
        });
        let info = PartInfo {
            header: self.header(class_name, record, false),
            jvm_name,
        };
        let mut node = DeclarationNode::new(NodeKind::MultiFilePart(info), name);
        let members = self.members(&part.container, class_name, true, &[]);
        node.children.extend(members);
        self.synthetic_inner(&mut node, class_name, &[]);

        self.names.pop();
        node
    }

    /// Attach the compiler-generated classes `owner` encloses, excluding
    /// the `declared` nested classes
    fn synthetic_inner(&mut self, node: &mut DeclarationNode, owner: &str, declared: &[&str]) {
        let pool = self.pool;
        for name in pool.inner_classes(owner) {
            if declared.contains(name) {
                continue;
            }
            if let Some(child) = self.child(name, Section::SyntheticInner) {
                node.children.push(child);
            }
        }
    }
}

fn is_default_supertype(class_name: Option<&str>) -> bool {
    class_name.is_some_and(|name| DEFAULT_SUPERTYPES.contains(&name))
}
