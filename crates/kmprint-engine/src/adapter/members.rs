//! Members of declaration containers

use once_cell::sync::Lazy;
use regex::Regex;

use kmprint_model::descriptor::{external_field_description, external_method_description};
use kmprint_model::flags::{Flag, FlagKind, RawFlags};
use kmprint_model::raw::{
    RawClass, RawConstructor, RawContainer, RawFunction, RawJvmMethod, RawProperty, RawTypeAlias, RawTypeParameter,
    RawValue,
};
use kmprint_model::tree::{
    Accessor, AccessorComment, ConstructorInfo, DeclarationNode, FunctionInfo, NodeKind, ParameterBinding,
    PropertyInfo, Section, TypeAliasInfo,
};

use super::Adapter;
use crate::interpret::{interpret, modifiers, Payload};

const UNIT: &str = "kotlin/Unit";

static SPECIAL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(.*)>$").expect("valid regex"));

impl Adapter<'_, '_> {
    /// Type aliases, properties and functions of `container`, each in its section
    pub(super) fn members(
        &mut self,
        container: &RawContainer,
        owner: &str,
        include_type_aliases: bool,
        hidden_properties: &[&str],
    ) -> Vec<DeclarationNode> {
        let mut members = Vec::new();

        if include_type_aliases {
            for alias in container.type_aliases.iter().flatten() {
                members.push(self.type_alias(alias));
            }
        }
        for property in &container.properties {
            if hidden_properties.contains(&property.name.as_str()) {
                continue;
            }
            members.push(self.property(property, owner));
        }
        for property in &container.local_delegated_properties {
            members.push(self.property(property, owner));
        }
        for function in &container.functions {
            members.push(self.function(function, false));
        }

        members
    }

    pub(super) fn constructor(&mut self, raw: &RawConstructor, class: &RawClass, owner: &str) -> DeclarationNode {
        let flags = raw.flags.resolve(FlagKind::Constructor);
        let interpretation = interpret(
            flags,
            FlagKind::Constructor,
            self.policy,
            &Payload {
                version_requirements: &raw.version_requirements,
                opt_in: None,
            },
        );

        let mut annotations = interpretation.annotations;
        if flags.contains(Flag::HasAnnotations) {
            if let Some(method) = present(raw.method.as_ref()) {
                annotations.extend(self.jvm_annotations(&method.annotations));
            }
        }

        let parameters = raw
            .value_parameters
            .iter()
            .map(|parameter| self.value_parameter(parameter, constructor_binding(class, &parameter.name)))
            .collect();

        let mut node = DeclarationNode::new(
            NodeKind::Constructor(ConstructorInfo {
                secondary: flags.contains(Flag::Secondary),
                parameters,
            }),
            self.names.declaration_name(owner),
        );
        node.section = Section::Constructors;
        node.modifiers = interpretation.modifiers;
        node.annotations = annotations;
        node
    }

    pub(super) fn function(&mut self, raw: &RawFunction, synthetic_owner: bool) -> DeclarationNode {
        let flags = raw.flags.resolve(FlagKind::Function);
        let interpretation = interpret(
            flags,
            FlagKind::Function,
            self.policy,
            &Payload {
                version_requirements: &raw.version_requirements,
                opt_in: None,
            },
        );

        let mut annotations = Vec::new();
        if let Some(method) = present(raw.method.as_ref()) {
            annotations.extend(self.jvm_annotations(&method.annotations));
        }
        annotations.extend(interpretation.annotations);

        self.push_type_parameters(&raw.type_parameters);
        let type_parameters = raw.type_parameters.iter().map(|p| self.type_parameter(p)).collect();
        let returns_unit = raw.return_type.class_name.as_deref() == Some(UNIT) && raw.return_type.type_parameter_id.is_none();
        let info = FunctionInfo {
            receiver: raw.receiver_type.as_ref().map(|ty| self.type_ref(ty)),
            context_receivers: self.context_receivers(raw.context_receivers.as_deref()),
            parameters: raw
                .value_parameters
                .iter()
                .map(|parameter| self.value_parameter(parameter, ParameterBinding::None))
                .collect(),
            return_type: (!returns_unit).then(|| self.type_ref(&raw.return_type)),
            has_body: !flags.contains(Flag::Abstract),
            guarded_branches: self.policy.supports_guarded_branches && raw.guarded_branches.unwrap_or(false),
            synthetic_owner,
        };
        self.type_parameters.pop();

        let mut node = DeclarationNode::new(
            NodeKind::Function(info),
            SPECIAL_NAME.replace(&raw.name, "$1").into_owned(),
        );
        node.section = Section::Functions;
        node.modifiers = interpretation.modifiers;
        node.annotations = annotations;
        node.type_parameters = type_parameters;
        node
    }

    pub(super) fn property(&mut self, raw: &RawProperty, owner: &str) -> DeclarationNode {
        let flags = raw.flags.resolve(FlagKind::Property);
        let interpretation = interpret(
            flags,
            FlagKind::Property,
            self.policy,
            &Payload {
                version_requirements: &raw.version_requirements,
                opt_in: None,
            },
        );

        let mut annotations = Vec::new();
        if flags.contains(Flag::HasAnnotations) {
            annotations.extend(self.jvm_annotations(&raw.annotations));
        }
        annotations.extend(interpretation.annotations);

        self.push_type_parameters(&raw.type_parameters);
        let type_parameters = raw.type_parameters.iter().map(|p| self.type_parameter(p)).collect();

        let constant = raw
            .backing_field
            .as_ref()
            .filter(|_| flags.contains(Flag::HasConstant))
            .and_then(|field| field.constant.as_ref())
            .and_then(constant_text);
        let backing_field = raw.backing_field.as_ref().map(|field| {
            external_field_description(0, &field.name, &field.descriptor).unwrap_or_else(|err| err.to_string())
        });
        let delegate_method = raw.delegate_method.as_ref().map(|method| match present(Some(method)) {
            Some(method) => describe_method(owner, method),
            None => "unknown".to_string(),
        });

        let getter = raw
            .getter_flags
            .as_ref()
            .map(|getter_flags| self.accessor(getter_flags, raw.getter.as_ref(), owner));
        let setter = raw.setter_flags.as_ref().map(|setter_flags| {
            let mut accessor = self.accessor(setter_flags, raw.setter.as_ref(), owner);
            accessor.parameters = raw
                .setter_parameters
                .iter()
                .map(|parameter| self.value_parameter(parameter, ParameterBinding::None))
                .collect();
            accessor
        });

        let info = PropertyInfo {
            receiver: raw.receiver_type.as_ref().map(|ty| self.type_ref(ty)),
            context_receivers: self.context_receivers(raw.context_receivers.as_deref()),
            ty: self.type_ref(&raw.ty),
            constant,
            backing_field,
            delegate_method,
            getter,
            setter,
        };
        self.type_parameters.pop();

        let mut node = DeclarationNode::new(NodeKind::Property(info), raw.name.clone());
        node.section = Section::Properties;
        node.modifiers = interpretation.modifiers;
        node.annotations = annotations;
        node.type_parameters = type_parameters;
        node
    }

    /// Getter or setter; `method` is the JVM method its signature points at
    fn accessor(&self, flags: &RawFlags, method: Option<&RawJvmMethod>, owner: &str) -> Accessor {
        let flags = flags.resolve(FlagKind::PropertyAccessor);
        let annotations = match present(method) {
            Some(method) if flags.contains(Flag::HasAnnotations) => self.jvm_annotations(&method.annotations),
            _ => Vec::new(),
        };
        let comment = match method {
            Some(method) => match present(Some(method)) {
                Some(method) => AccessorComment::Method(describe_method(owner, method)),
                None => AccessorComment::None,
            },
            None if flags.contains(Flag::DefaultAccessor) => AccessorComment::Default,
            None => AccessorComment::None,
        };
        Accessor {
            modifiers: modifiers(flags, FlagKind::PropertyAccessor),
            annotations,
            parameters: Vec::new(),
            comment,
        }
    }

    pub(super) fn type_alias(&mut self, raw: &RawTypeAlias) -> DeclarationNode {
        let flags = raw.flags.resolve(FlagKind::TypeAlias);
        let interpretation = interpret(
            flags,
            FlagKind::TypeAlias,
            self.policy,
            &Payload {
                version_requirements: &raw.version_requirements,
                opt_in: None,
            },
        );

        let mut annotations: Vec<_> = raw.annotations.iter().map(|a| self.kotlin_annotation(a)).collect();
        annotations.extend(interpretation.annotations);

        self.push_type_parameters(&raw.type_parameters);
        let type_parameters = raw.type_parameters.iter().map(|p| self.type_parameter(p)).collect();
        let underlying = self.type_ref(&raw.underlying_type);
        self.type_parameters.pop();

        let mut node = DeclarationNode::new(NodeKind::TypeAlias(TypeAliasInfo { underlying }), raw.name.clone());
        node.section = Section::TypeAliases;
        node.modifiers = interpretation.modifiers;
        node.annotations = annotations;
        node.type_parameters = type_parameters;
        node
    }

    fn push_type_parameters(&mut self, parameters: &[RawTypeParameter]) {
        self.type_parameters
            .push(parameters.iter().map(|p| (p.id, p.name.as_str())));
    }
}

/// The method, if it exists in the class file
fn present(method: Option<&RawJvmMethod>) -> Option<&RawJvmMethod> {
    method.filter(|method| method.access.is_some())
}

fn describe_method(owner: &str, method: &RawJvmMethod) -> String {
    let access = method.access.unwrap_or_default();
    external_method_description(owner, access, &method.name, &method.descriptor).unwrap_or_else(|err| err.to_string())
}

/// `val`/`var` for a constructor parameter, decided by the last property of
/// the same name
fn constructor_binding(class: &RawClass, name: &str) -> ParameterBinding {
    class
        .container
        .properties
        .iter()
        .filter(|property| property.name == name)
        .last()
        .map(|property| {
            if property.setter.is_some() {
                ParameterBinding::Var
            } else if property.getter.is_some() {
                ParameterBinding::Val
            } else {
                ParameterBinding::None
            }
        })
        .unwrap_or_default()
}

/// Text of a compile-time constant
fn constant_text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Literal(text) => Some(text.clone()),
        RawValue::String(text) => Some(format!("\"{}\"", text)),
        RawValue::Unsigned(value) => Some(value.to_string()),
        _ => None,
    }
}
