//! Types, parameters and annotations

use once_cell::sync::Lazy;
use regex::Regex;

use kmprint_model::descriptor::{class_literal, ClassLiteral};
use kmprint_model::flags::{Flag, FlagKind};
use kmprint_model::raw::{RawAnnotation, RawType, RawTypeParameter, RawValue, RawValueParameter};
use kmprint_model::tree::{
    Annotation, AnnotationStyle, AnnotationValue, Argument, ParameterBinding, TypeParameter, TypeRef, TypeTarget,
    ValueParameter,
};

use super::Adapter;
use crate::interpret::modifiers;

const EXTENSION_FUNCTION_TYPE: &str = "kotlin/ExtensionFunctionType";
const PARAMETER_NAME: &str = "kotlin/ParameterName";
const FUNCTION_PREFIX: &str = "kotlin/Function";

/// JVM annotations that never appear in source
const HIDDEN_JVM_ANNOTATIONS: [&str; 3] = [
    "kotlin/Metadata",
    "org/jetbrains/annotations/NotNull",
    "org/jetbrains/annotations/Nullable",
];

static FUNCTION_ARITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^kotlin/Function(\d+)$").expect("valid regex"));

static ANONYMOUS_PARAMETER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(.*) (\d+)>$").expect("valid regex"));

/// Internal name of an annotation or enum class given either as an internal
/// name or as a type descriptor
pub(super) fn internal_name(name: &str) -> String {
    match class_literal(name) {
        ClassLiteral::Reference(internal) => internal,
        ClassLiteral::Primitive(primitive) => primitive.to_string(),
    }
}

/// `<anonymous parameter 1>` becomes `p1`, `<set-?>` becomes `p0`
pub(super) fn parameter_name(name: &str) -> String {
    ANONYMOUS_PARAMETER.replace(name, "p$2").replace("<set-?>", "p0")
}

impl Adapter<'_, '_> {
    pub(super) fn type_ref(&self, raw: &RawType) -> TypeRef {
        if raw.star {
            return TypeRef {
                target: TypeTarget::Star,
                ..TypeRef::named("")
            };
        }

        let flags = raw.flags.resolve(FlagKind::Type);
        let mut ty = TypeRef::named("");
        ty.nullable = flags.contains(Flag::Nullable);
        ty.definitely_non_null = flags.contains(Flag::DefinitelyNonNull);
        ty.modifiers = modifiers(flags, FlagKind::Type);
        ty.variance = raw.variance;

        for annotation in &raw.annotations {
            match annotation.class_name.as_str() {
                EXTENSION_FUNCTION_TYPE => ty.extension_function = true,
                PARAMETER_NAME => {
                    ty.parameter_name = annotation
                        .arguments
                        .iter()
                        .find(|argument| argument.name == "name")
                        .and_then(|argument| match &argument.value {
                            RawValue::String(name) | RawValue::Literal(name) => Some(name.clone()),
                            _ => None,
                        })
                        .filter(|name| !name.is_empty());
                }
                _ => ty.annotations.push(self.kotlin_annotation(annotation)),
            }
        }

        // `kotlin/Function<R>` without an arity suffix is `() -> R`
        let arity = raw
            .class_name
            .as_deref()
            .filter(|name| name.starts_with(FUNCTION_PREFIX))
            .map(|name| {
                FUNCTION_ARITY
                    .captures(name)
                    .and_then(|captures| captures[1].parse().ok())
                    .unwrap_or(0)
            });
        ty.target = match (raw.type_parameter_id, arity) {
            (Some(id), _) => TypeTarget::Named(self.type_parameters.resolve(id)),
            (None, Some(arity)) => TypeTarget::Function { arity },
            (None, None) => {
                let name = raw.class_name.as_deref().or(raw.alias_name.as_deref()).unwrap_or("");
                TypeTarget::Named(self.names.reference_name(name))
            }
        };
        ty.arguments = raw.arguments.iter().map(|argument| self.type_ref(argument)).collect();
        ty
    }

    pub(super) fn context_receivers(&self, receivers: Option<&[RawType]>) -> Vec<TypeRef> {
        if !self.policy.supports_context_receivers {
            return Vec::new();
        }
        receivers
            .unwrap_or_default()
            .iter()
            .map(|receiver| self.type_ref(receiver))
            .collect()
    }

    pub(super) fn type_parameter(&self, raw: &RawTypeParameter) -> TypeParameter {
        TypeParameter {
            name: raw.name.clone(),
            variance: raw.variance,
            modifiers: modifiers(raw.flags.resolve(FlagKind::TypeParameter), FlagKind::TypeParameter),
            annotations: raw.annotations.iter().map(|a| self.kotlin_annotation(a)).collect(),
            upper_bounds: raw.upper_bounds.iter().map(|bound| self.type_ref(bound)).collect(),
        }
    }

    pub(super) fn value_parameter(&self, raw: &RawValueParameter, binding: ParameterBinding) -> ValueParameter {
        let flags = raw.flags.resolve(FlagKind::ValueParameter);
        ValueParameter {
            name: parameter_name(&raw.name),
            modifiers: modifiers(flags, FlagKind::ValueParameter),
            binding,
            ty: self.type_ref(raw.vararg_element_type.as_ref().unwrap_or(&raw.ty)),
            vararg: raw.vararg_element_type.is_some(),
            has_default: flags.contains(Flag::HasDefaultValue),
        }
    }

    /// Annotations of a JVM element, without the ones the compiler adds for
    /// its own bookkeeping
    pub(super) fn jvm_annotations(&self, raw: &[RawAnnotation]) -> Vec<Annotation> {
        raw.iter()
            .filter(|annotation| !HIDDEN_JVM_ANNOTATIONS.contains(&internal_name(&annotation.class_name).as_str()))
            .map(|annotation| self.annotation(annotation, AnnotationStyle::Jvm))
            .collect()
    }

    pub(super) fn kotlin_annotation(&self, raw: &RawAnnotation) -> Annotation {
        self.annotation(raw, AnnotationStyle::Kotlin)
    }

    fn annotation(&self, raw: &RawAnnotation, style: AnnotationStyle) -> Annotation {
        let class_name = match style {
            AnnotationStyle::Jvm => internal_name(&raw.class_name),
            AnnotationStyle::Kotlin => raw.class_name.clone(),
        };
        Annotation {
            name: self.names.reference_name(&class_name),
            arguments: raw
                .arguments
                .iter()
                .map(|argument| Argument {
                    name: argument.name.clone(),
                    value: self.annotation_value(&argument.value, style),
                })
                .collect(),
            style,
        }
    }

    fn annotation_value(&self, raw: &RawValue, style: AnnotationStyle) -> AnnotationValue {
        match raw {
            RawValue::Literal(text) => AnnotationValue::Literal(text.clone()),
            RawValue::String(text) => AnnotationValue::Str(text.clone()),
            RawValue::Unsigned(value) => AnnotationValue::Unsigned(*value),
            RawValue::Enum { class_name, entry } => AnnotationValue::Enum {
                class: self.names.reference_name(&internal_name(class_name)),
                entry: entry.clone(),
            },
            RawValue::Class {
                class_name,
                array_dimensions,
            } => {
                let literal = match style {
                    AnnotationStyle::Jvm => class_literal(class_name),
                    AnnotationStyle::Kotlin => ClassLiteral::Reference(class_name.clone()),
                };
                match literal {
                    ClassLiteral::Primitive(name) => AnnotationValue::Class {
                        name: name.to_string(),
                        array_dimensions: *array_dimensions,
                        primitive: true,
                    },
                    ClassLiteral::Reference(internal) => AnnotationValue::Class {
                        name: self.names.reference_name(&internal),
                        array_dimensions: *array_dimensions,
                        primitive: false,
                    },
                }
            }
            RawValue::Array(elements) => AnnotationValue::Array(
                elements
                    .iter()
                    .map(|element| self.annotation_value(element, style))
                    .collect(),
            ),
            RawValue::Annotation(annotation) => AnnotationValue::Annotation(self.annotation(annotation, style)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::{NameScope, TypeParameterScope};
    use crate::policy::version_policy;
    use kmprint_model::flags::RawFlags;
    use kmprint_model::raw::Variance;
    use kmprint_model::VersionTag;

    use crate::adapter::ClassPool;

    fn with_adapter(version: VersionTag, test: impl FnOnce(&mut Adapter<'_, '_>)) {
        let entries = Vec::new();
        let pool = ClassPool::new(&entries);
        let mut names = NameScope::new("com/example/Foo");
        names.push_class("com/example/Foo");
        let mut adapter = Adapter {
            pool: &pool,
            policy: version_policy(version).unwrap(),
            names,
            type_parameters: TypeParameterScope::new(),
            visiting: Vec::new(),
        };
        test(&mut adapter);
    }

    #[test]
    fn test_parameter_names() {
        assert_eq!(parameter_name("<anonymous parameter 2>"), "p2");
        assert_eq!(parameter_name("<set-?>"), "p0");
        assert_eq!(parameter_name("value"), "value");
    }

    #[test]
    fn test_function_type() {
        with_adapter(VersionTag::new(1, 8, 0), |adapter| {
            let raw = RawType::class("kotlin/Function1")
                .with_arguments(vec![RawType::class("kotlin/Int"), RawType::class("kotlin/Unit")]);
            let ty = adapter.type_ref(&raw);
            assert_eq!(ty.target, TypeTarget::Function { arity: 1 });
            assert_eq!(ty.arguments.len(), 2);
            assert_eq!(ty.arguments[0].target, TypeTarget::Named("Int".into()));
        });
    }

    #[test]
    fn test_function_without_arity_takes_no_parameters() {
        with_adapter(VersionTag::new(1, 8, 0), |adapter| {
            let raw = RawType::class("kotlin/Function").with_arguments(vec![RawType::class("kotlin/String")]);
            let ty = adapter.type_ref(&raw);
            assert_eq!(ty.target, TypeTarget::Function { arity: 0 });
            assert_eq!(ty.arguments.len(), 1);

            let named = adapter.type_ref(&RawType::class("com/example/FunctionLike"));
            assert_eq!(named.target, TypeTarget::Named("FunctionLike".into()));
        });
    }

    #[test]
    fn test_type_annotations_are_split() {
        with_adapter(VersionTag::new(1, 8, 0), |adapter| {
            let mut raw = RawType::class("kotlin/Function2");
            raw.annotations = vec![
                RawAnnotation::new(EXTENSION_FUNCTION_TYPE),
                RawAnnotation::new("com/example/Marker"),
            ];
            let mut argument = RawType::class("kotlin/String");
            argument.annotations = vec![RawAnnotation::new(PARAMETER_NAME)
                .with_argument("name", RawValue::String("text".into()))];
            raw.arguments = vec![argument];

            let ty = adapter.type_ref(&raw);
            assert!(ty.extension_function);
            assert_eq!(ty.annotations.len(), 1);
            assert_eq!(ty.annotations[0].name, "Marker");
            assert_eq!(ty.annotations[0].style, AnnotationStyle::Kotlin);
            assert_eq!(ty.arguments[0].parameter_name.as_deref(), Some("text"));
        });
    }

    #[test]
    fn test_type_parameter_resolution() {
        with_adapter(VersionTag::new(1, 8, 0), |adapter| {
            adapter.type_parameters.push([(3, "T")]);
            let mut raw = RawType::type_parameter(3).with_flags(RawFlags::Names(vec![Flag::DefinitelyNonNull]));
            raw.variance = Variance::Out;
            let ty = adapter.type_ref(&raw);
            assert_eq!(ty.target, TypeTarget::Named("T".into()));
            assert!(ty.definitely_non_null);
            assert_eq!(ty.variance, Variance::Out);

            let unknown = adapter.type_ref(&RawType::type_parameter(9));
            assert_eq!(unknown.target, TypeTarget::Named("X /* unknown 9 */".into()));
        });
    }

    #[test]
    fn test_hidden_jvm_annotations() {
        with_adapter(VersionTag::new(1, 8, 0), |adapter| {
            let raw = [
                RawAnnotation::new("kotlin/Metadata"),
                RawAnnotation::new("Lorg/jetbrains/annotations/NotNull;"),
                RawAnnotation::new("java/lang/Deprecated"),
            ];
            let annotations = adapter.jvm_annotations(&raw);
            assert_eq!(annotations.len(), 1);
            assert_eq!(annotations[0].name, "Deprecated");
        });
    }

    #[test]
    fn test_class_values() {
        with_adapter(VersionTag::new(2, 0, 0), |adapter| {
            let raw = RawAnnotation::new("com/example/Serializer")
                .with_argument(
                    "forClass",
                    RawValue::Class {
                        class_name: "I".into(),
                        array_dimensions: 0,
                    },
                )
                .with_argument(
                    "other",
                    RawValue::Class {
                        class_name: "Lcom/example/Api;".into(),
                        array_dimensions: 0,
                    },
                );
            let annotation = &adapter.jvm_annotations(std::slice::from_ref(&raw))[0];
            assert_eq!(
                annotation.arguments[0].value,
                AnnotationValue::Class {
                    name: "Int".into(),
                    array_dimensions: 0,
                    primitive: true
                }
            );
            assert_eq!(
                annotation.arguments[1].value,
                AnnotationValue::Class {
                    name: "Api".into(),
                    array_dimensions: 0,
                    primitive: false
                }
            );
        });
    }

    #[test]
    fn test_context_receivers_are_gated() {
        let receivers = [RawType::class("com/example/Logger")];
        with_adapter(VersionTag::new(1, 5, 0), |adapter| {
            assert!(adapter.context_receivers(Some(&receivers)).is_empty());
        });
        with_adapter(VersionTag::new(1, 8, 0), |adapter| {
            assert_eq!(adapter.context_receivers(Some(&receivers)).len(), 1);
            assert!(adapter.context_receivers(None).is_empty());
        });
    }
}
