//! Types, type parameters and value parameters

use kmprint_model::tree::{ParameterBinding, TypeParameter, TypeRef, TypeTarget, ValueParameter};

use super::writer::Writer;
use super::Renderer;

impl Renderer {
    pub(super) fn type_text(&self, ty: &TypeRef) -> String {
        if ty.target == TypeTarget::Star {
            return "*".to_string();
        }

        let mut text = self.inline_annotations(&ty.annotations);
        text.push_str(&ty.modifiers.to_string());
        if let Some(name) = &ty.parameter_name {
            text.push_str(name);
            text.push_str(": ");
        }
        text.push_str(ty.variance.prefix());

        match &ty.target {
            TypeTarget::Function { arity } => {
                let extension = ty.extension_function;
                if ty.nullable {
                    text.push('(');
                }
                for (i, argument) in ty.arguments.iter().enumerate() {
                    if i == 0 && !extension {
                        text.push('(');
                    } else if i == 1 && extension {
                        text.push_str(".(");
                    }
                    if i == *arity {
                        text.push_str(") -> ");
                    } else if (i > 0 && !extension) || (i > 1 && extension) {
                        text.push_str(", ");
                    }
                    text.push_str(&self.type_text(argument));
                }
                if ty.nullable {
                    text.push_str(")?");
                }
                if ty.definitely_non_null {
                    text.push_str(" & Any");
                }
            }
            TypeTarget::Named(name) => {
                text.push_str(name);
                if ty.nullable {
                    text.push('?');
                }
                if ty.definitely_non_null {
                    text.push_str(" & Any");
                }
                if !ty.arguments.is_empty() {
                    text.push('<');
                    text.push_str(&self.type_list(&ty.arguments));
                    text.push('>');
                }
            }
            TypeTarget::Star => {}
        }
        text
    }

    /// Comma-separated types
    pub(super) fn type_list(&self, types: &[TypeRef]) -> String {
        types.iter().map(|ty| self.type_text(ty)).collect::<Vec<_>>().join(", ")
    }

    /// `T.` or `((A) -> R).` style receiver prefix
    pub(super) fn receiver_text(&self, receiver: &TypeRef) -> String {
        if receiver.is_function() {
            format!("({}).", self.type_text(receiver))
        } else {
            format!("{}.", self.type_text(receiver))
        }
    }

    pub(super) fn context_line(&self, w: &mut Writer, receivers: &[TypeRef]) {
        if !receivers.is_empty() {
            w.println_indented(&format!("context({})", self.type_list(receivers)));
        }
    }

    fn type_parameter_text(&self, parameter: &TypeParameter) -> String {
        let mut text = format!(
            "{}{}{}{}",
            parameter.variance.prefix(),
            parameter.modifiers,
            self.inline_annotations(&parameter.annotations),
            parameter.name
        );
        if !parameter.upper_bounds.is_empty() {
            text.push_str(" : ");
            text.push_str(&self.type_list(&parameter.upper_bounds));
        }
        text
    }

    /// `<A, B>`, or nothing without type parameters
    pub(super) fn type_parameters_text(&self, parameters: &[TypeParameter]) -> String {
        if parameters.is_empty() {
            return String::new();
        }
        let parameters: Vec<String> = parameters.iter().map(|p| self.type_parameter_text(p)).collect();
        format!("<{}>", parameters.join(", "))
    }

    pub(super) fn value_parameters_text(&self, parameters: &[ValueParameter]) -> String {
        parameters
            .iter()
            .map(|parameter| self.value_parameter_text(parameter))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn value_parameter_text(&self, parameter: &ValueParameter) -> String {
        let binding = match parameter.binding {
            ParameterBinding::Val => "val ",
            ParameterBinding::Var => "var ",
            ParameterBinding::None => "",
        };
        let mut text = format!(
            "{}{}{}{}: {}",
            binding,
            parameter.modifiers,
            if parameter.vararg { "vararg " } else { "" },
            parameter.name,
            self.type_text(&parameter.ty)
        );
        if parameter.has_default {
            text.push_str(" = /* default value */");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmprint_model::raw::Variance;
    use kmprint_model::tree::{Annotation, AnnotationStyle, Modifier, ModifierSet};
    use kmprint_model::VersionTag;

    fn renderer() -> Renderer {
        Renderer::new(VersionTag::new(1, 8, 0)).unwrap()
    }

    fn function(arity: usize, arguments: &[&str]) -> TypeRef {
        TypeRef {
            target: TypeTarget::Function { arity },
            arguments: arguments.iter().map(|name| TypeRef::named(*name)).collect(),
            ..TypeRef::named("")
        }
    }

    #[test]
    fn test_function_types() {
        let r = renderer();
        assert_eq!(r.type_text(&function(0, &["R"])), "() -> R");
        assert_eq!(r.type_text(&function(2, &["A", "B", "R"])), "(A, B) -> R");

        let mut extension = function(2, &["T", "A", "R"]);
        extension.extension_function = true;
        assert_eq!(r.type_text(&extension), "T.(A) -> R");

        let mut nullable = function(1, &["A", "R"]);
        nullable.nullable = true;
        assert_eq!(r.type_text(&nullable), "((A) -> R)?");
    }

    #[test]
    fn test_suspend_and_parameter_names() {
        let mut argument = TypeRef::named("String");
        argument.parameter_name = Some("text".into());
        let mut ty = function(1, &["Unit"]);
        ty.arguments.insert(0, argument);
        ty.modifiers = ModifierSet::new(vec![Modifier::Suspend]);
        assert_eq!(renderer().type_text(&ty), "suspend (text: String) -> Unit");
    }

    #[test]
    fn test_named_types() {
        let r = renderer();
        let mut list = TypeRef::named("List");
        let mut element = TypeRef::named("T");
        element.variance = Variance::Out;
        element.definitely_non_null = true;
        list.arguments = vec![element, TypeRef {
            target: TypeTarget::Star,
            ..TypeRef::named("")
        }];
        list.nullable = true;
        assert_eq!(r.type_text(&list), "List?<out T & Any, *>");
    }

    #[test]
    fn test_annotated_type() {
        let mut ty = TypeRef::named("Int");
        ty.annotations = vec![Annotation::new("Positive", AnnotationStyle::Kotlin)];
        assert_eq!(renderer().type_text(&ty), "@Positive Int");
    }

    #[test]
    fn test_receivers() {
        let r = renderer();
        assert_eq!(r.receiver_text(&TypeRef::named("String")), "String.");
        assert_eq!(r.receiver_text(&function(0, &["Unit"])), "(() -> Unit).");
    }

    #[test]
    fn test_type_parameters() {
        let parameter = TypeParameter {
            name: "T".into(),
            variance: Variance::In,
            modifiers: ModifierSet::new(vec![Modifier::Reified]),
            annotations: Vec::new(),
            upper_bounds: vec![TypeRef::named("Comparable<T>"), TypeRef::named("Any")],
        };
        let r = renderer();
        assert_eq!(r.type_parameters_text(&[parameter]), "<in reified T : Comparable<T>, Any>");
        assert_eq!(r.type_parameters_text(&[]), "");
    }

    #[test]
    fn test_value_parameters() {
        let parameters = [
            ValueParameter {
                name: "id".into(),
                modifiers: ModifierSet::default(),
                binding: ParameterBinding::Val,
                ty: TypeRef::named("Int"),
                vararg: false,
                has_default: true,
            },
            ValueParameter {
                name: "rest".into(),
                modifiers: ModifierSet::new(vec![Modifier::Noinline]),
                binding: ParameterBinding::None,
                ty: TypeRef::named("String"),
                vararg: true,
                has_default: false,
            },
        ];
        assert_eq!(
            renderer().value_parameters_text(&parameters),
            "val id: Int = /* default value */, noinline vararg rest: String"
        );
    }
}
