//! Functions, properties, constructors and type aliases

use kmprint_model::tree::{
    Accessor, AccessorComment, Annotation, ConstructorInfo, DeclarationNode, FunctionInfo, PropertyInfo, Section,
    TypeAliasInfo,
};

use super::writer::Writer;
use super::Renderer;

const SINCE_KOTLIN: &str = "SinceKotlin";

impl Renderer {
    /// Type alias, property and function sections of a container
    pub(super) fn members(&self, w: &mut Writer, node: &DeclarationNode) {
        let sections = [
            (Section::TypeAliases, "// Type aliases"),
            (Section::Properties, "// Properties"),
            (Section::Functions, "// Functions"),
        ];
        for (section, title) in sections {
            if !node.has_children_in(section) {
                continue;
            }
            w.newline();
            w.println_indented(title);
            w.newline();
            for member in node.children_in(section) {
                self.node(w, member);
            }
        }
    }

    pub(super) fn function(&self, w: &mut Writer, node: &DeclarationNode, info: &FunctionInfo) {
        self.annotation_lines(w, &node.annotations);
        self.context_line(w, &info.context_receivers);

        w.print_indented(&format!("{}fun ", node.modifiers));
        if !node.type_parameters.is_empty() {
            w.print(&format!("{} ", self.type_parameters_text(&node.type_parameters)));
        }
        if let Some(receiver) = &info.receiver {
            w.print(&self.receiver_text(receiver));
        }
        w.print(&format!("{}({})", node.name, self.value_parameters_text(&info.parameters)));
        if let Some(return_type) = &info.return_type {
            w.print(&format!(": {}", self.type_text(return_type)));
        }
        if info.has_body {
            w.println(" { }");
        } else {
            w.newline();
        }
    }

    pub(super) fn property(&self, w: &mut Writer, node: &DeclarationNode, info: &PropertyInfo) {
        self.annotation_lines(w, &node.annotations);
        self.context_line(w, &info.context_receivers);

        w.print_indented(&node.modifiers.to_string());
        if !node.type_parameters.is_empty() {
            w.print(&format!("{} ", self.type_parameters_text(&node.type_parameters)));
        }
        if let Some(receiver) = &info.receiver {
            w.print(&self.receiver_text(receiver));
        }
        w.print(&format!("{}: {}", node.name, self.type_text(&info.ty)));
        if let Some(constant) = &info.constant {
            w.print(&format!(" = {}", constant));
        }

        w.indent();
        if let Some(field) = &info.backing_field {
            w.newline();
            w.print_indented(&format!("// backing field: {}", field));
        }
        if let Some(delegate) = &info.delegate_method {
            w.newline();
            w.print_indented(&format!("// Synthetic method for delegate: {}", delegate));
        }
        if let Some(getter) = &info.getter {
            w.newline();
            self.accessor(w, getter, "get", "getter");
        }
        if let Some(setter) = &info.setter {
            w.newline();
            let head = format!("set({})", self.value_parameters_text(&setter.parameters));
            self.accessor(w, setter, &head, "setter");
        }
        w.outdent();
        w.newline();
    }

    fn accessor(&self, w: &mut Writer, accessor: &Accessor, head: &str, role: &str) {
        self.annotation_lines(w, &accessor.annotations);
        w.print_indented(&format!("{}{}", accessor.modifiers, head));
        match &accessor.comment {
            AccessorComment::Method(description) => w.print(&format!(" // {} method: {}", role, description)),
            AccessorComment::Default => w.print(&format!(" // default {}", role)),
            AccessorComment::None => {}
        }
    }

    /// Primary constructor as it follows the class name, e.g. ` @Inject constructor(a: Int) `
    pub(super) fn primary_constructor_text(&self, node: &DeclarationNode, info: &ConstructorInfo) -> String {
        let (since, declared) = split_since_kotlin(&node.annotations);
        let mut text = String::new();
        for annotation in since {
            text.push_str(&format!(" @{}", self.annotation_text(annotation)));
        }
        if !declared.is_empty() {
            text.push(' ');
            for annotation in declared {
                text.push_str(&format!("@{}", self.annotation_text(annotation)));
            }
        }
        if !node.annotations.is_empty() {
            text.push_str(" constructor");
        }
        text.push_str(&format!("({}) ", self.value_parameters_text(&info.parameters)));
        text
    }

    pub(super) fn secondary_constructor(&self, w: &mut Writer, node: &DeclarationNode, info: &ConstructorInfo) {
        let (since, declared) = split_since_kotlin(&node.annotations);
        for annotation in since.into_iter().chain(declared) {
            w.println_indented(&format!("@{}", self.annotation_text(annotation)));
        }
        w.println_indented(&format!("constructor({}) {{ }}", self.value_parameters_text(&info.parameters)));
    }

    pub(super) fn type_alias(&self, w: &mut Writer, node: &DeclarationNode, info: &TypeAliasInfo) {
        self.annotation_lines(w, &node.annotations);
        w.print_indented(&format!("typealias {}", node.name));
        w.print(&self.type_parameters_text(&node.type_parameters));
        w.println(&format!(" = {}", self.type_text(&info.underlying)));
    }
}

/// `@SinceKotlin` markers first, declared annotations second
fn split_since_kotlin(annotations: &[Annotation]) -> (Vec<&Annotation>, Vec<&Annotation>) {
    annotations.iter().partition(|annotation| annotation.name == SINCE_KOTLIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kmprint_model::tree::{
        AnnotationStyle, AnnotationValue, Modifier, ModifierSet, NodeKind, ParameterBinding, TypeRef, ValueParameter,
    };
    use kmprint_model::VersionTag;

    fn renderer() -> Renderer {
        Renderer::new(VersionTag::new(1, 8, 0)).unwrap()
    }

    fn parameter(name: &str, ty: &str) -> ValueParameter {
        ValueParameter {
            name: name.into(),
            modifiers: ModifierSet::default(),
            binding: ParameterBinding::None,
            ty: TypeRef::named(ty),
            vararg: false,
            has_default: false,
        }
    }

    fn since(version: &str) -> Annotation {
        Annotation::new(SINCE_KOTLIN, AnnotationStyle::Jvm).with_argument("value", AnnotationValue::Str(version.into()))
    }

    fn render(node: &DeclarationNode) -> String {
        let mut w = Writer::new();
        renderer().node(&mut w, node);
        w.finish()
    }

    #[test]
    fn test_function_line() {
        let mut node = DeclarationNode::new(
            NodeKind::Function(FunctionInfo {
                receiver: Some(TypeRef::named("String")),
                context_receivers: vec![TypeRef::named("Logger")],
                parameters: vec![parameter("count", "Int")],
                return_type: Some(TypeRef::named("Boolean")),
                has_body: true,
                guarded_branches: false,
                synthetic_owner: false,
            }),
            "check",
        );
        node.modifiers = ModifierSet::new(vec![Modifier::Inline]);
        node.annotations = vec![since("1.7.0")];
        assert_eq!(
            render(&node),
            "@SinceKotlin(\"1.7.0\")\ncontext(Logger)\ninline fun String.check(count: Int): Boolean { }\n"
        );
    }

    #[test]
    fn test_abstract_function_without_body() {
        let node = DeclarationNode::new(
            NodeKind::Function(FunctionInfo {
                receiver: None,
                context_receivers: Vec::new(),
                parameters: Vec::new(),
                return_type: None,
                has_body: false,
                guarded_branches: true,
                synthetic_owner: false,
            }),
            "run",
        );
        assert_eq!(render(&node), "fun run()\n");
    }

    #[test]
    fn test_property_comments() {
        let mut node = DeclarationNode::new(
            NodeKind::Property(PropertyInfo {
                receiver: None,
                context_receivers: Vec::new(),
                ty: TypeRef::named("Int"),
                constant: None,
                backing_field: Some("private int count".into()),
                delegate_method: None,
                getter: Some(Accessor {
                    modifiers: ModifierSet::default(),
                    annotations: Vec::new(),
                    parameters: Vec::new(),
                    comment: AccessorComment::Method("public final int getCount()".into()),
                }),
                setter: Some(Accessor {
                    modifiers: ModifierSet::new(vec![Modifier::Private]),
                    annotations: Vec::new(),
                    parameters: vec![parameter("p0", "Int")],
                    comment: AccessorComment::Default,
                }),
            }),
            "count",
        );
        node.modifiers = ModifierSet::new(vec![Modifier::Var]);
        assert_eq!(
            render(&node),
            "var count: Int\n    // backing field: private int count\n    get // getter method: public final int getCount()\n    private set(p0: Int) // default setter\n"
        );
    }

    #[test]
    fn test_constructors() {
        let info = ConstructorInfo {
            secondary: false,
            parameters: vec![parameter("a", "Int")],
        };
        let mut node = DeclarationNode::new(NodeKind::Constructor(info.clone()), "Foo");
        assert_eq!(renderer().primary_constructor_text(&node, &info), "(a: Int) ");

        node.annotations = vec![
            Annotation::new("Inject", AnnotationStyle::Jvm),
            since("1.8.0"),
            Annotation::new("Named", AnnotationStyle::Jvm),
        ];
        assert_eq!(
            renderer().primary_constructor_text(&node, &info),
            " @SinceKotlin(\"1.8.0\") @Inject@Named constructor(a: Int) "
        );

        let secondary = ConstructorInfo {
            secondary: true,
            parameters: vec![parameter("b", "String")],
        };
        let node = DeclarationNode::new(NodeKind::Constructor(secondary), "Foo");
        assert_eq!(render(&node), "constructor(b: String) { }\n");
    }

    #[test]
    fn test_type_alias() {
        let mut node = DeclarationNode::new(
            NodeKind::TypeAlias(TypeAliasInfo {
                underlying: TypeRef::named("Map<String, Int>"),
            }),
            "Counts",
        );
        node.annotations = vec![Annotation::new("Experimental", AnnotationStyle::Kotlin)];
        assert_eq!(render(&node), "@Experimental\ntypealias Counts = Map<String, Int>\n");
    }
}
