//! Annotation text

use kmprint_model::tree::{Annotation, AnnotationStyle, AnnotationValue};

use super::writer::Writer;
use super::Renderer;
use crate::policy::MarkerClassSyntax;

impl Renderer {
    /// One `@Name(...)` line per annotation
    pub(super) fn annotation_lines(&self, w: &mut Writer, annotations: &[Annotation]) {
        for annotation in annotations {
            w.println_indented(&format!("@{}", self.annotation_text(annotation)));
        }
    }

    /// Annotations written in front of a type or type parameter
    pub(super) fn inline_annotations(&self, annotations: &[Annotation]) -> String {
        annotations
            .iter()
            .map(|annotation| match annotation.style {
                AnnotationStyle::Jvm => format!("@{}", self.annotation_text(annotation)),
                AnnotationStyle::Kotlin => format!("@{} ", self.annotation_text(annotation)),
            })
            .collect()
    }

    /// Annotation without the leading `@`
    pub(super) fn annotation_text(&self, annotation: &Annotation) -> String {
        if annotation.arguments.is_empty() {
            return annotation.name.clone();
        }
        let arguments: Vec<String> = annotation
            .arguments
            .iter()
            .map(|argument| {
                let value = self.value_text(&argument.value, annotation.style);
                match annotation.style {
                    AnnotationStyle::Jvm if argument.name == "value" => value,
                    _ => format!("{} = {}", argument.name, value),
                }
            })
            .collect();
        format!("{}({})", annotation.name, arguments.join(", "))
    }

    fn value_text(&self, value: &AnnotationValue, style: AnnotationStyle) -> String {
        match value {
            AnnotationValue::Literal(text) => text.clone(),
            AnnotationValue::Str(text) => format!("\"{}\"", text),
            AnnotationValue::Unsigned(value) => value.to_string(),
            AnnotationValue::Enum { class, entry } => format!("{}.{}", class, entry),
            AnnotationValue::Class {
                name,
                array_dimensions,
                primitive,
            } => match style {
                AnnotationStyle::Jvm if *primitive => format!("{}::class", name),
                AnnotationStyle::Jvm => match self.policy.marker_class_annotation_syntax {
                    MarkerClassSyntax::NameOnly => name.clone(),
                    MarkerClassSyntax::ClassLiteral => format!("{}::class", name),
                },
                AnnotationStyle::Kotlin => {
                    let depth = *array_dimensions as usize;
                    format!("{}{}{}::class", "Array<".repeat(depth), name, ">".repeat(depth))
                }
            },
            AnnotationValue::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| self.value_text(e, style)).collect();
                match style {
                    AnnotationStyle::Jvm => format!("{{{}}}", elements.join(", ")),
                    AnnotationStyle::Kotlin => format!("[{}]", elements.join(", ")),
                }
            }
            AnnotationValue::Annotation(nested) => self.annotation_text(nested),
        }
    }
}
