//! JVM descriptors
//!
//! Converts field and method descriptors into the external, Java-source-like
//! form used in property comments, e.g. `public final int getMyInt()`.

use crate::error::{ModelError, ModelResult};

/// JVM access flags, as stored in class files
pub mod access {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VOLATILE: u16 = 0x0040;
    pub const BRIDGE: u16 = 0x0040;
    pub const TRANSIENT: u16 = 0x0080;
    pub const VARARGS: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const ABSTRACT: u16 = 0x0400;
    pub const STRICT: u16 = 0x0800;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const ENUM: u16 = 0x4000;
}

const METHOD_ACCESS: &[(u16, &str)] = &[
    (access::PUBLIC, "public"),
    (access::PRIVATE, "private"),
    (access::PROTECTED, "protected"),
    (access::STATIC, "static"),
    (access::FINAL, "final"),
    (access::SYNCHRONIZED, "synchronized"),
    (access::BRIDGE, "bridge"),
    (access::VARARGS, "varargs"),
    (access::NATIVE, "native"),
    (access::ABSTRACT, "abstract"),
    (access::STRICT, "strictfp"),
    (access::SYNTHETIC, "synthetic"),
];

const FIELD_ACCESS: &[(u16, &str)] = &[
    (access::PUBLIC, "public"),
    (access::PRIVATE, "private"),
    (access::PROTECTED, "protected"),
    (access::STATIC, "static"),
    (access::FINAL, "final"),
    (access::VOLATILE, "volatile"),
    (access::TRANSIENT, "transient"),
    (access::SYNTHETIC, "synthetic"),
    (access::ENUM, "enum"),
];

fn access_prefix(table: &[(u16, &str)], flags: u16) -> String {
    table
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, keyword)| format!("{} ", keyword))
        .collect()
}

/// Cursor over a descriptor string
struct DescriptorReader<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> DescriptorReader<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn has_more(&self) -> bool {
        self.position < self.text.len()
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        if self.peek() == Some(byte) {
            self.position += 1;
            Some(())
        } else {
            None
        }
    }

    /// Read one field type and return its external name
    fn read_type(&mut self) -> Option<String> {
        let tag = self.peek()?;
        self.position += 1;
        let name = match tag {
            b'B' => "byte".to_string(),
            b'C' => "char".to_string(),
            b'D' => "double".to_string(),
            b'F' => "float".to_string(),
            b'I' => "int".to_string(),
            b'J' => "long".to_string(),
            b'S' => "short".to_string(),
            b'Z' => "boolean".to_string(),
            b'V' => "void".to_string(),
            b'L' => {
                let rest = &self.text[self.position..];
                let end = rest.find(';')?;
                if end == 0 {
                    return None;
                }
                let internal = &rest[..end];
                self.position += end + 1;
                external_class_name(internal)
            }
            b'[' => {
                let element = self.read_type()?;
                if element == "void" {
                    return None;
                }
                format!("{}[]", element)
            }
            _ => return None,
        };
        Some(name)
    }
}

/// `com/example/Foo` to `com.example.Foo`
pub fn external_class_name(internal: &str) -> String {
    internal.replace('/', ".")
}

/// Last segment of an internal or external class name
pub fn short_class_name(name: &str) -> &str {
    name.rsplit(['/', '.']).next().unwrap_or(name)
}

/// Package part of an internal class name; empty for the default package
pub fn package_name(internal: &str) -> &str {
    internal.rfind('/').map(|i| &internal[..i]).unwrap_or("")
}

/// External type of a single field descriptor, e.g. `I` gives `int`
pub fn external_type(descriptor: &str) -> Option<String> {
    let mut reader = DescriptorReader::new(descriptor);
    let name = reader.read_type()?;
    if reader.has_more() {
        return None;
    }
    Some(name)
}

/// `int myInt` style description of a field
pub fn external_field_description(access: u16, name: &str, descriptor: &str) -> ModelResult<String> {
    let ty = external_type(descriptor)
        .filter(|ty| ty != "void")
        .ok_or_else(|| ModelError::InvalidDescriptor {
            kind: "field",
            signature: format!("{}:{}", name, descriptor),
        })?;
    Ok(format!("{}{} {}", access_prefix(FIELD_ACCESS, access), ty, name))
}

/// `public final java.lang.String getName(int)` style description of a
/// method; constructors are named after the short name of `class_name`.
pub fn external_method_description(
    class_name: &str,
    access: u16,
    name: &str,
    descriptor: &str,
) -> ModelResult<String> {
    let invalid = || ModelError::InvalidDescriptor {
        kind: "method",
        signature: format!("{}{}", name, descriptor),
    };

    let mut reader = DescriptorReader::new(descriptor);
    reader.expect(b'(').ok_or_else(invalid)?;
    let mut arguments = Vec::new();
    while reader.peek() != Some(b')') {
        let argument = reader.read_type().filter(|ty| ty != "void").ok_or_else(invalid)?;
        arguments.push(argument);
    }
    reader.expect(b')').ok_or_else(invalid)?;
    let return_type = reader.read_type().ok_or_else(invalid)?;
    if reader.has_more() {
        return Err(invalid());
    }

    let prefix = access_prefix(METHOD_ACCESS, access);
    let arguments = arguments.join(",");
    if name == "<init>" {
        let external = external_class_name(class_name);
        Ok(format!("{}{}({})", prefix, short_class_name(&external), arguments))
    } else {
        Ok(format!("{}{} {}({})", prefix, return_type, name, arguments))
    }
}

/// Class literal in a JVM annotation, as carried by its type descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassLiteral {
    /// Primitive type, given by its Kotlin name
    Primitive(&'static str),
    /// Reference type, given by its internal name
    Reference(String),
}

/// Interpret a class literal descriptor; plain internal names are accepted as-is
pub fn class_literal(descriptor: &str) -> ClassLiteral {
    let primitive = match descriptor {
        "Z" => Some("Boolean"),
        "B" => Some("Byte"),
        "C" => Some("Char"),
        "S" => Some("Short"),
        "I" => Some("Int"),
        "F" => Some("Float"),
        "J" => Some("Long"),
        "D" => Some("Double"),
        _ => None,
    };
    if let Some(name) = primitive {
        return ClassLiteral::Primitive(name);
    }
    let internal = descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap_or(descriptor);
    ClassLiteral::Reference(internal.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_description() {
        assert_eq!(external_field_description(0, "myInt", "I").unwrap(), "int myInt");
        assert_eq!(
            external_field_description(access::PRIVATE | access::FINAL, "names", "[Ljava/lang/String;").unwrap(),
            "private final java.lang.String[] names"
        );
    }

    #[test]
    fn test_invalid_field_descriptor() {
        let err = external_field_description(0, "x", "Lbroken").unwrap_err();
        assert_eq!(err.to_string(), "invalid field descriptor: x:Lbroken");
        assert!(external_field_description(0, "x", "V").is_err());
        assert!(external_field_description(0, "x", "II").is_err());
    }

    #[test]
    fn test_method_description() {
        let getter = external_method_description(
            "Foo",
            access::PUBLIC | access::FINAL,
            "getProp",
            "(LLoggerContext;)Ljava/lang/String;",
        )
        .unwrap();
        assert_eq!(getter, "public final java.lang.String getProp(LoggerContext)");

        let setter = external_method_description("Test", access::PUBLIC | access::FINAL, "setMyInt", "(I)V").unwrap();
        assert_eq!(setter, "public final void setMyInt(int)");
    }

    #[test]
    fn test_method_description_multiple_arguments() {
        let description =
            external_method_description("a/B", access::STATIC, "f", "(IJ[[Z)V").unwrap();
        assert_eq!(description, "static void f(int,long,boolean[][])");
    }

    #[test]
    fn test_constructor_uses_short_class_name() {
        let description =
            external_method_description("com/example/Outer$Inner", access::PUBLIC, "<init>", "(I)V").unwrap();
        assert_eq!(description, "public Outer$Inner(int)");
    }

    #[test]
    fn test_invalid_method_descriptor() {
        let err = external_method_description("A", 0, "f", "(I").unwrap_err();
        assert_eq!(err.to_string(), "invalid method descriptor: f(I");
    }

    #[test]
    fn test_class_literals() {
        assert_eq!(class_literal("I"), ClassLiteral::Primitive("Int"));
        assert_eq!(class_literal("Lcom/example/Api;"), ClassLiteral::Reference("com/example/Api".into()));
        assert_eq!(class_literal("com/example/Api"), ClassLiteral::Reference("com/example/Api".into()));
    }

    #[test]
    fn test_names() {
        assert_eq!(package_name("com/example/Foo"), "com/example");
        assert_eq!(package_name("Foo"), "");
        assert_eq!(short_class_name("com/example/Foo$Bar"), "Foo$Bar");
    }
}
