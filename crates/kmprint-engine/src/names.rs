//! Display names
//!
//! Class names are shortened relative to the declarations currently being
//! printed: enclosing-class prefixes, the current package and Kotlin default
//! imports are dropped. Type parameter ids resolve through nested scopes.

use once_cell::sync::Lazy;
use regex::Regex;

use kmprint_model::descriptor::{external_class_name, package_name, short_class_name};

static KOTLIN_DEFAULT_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^kotlin/(?:(?:annotation|collections|comparisons|io|ranges|sequences|test|jvm)/)?([^/]*)$")
        .expect("valid regex")
});

static JAVA_LANG_IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^java/lang/([^/]*)$").expect("valid regex"));

/// Replacement for `$` in the simple names of declarations
pub const DECLARATION_DOLLAR: &str = "_";
/// Replacement for `$` in references to classes
pub const REFERENCE_DOLLAR: &str = ".";

/// Container enclosing the declaration being printed
#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    /// A class; nested class names drop its `Outer$` prefix
    Class(String),
    /// A file facade; names it prefixes lose the prefix and one separator
    FileFacade(String),
    Other,
}

/// Stack of enclosing containers, outermost first
#[derive(Debug, Clone, Default)]
pub struct NameScope {
    package: String,
    frames: Vec<Frame>,
}

impl NameScope {
    /// Scope for the top-level container `class_name`
    pub fn new(class_name: &str) -> Self {
        NameScope {
            package: package_name(class_name).to_string(),
            frames: Vec::new(),
        }
    }

    pub fn push_class(&mut self, class_name: &str) {
        self.frames.push(Frame::Class(class_name.to_string()));
    }

    pub fn push_file_facade(&mut self, class_name: &str) {
        self.frames.push(Frame::FileFacade(class_name.to_string()));
    }

    pub fn push_other(&mut self) {
        self.frames.push(Frame::Other);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// True while printing the outermost container
    pub fn is_top(&self) -> bool {
        self.frames.len() <= 1
    }

    /// Internal package of the top-level container
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Display name for the internal class name `name`
    pub fn class_name(&self, name: &str, dollar: &str) -> String {
        if name.is_empty() {
            return "EmptyClassName /* Invalid metadata */".to_string();
        }

        let mut result = name.to_string();
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Class(outer) => {
                    let prefix = format!("{}$", outer);
                    if name.starts_with(&prefix) {
                        result = result.replace(&prefix, "");
                    }
                }
                Frame::FileFacade(facade) => {
                    if let Some(rest) = result.strip_prefix(facade.as_str()) {
                        let mut chars = rest.chars();
                        if chars.next().is_some() {
                            result = chars.as_str().to_string();
                        }
                    }
                }
                Frame::Other => {}
            }
        }

        let local = format!("{}/{}", self.package, short_class_name(name));
        if result == local {
            result = short_class_name(name).to_string();
        }

        result = KOTLIN_DEFAULT_IMPORT.replace(&result, "$1").into_owned();
        result = JAVA_LANG_IMPORT.replace(&result, "$1").into_owned();
        result = result.replace('$', dollar);
        result = external_class_name(&result);

        match result.chars().next() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => result,
            _ => format!("_{}", result),
        }
    }

    /// Name of a declared class, with `$` replaced by `_`
    pub fn declaration_name(&self, name: &str) -> String {
        self.class_name(name, DECLARATION_DOLLAR)
    }

    /// Name of a referenced class, with `$` replaced by `.`
    pub fn reference_name(&self, name: &str) -> String {
        self.class_name(name, REFERENCE_DOLLAR)
    }
}

/// Type parameter names visible at the current position, innermost scope last
#[derive(Debug, Clone, Default)]
pub struct TypeParameterScope {
    frames: Vec<Vec<(u32, String)>>,
}

impl TypeParameterScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<'a>(&mut self, parameters: impl IntoIterator<Item = (u32, &'a str)>) {
        self.frames
            .push(parameters.into_iter().map(|(id, name)| (id, name.to_string())).collect());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolve `id`, innermost scope first
    pub fn resolve(&self, id: u32) -> String {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| format!("X /* unknown {} */", id))
    }
}
