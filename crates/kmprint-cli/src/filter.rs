//! Class name filters
//!
//! A filter is a comma-separated list of patterns over external class names
//! (`com.example.**`). `*` stays within one package, `**` crosses packages,
//! `?` matches one character and a leading `!` excludes. The first pattern
//! that matches decides; a name no pattern matches is accepted only when the
//! list holds nothing but exclusions.

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
struct Rule {
    pattern: Pattern,
    exclude: bool,
}

#[derive(Debug, Default)]
pub struct ClassFilter {
    rules: Vec<Rule>,
}

impl ClassFilter {
    /// Filter that accepts every class
    pub fn any() -> Self {
        Self::default()
    }

    pub fn parse(patterns: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for item in patterns.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (exclude, text) = match item.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, item),
            };
            let pattern = Pattern::new(&glob_text(text)).with_context(|| format!("Invalid class filter '{}'", item))?;
            rules.push(Rule { pattern, exclude });
        }
        Ok(ClassFilter { rules })
    }

    /// Whether the internal class name `name` is selected
    pub fn matches(&self, name: &str) -> bool {
        for rule in &self.rules {
            if rule.pattern.matches_with(name, OPTIONS) {
                return !rule.exclude;
            }
        }
        self.rules.iter().all(|rule| rule.exclude)
    }
}

/// Translate an external-name pattern to a glob over internal names. `**`
/// becomes its own path component so that the glob crate treats it as
/// recursive.
fn glob_text(external: &str) -> String {
    let internal = external.replace('.', "/");
    let mut text = String::with_capacity(internal.len());
    let mut rest = internal.as_str();
    while let Some(index) = rest.find("**") {
        let (before, after) = rest.split_at(index);
        text.push_str(before);
        if !text.is_empty() && !text.ends_with('/') {
            text.push_str("*/");
        }
        text.push_str("**");
        rest = &after[2..];
        if !rest.is_empty() && !rest.starts_with('/') {
            text.push_str("/*");
        }
    }
    text.push_str(rest);
    text
}
