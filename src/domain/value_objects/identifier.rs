//! Python identifier validation for module and library names

use std::fmt;

use crate::error::{NuwaError, NuwaResult};

const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// A name that can be imported from Python
///
/// Only ASCII identifiers are accepted; the compiled library's init symbol
/// is derived from this name and must be a plain C identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(raw: &str) -> NuwaResult<Self> {
        let mut chars = raw.chars();
        let valid_start = chars
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '_')
            .unwrap_or(false);
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(NuwaError::config(format!(
                "'{raw}' is not a valid Python identifier"
            )));
        }
        if KEYWORDS.contains(&raw) {
            return Err(NuwaError::config(format!(
                "'{raw}' is a Python keyword and cannot be used as a module name"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Turn a distribution name into a module name (`my-pkg` -> `my_pkg`)
pub fn normalize_module_name(project_name: &str) -> String {
    project_name.trim().replace(['-', '.'], "_")
}
