//! Diagnostic entity - one located compiler message

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    /// Informational; never fails a build
    Hint,
}

impl Severity {
    /// Case-insensitive match on the compiler's severity token
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("error") {
            Some(Severity::Error)
        } else if token.eq_ignore_ascii_case("warning") {
            Some(Severity::Warning)
        } else if token.eq_ignore_ascii_case("hint") {
            Some(Severity::Hint)
        } else {
            None
        }
    }

    pub fn is_fatal(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Hint => "Hint",
        })
    }
}

/// One line of source shown around a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextLine {
    pub number: usize,
    pub text: String,
    /// True for the line the diagnostic points at
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Resolved against the source root unless the compiler printed an absolute path
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    /// Compiler text, verbatim, continuation lines joined with `\n`
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<ContextLine>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        file: impl Into<PathBuf>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            file: file.into(),
            line,
            column,
            message: message.into(),
            context: None,
            suggestion: None,
        }
    }

    /// First line of the message, for one-line summaries
    pub fn headline(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}, {}) {}: {}",
            self.file.display(),
            self.line,
            self.column,
            self.severity,
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("ERROR"), Some(Severity::Error));
        assert_eq!(Severity::parse("warning"), Some(Severity::Warning));
        assert_eq!(Severity::parse("Hint"), Some(Severity::Hint));
        assert_eq!(Severity::parse("Note"), None);
    }

    #[test]
    fn only_errors_are_fatal() {
        assert!(Severity::Error.is_fatal());
        assert!(!Severity::Warning.is_fatal());
        assert!(!Severity::Hint.is_fatal());
    }

    #[test]
    fn display_matches_compiler_layout() {
        let d = Diagnostic::new(Severity::Error, "foo.nim", 10, 5, "type mismatch");
        assert_eq!(d.to_string(), "foo.nim(10, 5) Error: type mismatch");
    }
}
