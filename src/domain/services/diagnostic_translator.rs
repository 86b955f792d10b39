//! Diagnostic translation service
//!
//! Turns captured compiler output into located diagnostics. Lines look like
//!
//! ```text
//! path/to/file.nim(10, 5) Error: type mismatch: got <string>
//! ```
//!
//! Lines that follow a diagnostic and do not start a new record are part of
//! its message. Everything else is kept verbatim as the raw log.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ContextLine, Diagnostic, Severity};
use crate::domain::ports::SourceReader;

/// A single `<file>(<line>, <col>) <Severity>: <message>` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedLine<'a> {
    pub file: &'a str,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub message: &'a str,
}

/// Output of [`DiagnosticTranslator::translate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub diagnostics: Vec<Diagnostic>,
    /// Unrecognized text, in original order
    pub raw_log: Option<String>,
}

pub struct DiagnosticTranslator<'a, R: SourceReader + ?Sized> {
    source_root: &'a Path,
    reader: &'a R,
}

impl<'a, R: SourceReader + ?Sized> DiagnosticTranslator<'a, R> {
    pub fn new(source_root: &'a Path, reader: &'a R) -> Self {
        Self {
            source_root,
            reader,
        }
    }

    pub fn translate(&self, raw: &str) -> Translation {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut raw_lines: Vec<&str> = Vec::new();
        // Continuation lines seen since the last diagnostic opened
        let mut open = false;

        for line in raw.lines() {
            if let Some(located) = parse_located_line(line) {
                diagnostics.push(self.to_diagnostic(&located));
                open = true;
                continue;
            }

            if open && !closes_record(line) {
                if let Some(last) = diagnostics.last_mut() {
                    last.message.push('\n');
                    last.message.push_str(line.trim_end());
                }
                continue;
            }

            open = false;
            raw_lines.push(line);
        }

        for diagnostic in &mut diagnostics {
            let trimmed = diagnostic.message.trim_end().len();
            diagnostic.message.truncate(trimmed);
            diagnostic.context = self.context_for(&diagnostic.file, diagnostic.line);
            diagnostic.suggestion = suggestion_for(&diagnostic.message);
        }

        let raw_log = raw_lines.join("\n");
        let raw_log = if raw_log.trim().is_empty() {
            None
        } else {
            Some(raw_log)
        };

        Translation {
            diagnostics,
            raw_log,
        }
    }

    fn to_diagnostic(&self, located: &LocatedLine<'_>) -> Diagnostic {
        Diagnostic::new(
            located.severity,
            self.resolve(located.file),
            located.line,
            located.column,
            located.message,
        )
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.source_root.join(path)
        }
    }

    /// One line before and one after, when the file can still be read
    fn context_for(&self, file: &Path, line: usize) -> Option<Vec<ContextLine>> {
        let lines = self.reader.read_lines(file)?;
        if line == 0 || line > lines.len() {
            return None;
        }
        let start = line.saturating_sub(2);
        let end = (line + 1).min(lines.len());
        Some(
            lines[start..end]
                .iter()
                .enumerate()
                .map(|(offset, text)| {
                    let number = start + offset + 1;
                    ContextLine {
                        number,
                        text: text.clone(),
                        highlight: number == line,
                    }
                })
                .collect(),
        )
    }
}

/// Match one compiler line. Leading and trailing whitespace is ignored; the
/// file part may contain spaces.
pub fn parse_located_line(line: &str) -> Option<LocatedLine<'_>> {
    let line = line.trim();
    for (open, _) in line.char_indices().filter(|(_, c)| *c == '(') {
        if open == 0 {
            continue;
        }
        if let Some(parsed) = parse_after_paren(line, open) {
            return Some(parsed);
        }
    }
    None
}

fn parse_after_paren(line: &str, open: usize) -> Option<LocatedLine<'_>> {
    let rest = &line[open + 1..];
    let (line_no, rest) = take_number(rest)?;
    let rest = rest.trim_start().strip_prefix(',')?.trim_start();
    let (column, rest) = take_number(rest)?;
    let rest = rest.trim_start().strip_prefix(')')?;

    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        return None;
    }
    let colon = after_ws.find(':')?;
    let severity = Severity::parse(&after_ws[..colon])?;
    let message = after_ws[colon + 1..].trim();

    Some(LocatedLine {
        file: &line[..open],
        line: line_no,
        column,
        severity,
        message,
    })
}

fn take_number(s: &str) -> Option<(usize, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = s[..digits].parse().ok()?;
    Some((value, &s[digits..]))
}

/// Lines that end a diagnostic's continuation instead of extending it:
/// unlocated compiler records (`Hint: ...`, `CC: ...`) and C toolchain output.
fn closes_record(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.len() != line.len() {
        // Indented lines always continue
        return false;
    }
    is_unlocated_record(trimmed) || is_toolchain_line(trimmed)
}

fn is_unlocated_record(line: &str) -> bool {
    let Some(colon) = line.find(": ") else {
        return false;
    };
    let word = &line[..colon];
    let mut chars = word.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

fn is_toolchain_line(line: &str) -> bool {
    const PREFIXES: &[&str] = &["collect2", "ld:", "ld.lld:", "ld64", "LINK :", "LINK:"];
    const MARKERS: &[&str] = &[
        "/ld:",
        "undefined reference",
        "undefined symbol",
        ": error:",
        ": fatal error:",
    ];
    PREFIXES.iter().any(|p| line.starts_with(p)) || MARKERS.iter().any(|m| line.contains(m))
}

fn suggestion_for(message: &str) -> Option<String> {
    const HINTS: &[(&str, &str)] = &[
        (
            "undeclared identifier",
            "Check the spelling, or import the module that defines it.",
        ),
        (
            "type mismatch",
            "Compare the argument types with the signatures listed above.",
        ),
        (
            "cannot open file",
            "Check the import path, or list the package under `nimble-deps`.",
        ),
        (
            "has to be used",
            "Use the value or prefix the call with `discard`.",
        ),
        (
            "invalid indentation",
            "Nim is indentation sensitive; align the block with its siblings.",
        ),
    ];
    let lower = message.to_lowercase();
    HINTS
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, hint)| hint.to_string())
}
