//! Compiler diagnostics, most severe first

use nuwa::{BuildResult, Severity};

use crate::ui::blocks::error::DiagnosticBlock;
use crate::ui::ci::diagnostic_annotation;
use crate::ui::primitives::text::Tone;

/// Hints are only shown with `-v`
pub fn render_diagnostics(
    result: &BuildResult,
    verbose: u8,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut shown: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| verbose > 0 || d.severity != Severity::Hint)
        .collect();
    // Stable: compiler order within one severity
    shown.sort_by_key(|d| d.severity);

    let mut out = String::new();
    for d in shown {
        out.push_str(&DiagnosticBlock::new(d).render(supports_color, supports_unicode));
        out.push('\n');
    }

    if !result.success && result.diagnostics.is_empty() {
        if let Some(log) = &result.raw_log {
            out.push_str(&Tone::Dim.paint("Compiler output:", supports_color));
            out.push('\n');
            for line in log.lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }
    }
    out
}

/// One workflow command per error and warning
pub fn render_annotations(result: &BuildResult) -> String {
    result
        .diagnostics
        .iter()
        .filter(|d| d.severity != Severity::Hint)
        .map(|d| diagnostic_annotation(d) + "\n")
        .collect()
}
