use nuwa::domain::entities::{Diagnostic, Severity};
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::Tone;
use crate::ui::widgets::r#box::{Box, BoxStyle};

/// Boxed failure that stopped a command before a build result existed
#[derive(Debug, Clone)]
pub struct ErrorBlock {
    title: String,
    message: String,
    fix: Option<String>,
}

impl ErrorBlock {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: Option<String>) -> Self {
        self.fix = fix;
        self
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let mut b = Box::with_title(Tone::Error.paint_bold(&self.title, supports_color))
            .style(BoxStyle::Error);
        b.add_empty();
        b.add_line(&self.message);

        if let Some(fix) = &self.fix {
            b.add_empty();
            b.add_line(format!("FIX: {fix}"));
        }

        b.render(supports_color, supports_unicode)
    }
}

/// One compiler diagnostic with its source excerpt
#[derive(Debug, Clone)]
pub struct DiagnosticBlock<'a> {
    diagnostic: &'a Diagnostic,
}

impl<'a> DiagnosticBlock<'a> {
    pub fn new(diagnostic: &'a Diagnostic) -> Self {
        Self { diagnostic }
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let d = self.diagnostic;
        let (icon, tone) = match d.severity {
            Severity::Error => (Icon::Error, Tone::Error),
            Severity::Warning => (Icon::Warning, Tone::Warning),
            Severity::Hint => (Icon::Hint, Tone::Info),
        };

        let mut lines = d.message.lines();
        let mut out = format!(
            "{} {}: {}\n",
            icon.colored(supports_color, supports_unicode),
            tone.paint_bold(&d.severity.to_string(), supports_color),
            lines.next().unwrap_or_default()
        );
        for rest in lines {
            out.push_str(&format!("  {rest}\n"));
        }
        out.push_str(&format!(
            "  {} {}:{}:{}\n",
            Tone::Dim.paint("-->", supports_color),
            d.file.display(),
            d.line,
            d.column
        ));

        if let Some(context) = &d.context {
            let width = context
                .iter()
                .map(|l| l.number.to_string().len())
                .max()
                .unwrap_or(1);
            for line in context {
                let gutter = Tone::Dim.paint(&format!("{:>width$} |", line.number), supports_color);
                if line.highlight {
                    out.push_str(&format!("  {gutter} {}\n", tone.paint(&line.text, supports_color)));
                    let marker = format!(
                        "{}{}",
                        " ".repeat(d.column.saturating_sub(1)),
                        Icon::Pointer.render(supports_unicode)
                    );
                    out.push_str(&format!(
                        "  {:>width$} {} {}\n",
                        "",
                        Tone::Dim.paint("|", supports_color),
                        tone.paint(&marker, supports_color)
                    ));
                } else {
                    out.push_str(&format!("  {gutter} {}\n", line.text));
                }
            }
        }

        if let Some(suggestion) = &d.suggestion {
            out.push_str(&format!(
                "  {} {suggestion}\n",
                Icon::Arrow.colored(supports_color, supports_unicode)
            ));
        }
        out
    }
}
