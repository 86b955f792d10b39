use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::Tone;
use crate::ui::widgets::r#box::{Box, BoxStyle};

/// Closing box of a command: outcome, counts, produced paths
#[derive(Debug, Clone)]
pub struct ResultSummary {
    title: String,
    success: bool,
    stats: Vec<(String, usize)>,
    items: Vec<String>,
    warnings: Vec<String>,
    next_step: Option<String>,
}

impl ResultSummary {
    fn with_outcome(title: impl Into<String>, success: bool) -> Self {
        Self {
            title: title.into(),
            success,
            stats: Vec::new(),
            items: Vec::new(),
            warnings: Vec::new(),
            next_step: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::with_outcome(title, true)
    }

    pub fn failure(title: impl Into<String>) -> Self {
        Self::with_outcome(title, false)
    }

    pub fn add_stat(&mut self, label: impl Into<String>, count: usize) {
        self.stats.push((label.into(), count));
    }

    /// A produced path or fact, listed with the success icon
    pub fn add_item(&mut self, item: impl Into<String>) {
        self.items.push(item.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn with_next_step(&mut self, hint: impl Into<String>) {
        self.next_step = Some(hint.into());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let (style, icon, tone) = if self.success {
            (BoxStyle::Success, Icon::Success, Tone::Success)
        } else {
            (BoxStyle::Error, Icon::Error, Tone::Error)
        };

        let header = format!(
            "{} {}",
            icon.colored(supports_color, supports_unicode),
            tone.paint_bold(&self.title, supports_color)
        );

        let mut b = Box::with_title(header).style(style);

        if !self.stats.is_empty() {
            b.add_empty();
            let stats: Vec<String> = self
                .stats
                .iter()
                .map(|(label, count)| format!("{count} {label}"))
                .collect();
            b.add_line(stats.join(", "));
        }

        if !self.items.is_empty() {
            b.add_empty();
            for item in &self.items {
                b.add_line(format!(
                    "{} {item}",
                    Icon::Success.colored(supports_color, supports_unicode)
                ));
            }
        }

        if !self.warnings.is_empty() {
            b.add_empty();
            for warning in &self.warnings {
                b.add_line(format!(
                    "{} {warning}",
                    Icon::Warning.colored(supports_color, supports_unicode)
                ));
            }
        }

        if let Some(next_step) = &self.next_step {
            b.add_empty();
            b.add_line(format!(
                "{} {} {next_step}",
                Icon::Arrow.colored(supports_color, supports_unicode),
                Tone::Dim.paint("Next:", supports_color)
            ));
        }

        b.render(supports_color, supports_unicode)
    }
}
