use std::borrow::Cow;

use unicode_width::UnicodeWidthStr;

use crate::ui::primitives::text::Tone;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxStyle {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl BoxStyle {
    fn tone(self) -> Tone {
        match self {
            BoxStyle::Info => Tone::Info,
            BoxStyle::Success => Tone::Success,
            BoxStyle::Warning => Tone::Warning,
            BoxStyle::Error => Tone::Error,
        }
    }
}

/// Rounded (or ASCII) frame around a title and content rows
#[derive(Debug, Default, Clone)]
pub struct Box {
    title: Option<String>,
    content: Vec<String>,
    style: BoxStyle,
}

impl Box {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    /// Multi-line input becomes one row per line
    pub fn add_line(&mut self, line: impl AsRef<str>) {
        self.content
            .extend(line.as_ref().lines().map(str::to_string));
    }

    pub fn add_empty(&mut self) {
        self.content.push(String::new());
    }

    pub fn render(&self, supports_color: bool, supports_unicode: bool) -> String {
        let rows: Vec<&str> = self
            .title
            .iter()
            .chain(self.content.iter())
            .map(String::as_str)
            .collect();
        let inner = rows.iter().map(|r| visible_width(r)).max().unwrap_or(0) + 2;

        let (tl, tr, bl, br, h, v) = if supports_unicode {
            use theme::borders::*;
            (TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT, HORIZONTAL, VERTICAL)
        } else {
            use theme::borders_ascii::*;
            (TOP_LEFT, TOP_RIGHT, BOTTOM_LEFT, BOTTOM_RIGHT, HORIZONTAL, VERTICAL)
        };
        let tone = self.style.tone();
        let edge = |s: &str| tone.paint(s, supports_color);

        let mut out = edge(&format!("{tl}{}{tr}", h.repeat(inner)));
        out.push('\n');
        for row in rows {
            let pad = inner - 1 - visible_width(row);
            out.push_str(&format!("{} {row}{}{}\n", edge(v), " ".repeat(pad), edge(v)));
        }
        out.push_str(&edge(&format!("{bl}{}{br}", h.repeat(inner))));
        out.push('\n');
        out
    }
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).width()
}

fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\u{1b}') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // ESC [ ... <final letter>
            if matches!(chars.peek(), Some('[') | Some(']')) {
                chars.next();
            }
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    Cow::Owned(out)
}
