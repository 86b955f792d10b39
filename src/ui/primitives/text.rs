use crossterm::style::{Color, Stylize};

use crate::ui::theme;

/// Semantic text style; every coloured string goes through here
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Success => theme::colors::SUCCESS,
            Tone::Error => theme::colors::ERROR,
            Tone::Warning => theme::colors::WARNING,
            Tone::Info => theme::colors::INFO,
            Tone::Dim => theme::colors::DIM,
        }
    }

    pub fn paint(self, text: &str, supports_color: bool) -> String {
        if !supports_color {
            return text.to_string();
        }
        format!("{}", text.with(self.color()))
    }

    pub fn paint_bold(self, text: &str, supports_color: bool) -> String {
        if !supports_color {
            return text.to_string();
        }
        format!("{}", text.with(self.color()).bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_without_color_returns_plain_text() {
        assert_eq!(Tone::Success.paint("ok", false), "ok");
        assert_eq!(Tone::Error.paint_bold("no", false), "no");
    }

    #[test]
    fn paint_with_color_includes_ansi_escape() {
        assert!(Tone::Error.paint("no", true).contains("\u{1b}["));
    }
}
