use nuwa::domain::value_objects::ConfigWarning;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::Tone;

/// Unknown `[tool.nuwa]` keys; stderr so stdout stays machine-readable
pub fn print_config_warnings(ui: &UiContext, warnings: &[ConfigWarning]) {
    if ui.json {
        return;
    }
    for w in warnings {
        eprintln!("{}", render_config_warning(w, ui.color, ui.unicode));
    }
}

pub fn render_config_warning(w: &ConfigWarning, color: bool, unicode: bool) -> String {
    let location = match w.line {
        Some(line) => format!("{}:{line}", w.file.display()),
        None => w.file.display().to_string(),
    };
    let mut out = format!(
        "{} Unknown config key '{}' in {location}",
        Icon::Warning.colored(color, unicode),
        Tone::Warning.paint(&w.key, color)
    );
    if let Some(suggestion) = &w.suggestion {
        out.push_str(&format!("\n   Did you mean '{suggestion}'?"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn warning_names_key_line_and_suggestion() {
        let w = ConfigWarning {
            key: "lib-nme".to_string(),
            file: PathBuf::from("pyproject.toml"),
            line: Some(12),
            suggestion: Some("lib-name".to_string()),
        };
        insta::assert_snapshot!(render_config_warning(&w, false, false), @r"
        [WARN] Unknown config key 'lib-nme' in pyproject.toml:12
           Did you mean 'lib-name'?
        ");
    }
}
