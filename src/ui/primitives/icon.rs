use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Hint,
    Progress,
    Arrow,
    Pointer,
    Watch,
    Develop,
    Build,
    Clean,
    Test,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => theme::icons::SUCCESS,
            (true, Icon::Error) => theme::icons::ERROR,
            (true, Icon::Warning) => theme::icons::WARNING,
            (true, Icon::Hint) => theme::icons::HINT,
            (true, Icon::Progress) => theme::icons::PROGRESS,
            (true, Icon::Arrow) => theme::icons::ARROW,
            (true, Icon::Pointer) => theme::icons::POINTER,
            (true, Icon::Watch) => theme::icons::WATCH,
            (true, Icon::Develop) => theme::icons::DEVELOP,
            (true, Icon::Build) => theme::icons::BUILD,
            (true, Icon::Clean) => theme::icons::CLEAN,
            (true, Icon::Test) => theme::icons::TEST,
            (false, Icon::Success) => theme::icons_ascii::SUCCESS,
            (false, Icon::Error) => theme::icons_ascii::ERROR,
            (false, Icon::Warning) => theme::icons_ascii::WARNING,
            (false, Icon::Hint) => theme::icons_ascii::HINT,
            (false, Icon::Progress) => theme::icons_ascii::PROGRESS,
            (false, Icon::Arrow) => theme::icons_ascii::ARROW,
            (false, Icon::Pointer) => theme::icons_ascii::POINTER,
            (false, Icon::Watch) => theme::icons_ascii::WATCH,
            (false, Icon::Develop) => theme::icons_ascii::DEVELOP,
            (false, Icon::Build) => theme::icons_ascii::BUILD,
            (false, Icon::Clean) => theme::icons_ascii::CLEAN,
            (false, Icon::Test) => theme::icons_ascii::TEST,
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success => theme::colors::SUCCESS,
            Icon::Error | Icon::Pointer => theme::colors::ERROR,
            Icon::Warning | Icon::Progress | Icon::Clean => theme::colors::WARNING,
            Icon::Arrow => theme::colors::DIM,
            Icon::Hint | Icon::Watch | Icon::Develop | Icon::Build | Icon::Test => {
                theme::colors::INFO
            }
        };
        format!("{}", s.with(color))
    }
}
