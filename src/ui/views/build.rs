//! Develop and build command views

use std::time::Duration;

use nuwa::application::{BuildOutcome, DevelopResult};
use nuwa::{BuildResult, EffectiveConfig, Severity};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::summary::ResultSummary;
use crate::ui::primitives::icon::Icon;

pub fn render_develop_header(
    config: &EffectiveConfig,
    release: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Develop, "Nuwa Develop");
    header.add("Module", config.module_name.as_str());
    header.add("Source", config.source_dir.display().to_string());
    if let Some(profile) = &config.active_profile {
        header.add("Profile", profile.as_str());
    }
    header.add("Mode", if release { "release" } else { "develop" });
    header.render(supports_color, supports_unicode)
}

pub fn render_build_header(
    config: &EffectiveConfig,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Build, "Nuwa Build");
    header.add("Module", config.module_name.as_str());
    header.add("Source", config.source_dir.display().to_string());
    if let Some(profile) = &config.active_profile {
        header.add("Profile", profile.as_str());
    }
    header.add("Mode", "release");
    header.render(supports_color, supports_unicode)
}

fn add_counts(summary: &mut ResultSummary, build: &BuildResult) {
    let errors = build.count(Severity::Error);
    if errors > 0 {
        summary.add_stat(plural(errors, "error"), errors);
    }
    let warnings = build.count(Severity::Warning);
    if warnings > 0 {
        summary.add_stat(plural(warnings, "warning"), warnings);
    }
}

pub fn render_develop_result(
    result: &DevelopResult,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = if result.is_success() {
        ResultSummary::success(format!(
            "Develop Complete in {}",
            format_duration(result.build.duration)
        ))
    } else {
        ResultSummary::failure("Compilation Failed")
    };
    add_counts(&mut summary, &result.build);
    if let Some(artifact) = &result.artifact {
        summary.add_item(artifact.display().to_string());
        summary.with_next_step("import the module from Python");
    }
    summary.render(supports_color, supports_unicode)
}

pub fn render_build_result(
    outcome: &BuildOutcome,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = if outcome.is_success() {
        ResultSummary::success(format!(
            "Build Complete in {}",
            format_duration(outcome.build.duration)
        ))
    } else {
        ResultSummary::failure("Compilation Failed")
    };
    add_counts(&mut summary, &outcome.build);
    for path in outcome.wheel.iter().chain(outcome.sdist.iter()) {
        summary.add_item(path.display().to_string());
    }
    if outcome.is_success() {
        summary.add_item(format!("tag {}", outcome.tag));
    }
    summary.render(supports_color, supports_unicode)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}
