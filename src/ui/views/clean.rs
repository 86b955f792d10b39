//! Clean command views

use std::path::Path;

use nuwa::application::{CleanOptions, CleanResult};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::blocks::summary::ResultSummary;
use crate::ui::primitives::icon::Icon;

pub fn render_clean_header(
    project_root: &Path,
    options: &CleanOptions,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Clean, "Nuwa Clean");
    header.add("Project", project_root.display().to_string());
    let scope = match (options.cleans_artifacts(), options.cleans_deps()) {
        (true, true) => "artifacts, dependencies",
        (true, false) => "artifacts",
        (false, _) => "dependencies",
    };
    header.add("Scope", scope);
    header.render(supports_color, supports_unicode)
}

/// Paths are shown relative to the project root when possible
pub fn render_clean_result(
    result: &CleanResult,
    project_root: &Path,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut summary = if result.is_success() {
        ResultSummary::success("Clean Complete")
    } else {
        ResultSummary::failure("Clean Finished With Errors")
    };

    summary.add_stat("removed", result.deleted.len());
    for path in &result.deleted {
        summary.add_item(relative(path, project_root));
    }
    for skipped in &result.skipped {
        summary.add_warning(format!(
            "skipped {} ({})",
            relative(&skipped.path, project_root),
            skipped.reason
        ));
    }
    for error in &result.errors {
        summary.add_warning(error.as_str());
    }
    if result.deleted.is_empty() && result.is_success() {
        summary.with_next_step("nothing to remove");
    }

    summary.render(supports_color, supports_unicode)
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
