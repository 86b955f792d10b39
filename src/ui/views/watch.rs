use nuwa::application::WatchEvent;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::Tone;
use crate::ui::views::build::format_duration;

pub fn render_watch_header(
    project: &str,
    run_tests: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Watch, "Nuwa Watch");
    header.add("Project", project);
    if run_tests {
        header.add("Tests", "after each successful build");
    }
    header.add("Hint", "Press Ctrl+C to stop");
    header.render(supports_color, supports_unicode)
}

/// One status line per event. Diagnostics of a failed build are rendered
/// separately by the caller.
pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = Tone::Dim.paint(&format!("[{timestamp}]"), supports_color);
    let icon = |i: Icon| i.colored(supports_color, supports_unicode);

    match event {
        WatchEvent::WatchStarted {
            watching,
            debounce_ms,
            ..
        } => format!(
            "{prefix} {} Watching {} ({debounce_ms}ms debounce)\n",
            icon(Icon::Watch),
            watching.join(", ")
        ),
        WatchEvent::FileChanged { path } => {
            format!("{prefix} {} Changed: {path}\n", icon(Icon::Arrow))
        }
        WatchEvent::BuildStarted { generation } => {
            format!("{prefix} {} Building (#{generation})...\n", icon(Icon::Progress))
        }
        WatchEvent::BuildComplete {
            success: true,
            warnings,
            duration_ms,
            artifact,
            ..
        } => {
            let warnings = if *warnings > 0 {
                format!(", {warnings} warning(s)")
            } else {
                String::new()
            };
            format!(
                "{prefix} {} Built in {}{warnings}{}\n",
                icon(Icon::Success),
                format_duration(std::time::Duration::from_millis(*duration_ms)),
                artifact
                    .as_deref()
                    .map(|a| format!(" -> {a}"))
                    .unwrap_or_default()
            )
        }
        WatchEvent::BuildComplete {
            success: false,
            errors,
            warnings,
            ..
        } => format!(
            "{prefix} {} Build failed: {errors} error(s), {warnings} warning(s)\n",
            icon(Icon::Error)
        ),
        WatchEvent::BuildError { message, .. } => {
            format!("{prefix} {} {message}\n", icon(Icon::Error))
        }
        WatchEvent::TestsStarted { command } => {
            format!("{prefix} {} Running {command}\n", icon(Icon::Test))
        }
        WatchEvent::TestsComplete {
            success,
            exit_code,
            duration_ms,
            ..
        } => {
            let took = format_duration(std::time::Duration::from_millis(*duration_ms));
            if *success {
                format!("{prefix} {} Tests passed in {took}\n", icon(Icon::Success))
            } else {
                let code = exit_code
                    .map(|c| format!("exit code {c}"))
                    .unwrap_or_else(|| "terminated".to_string());
                format!("{prefix} {} Tests failed ({code})\n", icon(Icon::Error))
            }
        }
        WatchEvent::Error { message } => {
            format!("{prefix} {} Error: {message}\n", icon(Icon::Error))
        }
        WatchEvent::Shutdown => format!("\n{prefix} {} Watch stopped.\n", icon(Icon::Watch)),
    }
}
