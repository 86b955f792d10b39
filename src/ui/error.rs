use nuwa::{DiscoveryError, NuwaError};

use crate::ui::blocks::error::ErrorBlock;
use crate::ui::ci::{github_actions_annotation, AnnotationLevel};
use crate::ui::context::UiContext;
use crate::ui::json::{emit_event, events::ErrorEvent};

/// Exit code for errors that never reached the library (argument handling, stdout)
const UNCLASSIFIED_EXIT: i32 = 4;

/// Exit status for a command that failed with `err`
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<NuwaError>()
        .map(|e| e.exit_code().code())
        .unwrap_or(UNCLASSIFIED_EXIT)
}

fn title(err: &NuwaError) -> &'static str {
    match err {
        NuwaError::Config { .. } | NuwaError::Toml(_) => "CONFIG ERROR",
        NuwaError::Discovery(DiscoveryError::NotFound { .. }) => "NO ENTRY POINT",
        NuwaError::Discovery(DiscoveryError::Ambiguous { .. }) => "AMBIGUOUS ENTRY POINT",
        NuwaError::Environment { .. } => "MISSING TOOL",
        NuwaError::Packaging { .. } | NuwaError::Zip(_) => "PACKAGING ERROR",
        NuwaError::Conflict { .. } => "ARCHIVE EXISTS",
        NuwaError::Watch { .. } => "WATCH ERROR",
        NuwaError::Io(_) => "IO ERROR",
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let block = match err.downcast_ref::<NuwaError>() {
        Some(nuwa) => ErrorBlock::new(title(nuwa), format!("{err:#}")).with_fix(nuwa.remedy()),
        None => ErrorBlock::new("ERROR", format!("{err:#}")),
    };
    block.render(supports_color, supports_unicode)
}

pub fn print_error(command: &str, err: &anyhow::Error, ui: &UiContext) {
    if ui.json {
        let help = err.downcast_ref::<NuwaError>().and_then(NuwaError::remedy);
        let event = ErrorEvent::new(command, exit_code_for(err), format!("{err:#}"), help);
        if let Err(e) = emit_event(&event) {
            tracing::debug!(error = %e, "failed to write error event");
        }
        return;
    }

    if ui.annotate() {
        println!(
            "{}",
            github_actions_annotation(AnnotationLevel::Error, &format!("{err:#}"), None, None, None)
        );
    }

    eprint!("{}", format_error(err, ui.color, ui.unicode));
}
