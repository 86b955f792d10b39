//! Clean command handler
//!
//! Removes build outputs and the project-local Nim package cache.

use std::path::Path;

use anyhow::Result;

use nuwa::application::{CleanOptions, CleanUseCase, ConfigRequest};
use nuwa::domain::value_objects::OsFamily;
use nuwa::infrastructure::NimbleInstaller;

use crate::ui::context::UiContext;
use crate::ui::json::{emit_event, events::CleanEvent};
use crate::ui::views::clean::{render_clean_header, render_clean_result};

use super::resolve;

pub fn cmd_clean(project: &Path, deps: bool, artifacts: bool, ui: &UiContext) -> Result<i32> {
    let options = CleanOptions::new().with_deps(deps).with_artifacts(artifacts);

    if !ui.json {
        print!(
            "{}",
            render_clean_header(project, &options, ui.color, ui.unicode)
        );
    }

    // A broken pyproject.toml must not stop build directories from going
    let config = if options.cleans_artifacts() {
        match resolve(&ConfigRequest::new(project), ui) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(error = %e, "configuration unavailable for clean");
                None
            }
        }
    } else {
        None
    };

    let result = CleanUseCase::new(NimbleInstaller::default()).execute(
        project,
        config.as_ref(),
        &options,
        OsFamily::host(),
    );

    if ui.json {
        emit_event(&CleanEvent::new(&result))?;
    } else {
        print!(
            "{}",
            render_clean_result(&result, project, ui.color, ui.unicode)
        );
    }

    Ok(if result.is_success() {
        0
    } else {
        nuwa::ExitCode::PackagingError.code()
    })
}
