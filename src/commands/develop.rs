use std::path::Path;

use anyhow::Result;

use nuwa::application::{BuildPipeline, DevelopUseCase};
use nuwa::infrastructure::NimbleInstaller;

use crate::cli::BuildArgs;
use crate::ui::context::UiContext;
use crate::ui::json::{emit_event, events::ResultEvent};
use crate::ui::views::build::{render_develop_header, render_develop_result};
use crate::ui::views::diagnostics::{render_annotations, render_diagnostics};

use super::{config_request, outcome_code, resolve};

pub fn cmd_develop(project: &Path, build: &BuildArgs, release: bool, ui: &UiContext) -> Result<i32> {
    let config = resolve(&config_request(project, build), ui)?;

    if !ui.json {
        print!("{}", render_develop_header(&config, release, ui.color, ui.unicode));
    }

    let pipeline = BuildPipeline::new(NimbleInstaller::default());
    let result = DevelopUseCase::new(pipeline).execute(&config, release)?;

    if ui.json {
        emit_event(&ResultEvent::develop(&result))?;
    } else {
        if ui.annotate() {
            print!("{}", render_annotations(&result.build));
        }
        eprint!(
            "{}",
            render_diagnostics(&result.build, ui.verbose, ui.color, ui.unicode)
        );
        print!("{}", render_develop_result(&result, ui.color, ui.unicode));
    }

    Ok(outcome_code(result.build.success, result.artifact.is_some()))
}
